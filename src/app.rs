use iced::{Element, Subscription, Task, Theme};
use tracing::{debug, error};

use afterimage_capture::{CameraCapture, CaptureConfig};
use afterimage_core::compose::{self, BlendMode};
use afterimage_core::frame::{FilterParams, FrameBuf};
use afterimage_core::pipeline::FilterPipeline;
use afterimage_core::trail::{FrameTrail, TrailFrame};

use crate::views;

/// Polling interval for the camera's latest-frame slot, a bit above 30 fps.
const TICK_MS: u64 = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Raw camera preview, straight from the capture thread.
    Live,
    /// The buffered frames composited into one long-exposure image.
    Trail,
}

pub struct App {
    display: DisplayMode,
    capture: Option<CameraCapture>,
    params: FilterParams,
    blend_mode: BlendMode,
    trail: FrameTrail,

    live_frame: Option<iced::widget::image::Handle>,
    composited: Option<iced::widget::image::Handle>,

    frames_seen: u64,
    filter_in_flight: bool,
    composite_generation: u64,

    status_message: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    FrameFiltered(u64, Option<TrailFrame>),
    CompositeReady(u64, iced::widget::image::Handle),
    ToggleDisplay,
    Noop,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let capture = match CameraCapture::new(CaptureConfig::default()) {
            Ok(capture) => Some(capture),
            Err(err) => {
                error!(%err, "failed to start capture");
                None
            }
        };
        let status_message = if capture.is_some() {
            "Waiting for camera...".to_string()
        } else {
            "No camera available. See the log for details.".to_string()
        };

        let app = Self {
            display: DisplayMode::Live,
            capture,
            params: FilterParams::default(),
            blend_mode: BlendMode::default(),
            trail: FrameTrail::default(),
            live_frame: None,
            composited: None,
            frames_seen: 0,
            filter_in_flight: false,
            composite_generation: 0,
            status_message,
        };

        (app, Task::none())
    }

    pub fn title(&self) -> String {
        match self.display {
            DisplayMode::Live => "Afterimage - Live".to_string(),
            DisplayMode::Trail => format!(
                "Afterimage - Trail ({}/{})",
                self.trail.len(),
                self.trail.capacity()
            ),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::time::every(std::time::Duration::from_millis(TICK_MS)).map(|_| Message::Tick)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => self.poll_camera(),

            Message::FrameFiltered(frame_number, result) => {
                self.filter_in_flight = false;
                let Some(frame) = result else {
                    // The filter chain already logged why; the frame is
                    // simply gone and the trail keeps its current content.
                    return Task::none();
                };
                debug!(frame_number, trail_len = self.trail.len(), "frame filtered");
                self.trail.push(frame);
                self.update_status();
                self.recomposite()
            }

            Message::CompositeReady(generation, handle) => {
                if generation != self.composite_generation {
                    return Task::none();
                }
                self.composited = Some(handle);
                Task::none()
            }

            Message::ToggleDisplay => {
                self.display = match self.display {
                    DisplayMode::Live => DisplayMode::Trail,
                    DisplayMode::Trail => DisplayMode::Live,
                };
                Task::none()
            }

            Message::Noop => Task::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        match self.display {
            DisplayMode::Live => views::live::view(self),
            DisplayMode::Trail => views::trail::view(self),
        }
    }

    /// Pick up the newest camera frame, refresh the raw preview, and kick
    /// off the filter chain for it. At most one filter task runs at a time;
    /// frames that arrive while it runs are skipped, newest wins.
    fn poll_camera(&mut self) -> Task<Message> {
        let Some(ref capture) = self.capture else {
            return Task::none();
        };

        if !capture.is_running() {
            self.status_message = "Camera stopped. See the log for details.".into();
            return Task::none();
        }

        if capture.frame_count() == self.frames_seen || self.filter_in_flight {
            return Task::none();
        }

        let Some(frame) = capture.latest_frame() else {
            return Task::none();
        };
        self.frames_seen = frame.frame_number;

        self.live_frame = Some(iced::widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.clone(),
        ));

        self.filter_in_flight = true;
        let params = self.params.clone();
        Task::perform(
            async move {
                let pipeline = FilterPipeline::new();
                let number = frame.frame_number;
                let result = FrameBuf::from_rgba8(frame.width, frame.height, &frame.data)
                    .and_then(|buf| pipeline.process(buf, &params))
                    .map(|processed| TrailFrame::from_buf(&processed));
                match result {
                    Ok(processed) => (number, Some(processed)),
                    Err(err) => {
                        debug!(%err, number, "filter chain dropped a frame");
                        (number, None)
                    }
                }
            },
            |(number, result)| Message::FrameFiltered(number, result),
        )
    }

    /// Re-stack the trail on a background task. Results carry a generation
    /// number so a stale composite can never overwrite a newer one.
    fn recomposite(&mut self) -> Task<Message> {
        if self.trail.is_empty() {
            return Task::none();
        }

        self.composite_generation += 1;
        let generation = self.composite_generation;
        let trail = self.trail.clone();
        let mode = self.blend_mode;

        Task::perform(
            async move {
                let handle = compose::composite(&trail, mode).map(|frame| {
                    iced::widget::image::Handle::from_rgba(frame.width, frame.height, frame.rgba)
                });
                (generation, handle)
            },
            |(generation, handle)| match handle {
                Some(handle) => Message::CompositeReady(generation, handle),
                None => Message::Noop,
            },
        )
    }

    fn update_status(&mut self) {
        self.status_message = if self.trail.is_full() {
            format!("Trail full ({} frames)", self.trail.len())
        } else {
            format!(
                "Collecting frames: {}/{}",
                self.trail.len(),
                self.trail.capacity()
            )
        };
    }

    pub fn live_frame(&self) -> Option<&iced::widget::image::Handle> {
        self.live_frame.as_ref()
    }

    pub fn composited(&self) -> Option<&iced::widget::image::Handle> {
        self.composited.as_ref()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail.capacity()
    }

    pub fn trail_is_full(&self) -> bool {
        self.trail.is_full()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }
}
