//! Webcam capture on a dedicated thread.
//!
//! The capture thread owns the camera for its whole life: nokhwa backends
//! are not generally Send, so the device is opened, polled, and dropped
//! without ever crossing threads. Decoded frames land in a single
//! latest-frame slot that the UI polls; a slow consumer only ever sees the
//! newest frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use nokhwa::Camera;
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::CaptureResult;

/// One decoded camera frame.
#[derive(Clone)]
pub struct CameraFrame {
    /// Tightly packed RGBA pixels.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Strictly increasing over a capture session, starting at 1.
    pub frame_number: u64,
    pub captured_at: Instant,
}

/// Capture settings. The demo only ever opens the default device; the
/// resolution request is a floor for the format fallback, not a guarantee.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub index: u32,
    pub request_width: u32,
    pub request_height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            index: 0,
            request_width: 1280,
            request_height: 720,
        }
    }
}

/// Owns the capture thread and the shared latest-frame slot.
pub struct CameraCapture {
    latest: Arc<Mutex<Option<CameraFrame>>>,
    running: Arc<AtomicBool>,
    frame_count: Arc<AtomicU64>,
    thread_handle: Option<JoinHandle<()>>,
}

impl CameraCapture {
    /// Spawn the capture thread. Returns as soon as the thread is up; the
    /// device itself opens on the thread, and an open failure stops the
    /// thread (visible through `is_running`) instead of failing this call.
    pub fn new(config: CaptureConfig) -> CaptureResult<Self> {
        let latest = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));
        let frame_count = Arc::new(AtomicU64::new(0));

        let thread_handle = std::thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn({
                let latest = latest.clone();
                let running = running.clone();
                let frame_count = frame_count.clone();
                move || {
                    capture_loop(&config, &latest, &running, &frame_count);
                    running.store(false, Ordering::Release);
                }
            })?;

        Ok(Self {
            latest,
            running,
            frame_count,
            thread_handle: Some(thread_handle),
        })
    }

    /// Clone of the newest frame, if one has arrived yet.
    pub fn latest_frame(&self) -> Option<CameraFrame> {
        self.latest.lock().clone()
    }

    /// Total frames captured so far. By the time a new count is visible
    /// the slot already holds that frame, so this is a cheap "anything
    /// new?" check for pollers that do not want to clone the frame.
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop(
    config: &CaptureConfig,
    latest: &Mutex<Option<CameraFrame>>,
    running: &AtomicBool,
    frame_count: &AtomicU64,
) {
    let mut camera = match open_camera(config) {
        Ok(camera) => camera,
        Err(err) => {
            error!(%err, index = config.index, "failed to open camera");
            return;
        }
    };
    if let Err(err) = camera.open_stream() {
        error!(%err, "failed to open camera stream");
        return;
    }

    info!(
        name = %camera.info().human_name(),
        width = camera.resolution().width(),
        height = camera.resolution().height(),
        "camera streaming"
    );

    let mut published: u64 = 0;
    while running.load(Ordering::Acquire) {
        let frame = match camera.frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "frame grab failed");
                std::thread::sleep(Duration::from_millis(10));
                continue;
            }
        };

        let decoded = match frame.decode_image::<RgbAFormat>() {
            Ok(image) => image,
            Err(err) => {
                debug!(%err, "frame decode failed, skipping");
                continue;
            }
        };

        let (width, height) = (decoded.width(), decoded.height());
        published += 1;
        publish_frame(
            latest,
            frame_count,
            CameraFrame {
                data: decoded.into_raw(),
                width,
                height,
                frame_number: published,
                captured_at: Instant::now(),
            },
        );
    }

    info!("camera capture stopped");
}

/// Publish a frame: slot store first, then the counter with `Release`. A
/// reader that observes the new count finds this frame (or a newer one)
/// already in the slot, never the previous one.
fn publish_frame(latest: &Mutex<Option<CameraFrame>>, frame_count: &AtomicU64, frame: CameraFrame) {
    let frame_number = frame.frame_number;
    *latest.lock() = Some(frame);
    frame_count.store(frame_number, Ordering::Release);
}

/// Open the device, walking down a ladder of format requests: the best the
/// camera offers, then the highest at or above the configured floor, then
/// whatever it will give us.
fn open_camera(config: &CaptureConfig) -> Result<Camera, nokhwa::NokhwaError> {
    let index = CameraIndex::Index(config.index);
    let floor = Resolution::new(config.request_width, config.request_height);

    let requested =
        RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let err = match Camera::new(index.clone(), requested) {
        Ok(camera) => return Ok(camera),
        Err(err) => err,
    };
    warn!(%err, "highest-resolution request failed, retrying with a floor");

    let requested =
        RequestedFormat::new::<RgbAFormat>(RequestedFormatType::HighestResolution(floor));
    let err = match Camera::new(index.clone(), requested) {
        Ok(camera) => return Ok(camera),
        Err(err) => err,
    };
    warn!(%err, "floored-resolution request failed, retrying unconstrained");

    Camera::new(index, RequestedFormat::new::<RgbAFormat>(RequestedFormatType::None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_clone_independently() {
        let frame = CameraFrame {
            data: vec![1, 2, 3, 255],
            width: 1,
            height: 1,
            frame_number: 7,
            captured_at: Instant::now(),
        };
        let mut copy = frame.clone();
        copy.data[0] = 9;
        assert_eq!(frame.data[0], 1);
        assert_eq!(copy.frame_number, 7);
    }

    #[test]
    fn config_floor_is_overridable() {
        let config = CaptureConfig {
            request_width: 640,
            request_height: 480,
            ..Default::default()
        };
        assert_eq!(config.index, 0);
        assert_eq!(config.request_width, 640);
        assert_eq!(config.request_height, 480);
    }

    #[test]
    fn count_never_runs_ahead_of_the_slot() {
        let latest = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicU64::new(0));

        let writer = {
            let latest = Arc::clone(&latest);
            let count = Arc::clone(&count);
            std::thread::spawn(move || {
                for n in 1..=2_000u64 {
                    publish_frame(
                        &latest,
                        &count,
                        CameraFrame {
                            data: vec![0, 0, 0, 255],
                            width: 1,
                            height: 1,
                            frame_number: n,
                            captured_at: Instant::now(),
                        },
                    );
                }
            })
        };

        // A poller that trusts the count must always find that frame (or a
        // newer one) in the slot, whatever instant it looks.
        loop {
            let seen = count.load(Ordering::Acquire);
            if seen > 0 {
                let in_slot = latest.lock().as_ref().map(|frame| frame.frame_number);
                assert!(
                    in_slot >= Some(seen),
                    "count {seen} visible but slot holds {in_slot:?}"
                );
            }
            if seen == 2_000 {
                break;
            }
            std::thread::yield_now();
        }
        writer.join().unwrap();
    }
}
