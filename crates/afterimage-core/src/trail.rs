use std::collections::VecDeque;
use std::sync::Arc;

use crate::frame::FrameBuf;

/// How many processed frames the trail keeps.
pub const TRAIL_CAPACITY: usize = 30;

/// A processed frame ready for display and compositing: opaque RGBA8.
#[derive(Clone, Debug)]
pub struct TrailFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TrailFrame {
    pub fn from_buf(buf: &FrameBuf) -> Self {
        Self {
            width: buf.width,
            height: buf.height,
            rgba: buf.to_rgba8(),
        }
    }
}

/// Bounded FIFO of the most recently processed frames.
///
/// Pushing beyond capacity evicts the oldest frame. Frames sit behind `Arc`
/// so cloning the whole trail for a background composite costs thirty
/// refcount bumps, not thirty bitmaps.
#[derive(Clone)]
pub struct FrameTrail {
    frames: VecDeque<Arc<TrailFrame>>,
    capacity: usize,
}

impl FrameTrail {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "trail capacity must be nonzero");
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append the newest frame, evicting the oldest beyond capacity.
    ///
    /// A frame whose dimensions differ from the buffered ones clears the
    /// trail first: the camera renegotiated its format, and frames of mixed
    /// sizes must never blend together.
    pub fn push(&mut self, frame: TrailFrame) {
        if let Some(front) = self.frames.front()
            && (front.width != frame.width || front.height != frame.height)
        {
            self.frames.clear();
        }

        while self.frames.len() >= self.capacity {
            self.frames.pop_front();
        }

        self.frames.push_back(Arc::new(frame));
    }

    /// The most recently pushed frame.
    pub fn latest(&self) -> Option<&Arc<TrailFrame>> {
        self.frames.back()
    }

    /// Frames in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TrailFrame>> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for FrameTrail {
    fn default() -> Self {
        Self::new(TRAIL_CAPACITY)
    }
}
