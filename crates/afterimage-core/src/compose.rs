use crate::trail::{FrameTrail, TrailFrame};

/// How buffered frames stack into one image.
///
/// Both operators only ever brighten: the blend of two pixels is at least
/// as bright as either input, which is what lets moving highlights pile up
/// into trails against a black background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// `out = 1 - (1 - a)(1 - b)`
    #[default]
    Screen,
    /// Per-channel max.
    Lighten,
}

impl BlendMode {
    /// Blend two channel values. Black (0) is the identity for both modes.
    pub fn blend(self, a: u8, b: u8) -> u8 {
        match self {
            BlendMode::Screen => {
                let inv = (255 - a as u16) * (255 - b as u16);
                255 - ((inv + 127) / 255) as u8
            }
            BlendMode::Lighten => a.max(b),
        }
    }
}

/// Stack every frame in the trail into a single opaque bitmap.
///
/// Frames fold oldest-to-newest into a black accumulator, so an empty trail
/// yields `None` and a single frame comes back unchanged. The trail
/// guarantees all frames share one dimension pair.
pub fn composite(trail: &FrameTrail, mode: BlendMode) -> Option<TrailFrame> {
    let newest = trail.latest()?;
    let (width, height) = (newest.width, newest.height);
    let mut acc = vec![0u8; newest.rgba.len()];

    for frame in trail.iter() {
        for (out, &src) in acc.iter_mut().zip(frame.rgba.iter()) {
            *out = mode.blend(*out, src);
        }
    }

    Some(TrailFrame {
        width,
        height,
        rgba: acc,
    })
}
