use serde::{Deserialize, Serialize};

/// Display-referred f32 RGB frame buffer.
///
/// All pixel data is stored as interleaved RGBRGBRGB... with values
/// nominally in [0, 1]. Frames arrive from the camera as RGBA8 and leave
/// the same way; the filter chain works on floats in between.
#[derive(Clone, Debug)]
pub struct FrameBuf {
    pub width: u32,
    pub height: u32,
    /// Flat pixel data: [R, G, B, R, G, B, ...] as f32.
    pub data: Vec<f32>,
}

impl FrameBuf {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width * height * 3) as usize],
        }
    }

    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> anyhow::Result<Self> {
        let expected = (width * height * 3) as usize;
        anyhow::ensure!(
            data.len() == expected,
            "expected {expected} floats for {width}x{height} RGB, got {}",
            data.len()
        );
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from tightly packed RGBA8 pixels as the camera delivers them.
    /// Alpha is dropped.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<Self> {
        let expected = (width * height * 4) as usize;
        anyhow::ensure!(
            rgba.len() == expected,
            "expected {expected} bytes for {width}x{height} RGBA, got {}",
            rgba.len()
        );
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in rgba.chunks_exact(4) {
            data.push(pixel[0] as f32 / 255.0);
            data.push(pixel[1] as f32 / 255.0);
            data.push(pixel[2] as f32 / 255.0);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert to RGBA u8 with alpha = 255. Values clamp to [0, 1] first.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixel_count() * 4);
        for pixel in self.data.chunks_exact(3) {
            out.push(quantize(pixel[0]));
            out.push(quantize(pixel[1]));
            out.push(quantize(pixel[2]));
            out.push(255);
        }
        out
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Parameters for the filter chain.
///
/// `Default` is the chain the app actually runs (hard contrast into a soft
/// blur into a binary threshold), not identity; `identity()` switches every
/// stage off.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterParams {
    /// Contrast gain about the 0.5 pivot. 1.0 leaves the image unchanged.
    pub contrast: f32,
    /// Gaussian blur sigma in pixels. Values <= 0 disable the blur.
    pub blur_radius: f32,
    /// Binarization cutoff in [0, 1]. `None` disables thresholding.
    pub threshold: Option<f32>,
}

impl FilterParams {
    /// Parameters that leave every frame untouched.
    pub fn identity() -> Self {
        Self {
            contrast: 1.0,
            blur_radius: 0.0,
            threshold: None,
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            contrast: 2.0,
            blur_radius: 3.0,
            threshold: Some(0.7),
        }
    }
}
