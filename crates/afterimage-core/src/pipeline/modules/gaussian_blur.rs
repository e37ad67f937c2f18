use anyhow::Result;

use crate::frame::{FilterParams, FrameBuf};
use crate::pipeline::module::FrameFilter;

/// Separable gaussian blur.
///
/// `blur_radius` is the sigma of the gaussian in pixels. The kernel is
/// truncated at 3 sigma and renormalized, and each frame gets one
/// horizontal and one vertical pass. Borders clamp to the edge pixel, so a
/// uniform image passes through unchanged.
pub struct GaussianBlur;

impl FrameFilter for GaussianBlur {
    fn name(&self) -> &str {
        "gaussian_blur"
    }

    fn apply(&self, input: FrameBuf, params: &FilterParams) -> Result<FrameBuf> {
        if params.blur_radius <= 0.0 {
            return Ok(input);
        }

        let kernel = build_kernel(params.blur_radius);
        let horizontal = blur_pass(&input, &kernel, Axis::X);
        Ok(blur_pass(&horizontal, &kernel, Axis::Y))
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Normalized 1D gaussian weights for the given sigma.
fn build_kernel(sigma: f32) -> Vec<f32> {
    let half = (sigma * 3.0).ceil() as i32;
    let denom = 2.0 * sigma * sigma;

    let mut kernel = Vec::with_capacity((2 * half + 1) as usize);
    for i in -half..=half {
        let x = i as f32;
        kernel.push((-x * x / denom).exp());
    }

    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

fn blur_pass(src: &FrameBuf, kernel: &[f32], axis: Axis) -> FrameBuf {
    let width = src.width as i32;
    let height = src.height as i32;
    let half = (kernel.len() / 2) as i32;
    let mut out = FrameBuf::new(src.width, src.height);

    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0_f32; 3];
            for (k, &w) in kernel.iter().enumerate() {
                let offset = k as i32 - half;
                let (sx, sy) = match axis {
                    Axis::X => ((x + offset).clamp(0, width - 1), y),
                    Axis::Y => (x, (y + offset).clamp(0, height - 1)),
                };
                let idx = ((sy * width + sx) * 3) as usize;
                acc[0] += src.data[idx] * w;
                acc[1] += src.data[idx + 1] * w;
                acc[2] += src.data[idx + 2] * w;
            }
            let idx = ((y * width + x) * 3) as usize;
            out.data[idx] = acc[0];
            out.data[idx + 1] = acc[1];
            out.data[idx + 2] = acc[2];
        }
    }

    out
}
