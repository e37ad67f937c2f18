pub mod module;
pub mod modules;

use anyhow::Result;
use tracing::debug;

use crate::frame::{FilterParams, FrameBuf};
use module::FrameFilter;

/// Filter chain applied to every captured frame.
///
/// ```text
/// Camera RGBA -> Contrast -> Gaussian Blur -> Threshold -> Trail
/// ```
///
/// Each filter operates on an f32 FrameBuf. The order is fixed: contrast
/// exaggerates highlights before the blur softens them, and the threshold
/// turns the result into the binary mask the trail composites.
pub struct FilterPipeline {
    filters: Vec<Box<dyn FrameFilter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: vec![
                Box::new(modules::Contrast),
                Box::new(modules::GaussianBlur),
                Box::new(modules::Threshold),
            ],
        }
    }

    /// Run the full chain on one frame with the given params.
    pub fn process(&self, input: FrameBuf, params: &FilterParams) -> Result<FrameBuf> {
        let mut current = input;
        for filter in &self.filters {
            debug!(filter = filter.name(), "processing");
            current = filter.apply(current, params)?;
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
