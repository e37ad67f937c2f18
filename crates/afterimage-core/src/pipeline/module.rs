use anyhow::Result;

use crate::frame::{FilterParams, FrameBuf};

/// A single step in the filter chain.
pub trait FrameFilter: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, input: FrameBuf, params: &FilterParams) -> Result<FrameBuf>;
}
