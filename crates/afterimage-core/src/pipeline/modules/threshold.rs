use anyhow::Result;

use crate::frame::{FilterParams, FrameBuf};
use crate::pipeline::module::FrameFilter;

/// Binarizes each channel: values at or above the cutoff become 1.0, the
/// rest 0.0. Channels are thresholded independently, so a pixel can come
/// out pure red or cyan, not just black or white.
pub struct Threshold;

impl FrameFilter for Threshold {
    fn name(&self) -> &str {
        "threshold"
    }

    fn apply(&self, mut input: FrameBuf, params: &FilterParams) -> Result<FrameBuf> {
        let Some(cutoff) = params.threshold else {
            return Ok(input);
        };

        for v in &mut input.data {
            *v = if *v >= cutoff { 1.0 } else { 0.0 };
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(buf: FrameBuf, cutoff: f32) -> FrameBuf {
        let params = FilterParams {
            threshold: Some(cutoff),
            ..FilterParams::identity()
        };
        Threshold.apply(buf, &params).unwrap()
    }

    #[test]
    fn disabled_is_identity() {
        let buf = FrameBuf::from_data(2, 2, vec![0.42; 12]).unwrap();
        let expected = buf.data.clone();
        let params = FilterParams::identity();
        let result = Threshold.apply(buf, &params).unwrap();
        assert_eq!(result.data, expected);
    }

    #[test]
    fn splits_around_cutoff() {
        let buf = FrameBuf::from_data(1, 1, vec![0.9, 0.1, 0.69]).unwrap();
        let result = threshold(buf, 0.7);
        assert_eq!(result.data, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn cutoff_value_goes_white() {
        let buf = FrameBuf::from_data(1, 1, vec![0.7, 0.7, 0.7]).unwrap();
        let result = threshold(buf, 0.7);
        assert_eq!(result.data, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn channels_are_independent() {
        let buf = FrameBuf::from_data(1, 1, vec![0.9, 0.1, 0.7]).unwrap();
        let result = threshold(buf, 0.5);
        assert_eq!(result.data, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn output_is_binary() {
        let data: Vec<f32> = (0..30).map(|i| i as f32 / 30.0).collect();
        let buf = FrameBuf::from_data(5, 2, data).unwrap();
        let result = threshold(buf, 0.37);
        assert!(
            result.data.iter().all(|&v| v == 0.0 || v == 1.0),
            "thresholded output must only contain 0 and 1: {:?}",
            result.data
        );
    }

    #[test]
    fn zero_cutoff_lets_everything_through() {
        let buf = FrameBuf::from_data(1, 1, vec![0.0, 0.5, 1.0]).unwrap();
        let result = threshold(buf, 0.0);
        assert_eq!(result.data, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn values_above_one_still_white() {
        // Contrast can push values past 1.0 before this stage runs.
        let buf = FrameBuf::from_data(1, 1, vec![1.3, -0.3, 0.7]).unwrap();
        let result = threshold(buf, 0.7);
        assert_eq!(result.data, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn preserves_dimensions() {
        let buf = FrameBuf::from_data(6, 4, vec![0.5; 72]).unwrap();
        let result = threshold(buf, 0.7);
        assert_eq!(result.width, 6);
        assert_eq!(result.height, 4);
    }
}
