use anyhow::Result;

use crate::frame::{FilterParams, FrameBuf};
use crate::pipeline::module::FrameFilter;

/// Midpoint the gain pivots around. Values above it move up, below it down.
const PIVOT: f32 = 0.5;

pub struct Contrast;

impl FrameFilter for Contrast {
    fn name(&self) -> &str {
        "contrast"
    }

    fn apply(&self, mut input: FrameBuf, params: &FilterParams) -> Result<FrameBuf> {
        if params.contrast == 1.0 {
            return Ok(input);
        }

        let gain = params.contrast;
        for v in &mut input.data {
            *v = ((*v - PIVOT) * gain + PIVOT).max(0.0);
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_one_is_identity() {
        let buf = FrameBuf::from_data(2, 2, vec![0.3; 12]).unwrap();
        let expected = buf.data.clone();
        let params = FilterParams::identity();
        let result = Contrast.apply(buf, &params).unwrap();
        assert_eq!(result.data, expected);
    }

    #[test]
    fn gain_two_doubles_deviation_from_pivot() {
        let buf = FrameBuf::from_data(1, 1, vec![0.75, 0.6, 0.55]).unwrap();
        let params = FilterParams {
            contrast: 2.0,
            ..FilterParams::identity()
        };
        let result = Contrast.apply(buf, &params).unwrap();
        assert!((result.data[0] - 1.0).abs() < 1e-6);
        assert!((result.data[1] - 0.7).abs() < 1e-6);
        assert!((result.data[2] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn darkens_below_pivot() {
        let buf = FrameBuf::from_data(1, 1, vec![0.4, 0.4, 0.4]).unwrap();
        let params = FilterParams {
            contrast: 2.0,
            ..FilterParams::identity()
        };
        let result = Contrast.apply(buf, &params).unwrap();
        for &v in &result.data {
            assert!(
                (v - 0.3).abs() < 1e-6,
                "0.4 at gain 2 should land on 0.3, got {v}"
            );
        }
    }

    #[test]
    fn pivot_is_fixed_point() {
        let buf = FrameBuf::from_data(1, 1, vec![0.5, 0.5, 0.5]).unwrap();
        for gain in [0.5, 2.0, 4.0, 10.0] {
            let params = FilterParams {
                contrast: gain,
                ..FilterParams::identity()
            };
            let result = Contrast.apply(buf.clone(), &params).unwrap();
            for &v in &result.data {
                assert!(
                    (v - 0.5).abs() < 1e-6,
                    "pivot gray should be unchanged at gain={gain}, got {v}"
                );
            }
        }
    }

    #[test]
    fn clamps_at_zero() {
        let buf = FrameBuf::from_data(1, 1, vec![0.1, 0.0, 0.2]).unwrap();
        let params = FilterParams {
            contrast: 2.0,
            ..FilterParams::identity()
        };
        let result = Contrast.apply(buf, &params).unwrap();
        for &v in &result.data {
            assert!(v >= 0.0, "values should be >= 0, got {v}");
        }
    }

    #[test]
    fn bright_values_may_exceed_one() {
        // The chain clamps on display conversion, not here; the threshold
        // stage downstream only cares which side of the cutoff a value is on.
        let buf = FrameBuf::from_data(1, 1, vec![0.9, 0.9, 0.9]).unwrap();
        let params = FilterParams {
            contrast: 2.0,
            ..FilterParams::identity()
        };
        let result = Contrast.apply(buf, &params).unwrap();
        assert!((result.data[0] - 1.3).abs() < 1e-6);
    }

    #[test]
    fn low_gain_flattens() {
        let buf = FrameBuf::from_data(1, 1, vec![0.9, 0.1, 0.5]).unwrap();
        let params = FilterParams {
            contrast: 0.5,
            ..FilterParams::identity()
        };
        let result = Contrast.apply(buf, &params).unwrap();
        let spread_before = 0.9 - 0.1;
        let spread_after = result.data[0] - result.data[1];
        assert!(spread_after < spread_before);
    }

    #[test]
    fn extreme_gain_no_panic() {
        let buf = FrameBuf::from_data(2, 2, vec![0.4; 12]).unwrap();
        for gain in [0.0, 100.0] {
            let params = FilterParams {
                contrast: gain,
                ..FilterParams::identity()
            };
            let result = Contrast.apply(buf.clone(), &params).unwrap();
            assert!(result.data.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn preserves_dimensions() {
        let buf = FrameBuf::from_data(10, 5, vec![0.4; 150]).unwrap();
        let params = FilterParams {
            contrast: 2.0,
            ..FilterParams::identity()
        };
        let result = Contrast.apply(buf, &params).unwrap();
        assert_eq!(result.width, 10);
        assert_eq!(result.height, 5);
    }
}
