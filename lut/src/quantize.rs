//! Real-to-code quantization with saturating overflow.

use crate::model::RoundingMode;

/// Outcome of quantizing one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantized {
    /// Unsigned code, always `< 2^value_bits`.
    pub code: u64,
    /// Whether the rounded value did not fit and was clamped.
    pub saturated: bool,
}

/// Quantizes `raw` to an unsigned `value_bits`-wide code.
///
/// Computes `round(raw * 2^value_bits)` under `rounding`. A result needing
/// more than `value_bits` digits clamps to `2^value_bits - 1`; a negative or
/// NaN result clamps to 0. Neither case wraps.
#[must_use]
pub fn quantize(raw: f64, value_bits: u32, rounding: RoundingMode) -> Quantized {
    let limit = f64::from(value_bits).exp2();
    let rounded = rounding.apply(raw * limit);

    if rounded >= limit {
        Quantized {
            code: (1u64 << value_bits) - 1,
            saturated: true,
        }
    } else if rounded >= 0.0 {
        Quantized {
            code: rounded as u64,
            saturated: false,
        }
    } else {
        // negative, or NaN (fails both comparisons)
        Quantized {
            code: 0,
            saturated: true,
        }
    }
}

/// Real value represented by `code`, i.e. `code / 2^value_bits`.
#[must_use]
pub fn dequantize(code: u64, value_bits: u32) -> f64 {
    code as f64 / f64::from(value_bits).exp2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_maps_to_midpoint() {
        let q = quantize(0.5, 8, RoundingMode::HalfEven);
        assert_eq!(q, Quantized { code: 128, saturated: false });
    }

    #[test]
    fn overflow_saturates_instead_of_wrapping() {
        let q = quantize(0.99966, 8, RoundingMode::HalfEven);
        assert_eq!(q, Quantized { code: 255, saturated: true });

        let q = quantize(1.0, 4, RoundingMode::HalfAwayFromZero);
        assert_eq!(q, Quantized { code: 15, saturated: true });
    }

    #[test]
    fn truncation_avoids_edge_saturation() {
        let q = quantize(0.99966, 8, RoundingMode::Truncate);
        assert_eq!(q, Quantized { code: 255, saturated: false });
    }

    #[test]
    fn largest_code_is_not_saturated() {
        let q = quantize(255.0 / 256.0, 8, RoundingMode::HalfEven);
        assert_eq!(q, Quantized { code: 255, saturated: false });
    }

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        assert_eq!(quantize(-0.3, 8, RoundingMode::HalfEven).code, 0);
        assert_eq!(quantize(f64::NAN, 8, RoundingMode::HalfEven).code, 0);
        // rounds to -0.0, which is zero and not a clamp
        assert!(!quantize(-0.001, 8, RoundingMode::HalfEven).saturated);
    }

    #[test]
    fn wide_values_stay_in_range() {
        let q = quantize(1.0, 63, RoundingMode::HalfEven);
        assert_eq!(q.code, (1u64 << 63) - 1);
        assert!(q.saturated);
    }

    #[test]
    fn dequantize_inverts_exact_codes() {
        assert_eq!(dequantize(128, 8), 0.5);
        assert_eq!(dequantize(15, 4), 15.0 / 16.0);
    }
}
