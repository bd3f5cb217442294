/// Fixed-point conversion between physical values and stored integers
///
/// Measurements keep one decimal of precision, so the database stores
/// `round(value * 10)` as an INTEGER instead of a float column. Every numeric
/// field crossing the storage boundary goes through this pair of functions.

/// Scale factor shared by `scale` and `descale`.
pub const SCALE_FACTOR: f32 = 10.0;

/// Convert a physical value to its scaled integer form.
///
/// Absent values are stored as 0. Non-finite input violates the caller's
/// contract and aborts rather than being coerced into the database.
pub fn scale(value: Option<f32>) -> i32 {
    match value {
        Some(v) => {
            assert!(v.is_finite(), "non-finite value reached the codec: {}", v);
            (v * SCALE_FACTOR).round() as i32
        }
        None => 0,
    }
}

/// Convert a scaled integer back to its physical value.
///
/// NULL columns read back as 0.0.
pub fn descale(value: Option<i32>) -> f32 {
    match value {
        Some(v) => v as f32 / SCALE_FACTOR,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_exact_to_one_decimal() {
        // Every representable one-decimal value in the sensor's working range
        // must survive scale -> descale unchanged.
        for tenths in -5000i32..=11000 {
            let physical = tenths as f32 / 10.0;
            assert_eq!(scale(Some(physical)), tenths);
            assert_eq!(descale(Some(tenths)), physical);
        }
    }

    #[test]
    fn absent_values_default_to_zero() {
        assert_eq!(scale(None), 0);
        assert_eq!(descale(None), 0.0);
    }

    #[test]
    fn scale_rounds_to_nearest() {
        assert_eq!(scale(Some(25.78)), 258);
        assert_eq!(scale(Some(-25.78)), -258);
        assert_eq!(scale(Some(0.04)), 0);
    }

    #[test]
    #[should_panic]
    fn non_finite_input_aborts() {
        scale(Some(f32::NAN));
    }
}
