//! Numeric helpers centralizing coercion of optional inputs and safe casts.

use num_traits::cast::cast;

/// Coerce an optional input to a number, treating blank and non-finite values as 0.
#[must_use]
pub fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Return the value only when it is strictly positive and finite.
#[must_use]
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// True when the value is blank or not strictly positive.
#[must_use]
pub fn is_blank_or_non_positive(value: Option<f64>) -> bool {
    positive(value).is_none()
}

/// Round to `dp` decimal places, returning `None` for non-finite values.
#[must_use]
pub fn round_dp(value: f64, dp: u8) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let factor = 10f64.powi(i32::from(dp));
    Some((value * factor).round() / factor)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Parse a user-entered numeric string; blank or unparseable text is `None`.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_zero_handles_blank_and_non_finite() {
        assert!((or_zero(None) - 0.0).abs() < f64::EPSILON);
        assert!((or_zero(Some(f64::NAN)) - 0.0).abs() < f64::EPSILON);
        assert!((or_zero(Some(4.5)) - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn positive_filters_zero_and_negative() {
        assert_eq!(positive(Some(0.0)), None);
        assert_eq!(positive(Some(-3.0)), None);
        assert_eq!(positive(Some(12.5)), Some(12.5));
        assert!(is_blank_or_non_positive(None));
    }

    #[test]
    fn round_dp_matches_half_away_from_zero() {
        assert_eq!(round_dp(2.345_6, 2), Some(2.35));
        assert_eq!(round_dp(-1.25, 1), Some(-1.3));
        assert_eq!(round_dp(f64::NAN, 2), None);
    }

    #[test]
    fn parse_number_trims_and_rejects_garbage() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
    }
}
