//! Number sanitising and formatting shared by the geometry builders and the momentum board.

/// Lower bound of every score domain on the desk.
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score domain on the desk.
pub const SCORE_MAX: f64 = 100.0;

/// Replace NaN, infinities and negative zero with zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value != 0.0 { value } else { 0.0 }
}

/// Sanitise and clamp a score into [0, 100].
#[inline]
pub fn clamp_score(value: f64) -> f64 {
    finite_or_zero(value).clamp(SCORE_MIN, SCORE_MAX)
}

/// Integral values are shown without a decimal, everything else to one decimal place.
pub fn format_score(value: f64) -> String {
    let value = finite_or_zero(value);
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Format a pixel coordinate for an SVG attribute: at most two decimals, no trailing zeros.
pub fn format_coord(value: f64) -> String {
    let rounded = (finite_or_zero(value) * 100.0).round() / 100.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(12.5), 12.5);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5.0), 0.0);
        assert_eq!(clamp_score(150.0), 100.0);
        assert_eq!(clamp_score(42.0), 42.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(80.0), "80");
        assert_eq!(format_score(72.0), "72");
        assert_eq!(format_score(64.31), "64.3");
        assert_eq!(format_score(64.36), "64.4");
        assert_eq!(format_score(0.0), "0");
        assert_eq!(format_score(-0.0), "0");
        assert_eq!(format_score(clamp_score(-0.0)), "0");
    }

    #[test]
    fn test_negative_zero_is_normalised() {
        assert!(finite_or_zero(-0.0).is_sign_positive());
        assert!(clamp_score(-0.0).is_sign_positive());
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(48.0), "48");
        assert_eq!(format_coord(75.2), "75.2");
        assert_eq!(format_coord(75.199999), "75.2");
        assert_eq!(format_coord(1.0 / 3.0), "0.33");
        assert_eq!(format_coord(-0.001), "0");
    }
}
