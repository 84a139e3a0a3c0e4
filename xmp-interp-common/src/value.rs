//! Sidecar value parsing and formatting
//!
//! Develop settings in a sidecar are written as quoted, sign-prefixed
//! decimals (`"+0.50"`, `"-1.25"`, `"5500"`). Reading keeps only the integer
//! part; writing always produces a sign and exactly two fractional digits.

/// Parse a raw sidecar value into its integer part
///
/// Quote characters and leading `+` signs are stripped first. A fractional
/// part is truncated toward zero, so `"-1.50"` parses to `-1` and `"+0.75"`
/// to `0`.
///
/// Returns `None` when the remainder is not a decimal number (empty string,
/// letters, exponent notation, a bare sign, or an integer part outside the
/// `i64` range).
pub fn parse_value(raw: &str) -> Option<i64> {
    let unquoted = raw.replace('"', "");
    let unsigned = unquoted.trim().trim_start_matches('+');

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = int_part.strip_prefix('-').unwrap_or(int_part);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    int_part.parse::<i64>().ok()
}

/// Format an interpolated value the way sidecar files store it
///
/// Positive values and zero get a leading `+`, negative values keep their
/// `-`, and the magnitude always has two fractional digits. Negative zero is
/// written as `+0.00`.
pub fn format_value(value: f64) -> String {
    // -0.0 == 0.0, so this also folds negative zero
    let value = if value == 0.0 { 0.0 } else { value };
    let rendered = format!("{:+.2}", value);

    // Tiny negatives round to "-0.00"; keep zero unsigned-positive
    if rendered == "-0.00" {
        "+0.00".to_string()
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signed_decimals() {
        assert_eq!(parse_value("+0.00"), Some(0));
        assert_eq!(parse_value("-1.50"), Some(-1));
        assert_eq!(parse_value("+2.99"), Some(2));
        assert_eq!(parse_value("5500"), Some(5500));
        assert_eq!(parse_value("-25"), Some(-25));
    }

    #[test]
    fn test_parse_strips_quotes_and_plus() {
        assert_eq!(parse_value("\"+15\""), Some(15));
        assert_eq!(parse_value("++3"), Some(3));
        assert_eq!(parse_value(" 7 "), Some(7));
    }

    #[test]
    fn test_parse_negative_fraction_truncates_to_zero() {
        assert_eq!(parse_value("-0.50"), Some(0));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("-"), None);
        assert_eq!(parse_value("-.5"), None);
        assert_eq!(parse_value("1e3"), None);
        assert_eq!(parse_value("1.2.3"), None);
        assert_eq!(parse_value("True"), None);
    }

    #[test]
    fn test_format_sign_and_precision() {
        assert_eq!(format_value(0.5), "+0.50");
        assert_eq!(format_value(-1.25), "-1.25");
        assert_eq!(format_value(0.0), "+0.00");
        assert_eq!(format_value(12.0), "+12.00");
        assert_eq!(format_value(-3.0), "-3.00");
    }

    #[test]
    fn test_format_negative_zero() {
        assert_eq!(format_value(-0.0), "+0.00");
        assert_eq!(format_value(-0.001), "+0.00");
    }

    #[test]
    fn test_format_then_parse_truncates() {
        assert_eq!(parse_value(&format_value(-1.5)), Some(-1));
        assert_eq!(parse_value(&format_value(33.333)), Some(33));
    }
}
