//! Parsing of the free-text OSM `level` tag.
//!
//! Parking space nodes cannot be on more than one level, so only a single
//! numeric value is accepted. Multi-level values such as `1;2` and free
//! text are rejected rather than averaged or truncated. Only plain decimal
//! notation is accepted (`-12`, `75.35`), never exponents, so the precision
//! always describes the digits as written.

use thiserror::Error;

use crate::models::INVALID_LEVEL;

/// A parsed level value together with its decimal precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub value: f32,
    /// Number of digits after the decimal point in the source text
    pub precision: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelParseError {
    #[error("Empty level value")]
    Empty,

    #[error("Not a single numeric value: {0}")]
    NotNumeric(String),

    #[error("Level is not finite: {0}")]
    NotFinite(String),

    #[error("Level collides with the reserved no-level value: {0}")]
    Reserved(String),
}

/// Parse a level tag value into a number and its precision.
pub fn parse_level(text: &str) -> Result<Level, LevelParseError> {
    if text.is_empty() {
        return Err(LevelParseError::Empty);
    }

    if !is_plain_decimal(text) {
        return Err(LevelParseError::NotNumeric(text.to_string()));
    }

    let value: f32 = text
        .parse()
        .map_err(|_| LevelParseError::NotNumeric(text.to_string()))?;

    // very long digit runs overflow to infinity
    if !value.is_finite() {
        return Err(LevelParseError::NotFinite(text.to_string()));
    }
    if value == INVALID_LEVEL {
        return Err(LevelParseError::Reserved(text.to_string()));
    }

    Ok(Level {
        value,
        precision: decimal_precision(text),
    })
}

/// `[+-]digits[.digits]`; a bare sign or point is not a number
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    let (int, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    (!int.is_empty() || !fraction.is_empty())
        && int.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Count the digits following the first decimal point; 0 if there is none.
pub fn decimal_precision(text: &str) -> u32 {
    match text.split_once('.') {
        Some((_, fraction)) => fraction.bytes().take_while(u8::is_ascii_digit).count() as u32,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_levels() {
        for (text, expected) in [("0", 0.0), ("1", 1.0), ("-12", -12.0), ("566", 566.0)] {
            let level = parse_level(text).unwrap();
            assert_eq!(level.value, expected, "level {}", text);
            assert_eq!(level.precision, 0, "level {}", text);
        }
    }

    #[test]
    fn test_fractional_level() {
        let level = parse_level("75.35").unwrap();
        assert!((level.value - 75.35).abs() < 1e-5);
        assert_eq!(level.precision, 2);
    }

    #[test]
    fn test_signed_fractional_level() {
        let level = parse_level("-0.5").unwrap();
        assert_eq!(level.value, -0.5);
        assert_eq!(level.precision, 1);
    }

    #[test]
    fn test_multi_level_rejected() {
        assert_eq!(
            parse_level("1;2"),
            Err(LevelParseError::NotNumeric("1;2".to_string()))
        );
        assert!(parse_level("1,2").is_err());
        assert!(parse_level("-1-2").is_err());
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert!(parse_level("abc").is_err());
        assert!(parse_level("2 ").is_err());
        assert!(parse_level("1st").is_err());
        assert_eq!(parse_level(""), Err(LevelParseError::Empty));
    }

    #[test]
    fn test_special_values_rejected() {
        assert!(matches!(
            parse_level("inf"),
            Err(LevelParseError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_level("NaN"),
            Err(LevelParseError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_exponent_rejected() {
        for text in ["1e1", "1.5e3", "3.4028235e38", "1E-2"] {
            assert_eq!(
                parse_level(text),
                Err(LevelParseError::NotNumeric(text.to_string())),
                "level {}",
                text
            );
        }
    }

    #[test]
    fn test_no_level_value_rejected() {
        // f32::MAX written out in full
        let text = "340282346638528859811704183484516925440";
        assert_eq!(
            parse_level(text),
            Err(LevelParseError::Reserved(text.to_string()))
        );

        let overflow = "9".repeat(40);
        assert!(matches!(
            parse_level(&overflow),
            Err(LevelParseError::NotFinite(_))
        ));
    }

    #[test]
    fn test_plain_decimal_forms() {
        assert_eq!(parse_level("+2").unwrap().value, 2.0);
        assert_eq!(parse_level(".5").unwrap().precision, 1);
        assert_eq!(parse_level("3.").unwrap().value, 3.0);
        assert!(parse_level(".").is_err());
        assert!(parse_level("-").is_err());
        assert!(parse_level("1.2.3").is_err());
    }

    #[test]
    fn test_decimal_precision() {
        assert_eq!(decimal_precision("3"), 0);
        assert_eq!(decimal_precision("-3"), 0);
        assert_eq!(decimal_precision("3."), 0);
        assert_eq!(decimal_precision("3.125"), 3);
        assert_eq!(decimal_precision("-.5"), 1);
    }
}
