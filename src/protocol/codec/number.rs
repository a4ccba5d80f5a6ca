//! INTEGER and DECIMAL text conversion.
//!
//! String-oriented transports deliver numbers as text, sometimes blank
//! for an initial value and sometimes with the sign trailing (`12-`).

use crate::error::{Error, Result};
use crate::protocol::types::Decimal;

/// Parse integer text. Blank text is the initial value 0.
pub fn parse_integer(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let normalized = match trimmed.strip_suffix('-') {
        Some(digits) => format!("-{}", digits.trim_end()),
        None => trimmed.to_string(),
    };
    normalized
        .parse()
        .map_err(|_| Error::type_conversion(format!("'{}' is not a valid integer", text)))
}

/// Parse decimal text. Blank text is zero.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    if text.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    text.parse()
}

/// Format a decimal for a packed field with `decimals` fractional digits.
///
/// Fails instead of rounding when the value has more fractional digits
/// than the field holds.
pub fn format_decimal(value: Decimal, decimals: Option<u32>) -> Result<String> {
    match decimals {
        Some(scale) => Ok(value.rescale(scale)?.to_string()),
        None => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42").unwrap(), 42);
        assert_eq!(parse_integer(" -7 ").unwrap(), -7);
        assert_eq!(parse_integer("12-").unwrap(), -12);
        assert_eq!(parse_integer("").unwrap(), 0);
        assert!(parse_integer("abc").is_err());
        assert!(parse_integer("1.5").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("2.5").unwrap(), Decimal::new(25, 1));
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
        assert!(parse_decimal("two").is_err());
    }

    #[test]
    fn test_format_decimal() {
        let price: Decimal = "464624.521".parse().unwrap();
        assert_eq!(format_decimal(price, Some(3)).unwrap(), "464624.521");
        assert_eq!(format_decimal(price, Some(5)).unwrap(), "464624.52100");
        assert_eq!(format_decimal(price, None).unwrap(), "464624.521");
        assert!(format_decimal(price, Some(2)).is_err());
    }
}
