//! CHAR field conversion.
//!
//! CHAR fields are fixed width: padded with spaces on write, trailing
//! spaces trimmed on read. ABAP has no boolean type; flags are a single
//! character, `X` for true and space for false.

use crate::error::{Error, Result};

/// Flag value for true.
pub const FLAG_TRUE: &str = "X";
/// Flag value for false.
pub const FLAG_FALSE: &str = " ";

/// Pad text to the field width.
///
/// Width counts characters. Text longer than the field is an error, not
/// a silent truncation.
pub fn pad_char(text: &str, length: Option<u32>) -> Result<String> {
    let Some(width) = length else {
        return Ok(text.to_string());
    };
    let width = width as usize;
    let count = text.chars().count();
    if count > width {
        return Err(Error::type_conversion(format!(
            "'{}' is {} characters long, field holds {}",
            text, count, width
        )));
    }
    let mut padded = String::with_capacity(text.len() + width - count);
    padded.push_str(text);
    padded.extend(std::iter::repeat(' ').take(width - count));
    Ok(padded)
}

/// Strip the trailing padding of a CHAR field.
pub fn trim_char(text: &str) -> &str {
    text.trim_end()
}

/// Encode a boolean flag.
pub fn encode_flag(value: bool) -> &'static str {
    if value {
        FLAG_TRUE
    } else {
        FLAG_FALSE
    }
}

/// Decode a boolean flag. Accepts `X`/`x` and blank only.
pub fn decode_flag(text: &str) -> Result<bool> {
    match text.trim() {
        "X" | "x" => Ok(true),
        "" => Ok(false),
        other => Err(Error::type_conversion(format!(
            "'{}' is not a flag (expected 'X' or space)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_char() {
        assert_eq!(pad_char("AB", Some(4)).unwrap(), "AB  ");
        assert_eq!(pad_char("AB", None).unwrap(), "AB");
        assert_eq!(pad_char("ÄÖ", Some(3)).unwrap(), "ÄÖ ");
        assert!(pad_char("ABCDE", Some(4)).is_err());
    }

    #[test]
    fn test_trim_char() {
        assert_eq!(trim_char("GRAPHICS  "), "GRAPHICS");
        assert_eq!(trim_char(" A "), " A");
    }

    #[test]
    fn test_flags() {
        assert_eq!(encode_flag(true), "X");
        assert_eq!(encode_flag(false), " ");
        assert!(decode_flag("X").unwrap());
        assert!(!decode_flag(" ").unwrap());
        assert!(!decode_flag("").unwrap());
        assert!(decode_flag("Y").is_err());
    }
}
