//! ABAP DATE and TIME conversion.
//!
//! DATE is 8 characters `YYYYMMDD`, TIME is 6 characters `HHMMSS`. Neither
//! carries a timezone. The wire has no null, so "no date" travels as the
//! all-zero date `00000000`.
//!
//! String-oriented gateways send the ISO forms `YYYY-MM-DD` and
//! `HH:MM:SS`; both are accepted on read.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveTime};

/// Wire form of "no date".
pub const EMPTY_DATE: &str = "00000000";
/// Wire form of a null time (midnight).
pub const EMPTY_TIME: &str = "000000";
/// Latest date the wire can carry.
const MAX_DATE: &str = "99991231";

/// Decode a DATE field.
///
/// Returns `None` for the all-zero date and for blank fields.
///
/// # Example
/// ```
/// use rfc_thin_rs::protocol::codec::decode_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(decode_date("20140406").unwrap(), NaiveDate::from_ymd_opt(2014, 4, 6));
/// assert_eq!(decode_date("00000000").unwrap(), None);
/// ```
pub fn decode_date(text: &str) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() || text.bytes().all(|b| b == b'0' || b == b'-') {
        return Ok(None);
    }

    let digits: String = if text.len() == 10 && text.as_bytes()[4] == b'-' && text.as_bytes()[7] == b'-' {
        text.chars().filter(|c| *c != '-').collect()
    } else {
        text.to_string()
    };
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::type_conversion(format!(
            "DATE value must be YYYYMMDD, got '{}'",
            text
        )));
    }

    let year: i32 = parse_part(&digits[0..4])?;
    let month: u32 = parse_part(&digits[4..6])?;
    let day: u32 = parse_part(&digits[6..8])?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(|| {
            Error::type_conversion(format!(
                "Invalid DATE: year={}, month={}, day={}",
                year, month, day
            ))
        })
}

/// Encode a DATE field.
///
/// `None` and dates before year 1 (including `NaiveDate::MIN`) become
/// `00000000`. Dates after 9999-12-31 are clamped to `99991231`.
pub fn encode_date(date: Option<NaiveDate>) -> String {
    match date {
        None => EMPTY_DATE.to_string(),
        Some(d) if d.year() < 1 => EMPTY_DATE.to_string(),
        Some(d) if d.year() > 9999 => MAX_DATE.to_string(),
        Some(d) => d.format("%Y%m%d").to_string(),
    }
}

/// Decode a TIME field.
///
/// Blank fields decode to `None`; `000000` is midnight.
pub fn decode_time(text: &str) -> Result<Option<NaiveTime>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let digits: String = if text.len() == 8 && text.as_bytes()[2] == b':' && text.as_bytes()[5] == b':' {
        text.chars().filter(|c| *c != ':').collect()
    } else {
        text.to_string()
    };
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::type_conversion(format!(
            "TIME value must be HHMMSS, got '{}'",
            text
        )));
    }

    let hour: u32 = parse_part(&digits[0..2])?;
    let minute: u32 = parse_part(&digits[2..4])?;
    let second: u32 = parse_part(&digits[4..6])?;
    NaiveTime::from_hms_opt(hour, minute, second)
        .map(Some)
        .ok_or_else(|| {
            Error::type_conversion(format!(
                "Invalid TIME: hour={}, minute={}, second={}",
                hour, minute, second
            ))
        })
}

/// Encode a TIME field. Fractional seconds are dropped.
pub fn encode_time(time: Option<NaiveTime>) -> String {
    match time {
        None => EMPTY_TIME.to_string(),
        Some(t) => t.format("%H%M%S").to_string(),
    }
}

fn parse_part<T: std::str::FromStr>(digits: &str) -> Result<T> {
    digits
        .parse()
        .map_err(|_| Error::type_conversion(format!("'{}' is not numeric", digits)))
}
