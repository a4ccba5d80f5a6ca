//! Per-kind conversion rules between host values and wire text.
//!
//! | ABAP kind | Module | Wire form |
//! |-----------|--------|-----------|
//! | DATE      | `date` | `YYYYMMDD`, `00000000` for no date |
//! | TIME      | `date` | `HHMMSS` |
//! | INTEGER, DECIMAL | `number` | decimal text |
//! | CHAR      | `character` | space-padded text, `X`/space flags |
//!
//! BYTES, STRUCTURE and TABLE carry no text encoding of their own and are
//! handled by the marshaller.

pub mod character;
pub mod date;
pub mod number;

pub use character::{decode_flag, encode_flag, pad_char, trim_char};
pub use date::{decode_date, decode_time, encode_date, encode_time, EMPTY_DATE, EMPTY_TIME};
pub use number::{format_decimal, parse_decimal, parse_integer};
