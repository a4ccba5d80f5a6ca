//! ABAP data type enum, the closed set of wire-level data kinds.
//!
//! Discovery responses describe each parameter with a one-letter ABAP
//! type code. Several codes collapse onto the same kind here because
//! they share a conversion rule (all integer widths are `Integer`, packed
//! and float numbers are `Decimal`, and so on).

use crate::error::{Error, Result};

/// Wire-level data kind of a parameter or structure field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbapType {
    /// INT1/INT2/INT4/INT8.
    Integer,
    /// Packed number (P) or float (F). Kept as exact fixed-point.
    Decimal,
    /// Fixed-width character field (C, N, STRING).
    Char,
    /// Date, `YYYYMMDD`, no timezone.
    Date,
    /// Time of day, `HHMMSS`.
    Time,
    /// Raw bytes (X, XSTRING).
    Bytes,
    /// Flat or nested structure.
    Structure,
    /// Internal table.
    Table,
}

impl AbapType {
    /// Map an ABAP type code from a discovery response.
    ///
    /// Returns `Err(Error::UnsupportedType)` for unknown codes.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "I" | "b" | "s" | "8" => Ok(AbapType::Integer),
            "P" | "F" | "a" | "e" => Ok(AbapType::Decimal),
            "C" | "N" | "g" => Ok(AbapType::Char),
            "D" => Ok(AbapType::Date),
            "T" => Ok(AbapType::Time),
            "X" | "y" => Ok(AbapType::Bytes),
            "u" | "v" => Ok(AbapType::Structure),
            "h" => Ok(AbapType::Table),
            _ => Err(Error::UnsupportedType {
                code: code.to_string(),
            }),
        }
    }

    /// Canonical type code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            AbapType::Integer => "I",
            AbapType::Decimal => "P",
            AbapType::Char => "C",
            AbapType::Date => "D",
            AbapType::Time => "T",
            AbapType::Bytes => "X",
            AbapType::Structure => "u",
            AbapType::Table => "h",
        }
    }

    /// Whether values of this kind carry nested fields or rows.
    pub fn is_complex(&self) -> bool {
        matches!(self, AbapType::Structure | AbapType::Table)
    }
}

impl std::fmt::Display for AbapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbapType::Integer => write!(f, "INTEGER"),
            AbapType::Decimal => write!(f, "DECIMAL"),
            AbapType::Char => write!(f, "CHAR"),
            AbapType::Date => write!(f, "DATE"),
            AbapType::Time => write!(f, "TIME"),
            AbapType::Bytes => write!(f, "BYTES"),
            AbapType::Structure => write!(f, "STRUCTURE"),
            AbapType::Table => write!(f, "TABLE"),
        }
    }
}
