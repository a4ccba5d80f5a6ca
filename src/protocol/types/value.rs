//! Host-side value model.
//!
//! `RfcValue` sits between Rust values and wire values. Callers turn
//! their values into `RfcValue` with [`ToRfcValue`]; the marshaller turns
//! `RfcValue` into wire values using parameter metadata, and decoded
//! outputs come back as `RfcValue` for [`FromRfcValue`] to finish.

use super::binary::RfcStream;
use super::decimal::Decimal;
use crate::error::{Error, Result};
use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Typed host value.
#[derive(Debug, Clone, PartialEq)]
pub enum RfcValue {
    /// No value.
    Null,
    /// Integer.
    Integer(i64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Binary float; converted to an exact decimal when written.
    Float(f64),
    /// Text.
    String(String),
    /// Boolean flag.
    Bool(bool),
    /// Date; `None` is the all-zero "no date".
    Date(Option<NaiveDate>),
    /// Time of day; `None` is a blank time.
    Time(Option<NaiveTime>),
    /// Timestamp. Written to a DATE field it keeps the date part, to a
    /// TIME field the time part.
    DateTime(NaiveDateTime),
    /// Binary data.
    Bytes(Bytes),
    /// Structure contents.
    Record(RfcRecord),
    /// Table rows.
    Table(Vec<RfcValue>),
}

impl RfcValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, RfcValue::Null)
    }

    /// Whether the value means "absent": NULL, no date, or blank time.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            RfcValue::Null | RfcValue::Date(None) | RfcValue::Time(None)
        )
    }

    /// Short type name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RfcValue::Null => "null",
            RfcValue::Integer(_) => "integer",
            RfcValue::Decimal(_) => "decimal",
            RfcValue::Float(_) => "float",
            RfcValue::String(_) => "string",
            RfcValue::Bool(_) => "bool",
            RfcValue::Date(_) => "date",
            RfcValue::Time(_) => "time",
            RfcValue::DateTime(_) => "datetime",
            RfcValue::Bytes(_) => "bytes",
            RfcValue::Record(_) => "structure",
            RfcValue::Table(_) => "table",
        }
    }

    fn mismatch(&self, target: &str) -> Error {
        Error::type_conversion(format!("cannot convert {} value {} to {}", self.kind(), self, target))
    }
}

impl fmt::Display for RfcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RfcValue::Null => write!(f, "NULL"),
            RfcValue::Integer(n) => write!(f, "{}", n),
            RfcValue::Decimal(d) => write!(f, "{}", d),
            RfcValue::Float(x) => write!(f, "{}", x),
            RfcValue::String(s) => write!(f, "'{}'", s),
            RfcValue::Bool(b) => write!(f, "{}", b),
            RfcValue::Date(Some(d)) => write!(f, "{}", d.format("%Y-%m-%d")),
            RfcValue::Date(None) => write!(f, "<no date>"),
            RfcValue::Time(Some(t)) => write!(f, "{}", t.format("%H:%M:%S")),
            RfcValue::Time(None) => write!(f, "<no time>"),
            RfcValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            RfcValue::Bytes(b) => write!(f, "<BYTES: {} bytes>", b.len()),
            RfcValue::Record(r) => write!(f, "<STRUCTURE: {} fields>", r.len()),
            RfcValue::Table(rows) => write!(f, "<TABLE: {} rows>", rows.len()),
        }
    }
}

/// Named field values of a structure, in order.
///
/// Field lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RfcRecord {
    fields: Vec<(String, RfcValue)>,
}

impl RfcRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing one with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToRfcValue) {
        let name = name.into();
        let value = value.to_rfc_value();
        match self
            .fields
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(field) => field.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder form of `set`.
    pub fn with(mut self, name: impl Into<String>, value: impl ToRfcValue) -> Self {
        self.set(name, value);
        self
    }

    /// Get a raw field value (case-insensitive).
    pub fn get_value(&self, name: &str) -> Option<&RfcValue> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Get a field converted to `T`.
    ///
    /// A missing field reads as NULL, so `Option<T>` yields `None`.
    pub fn get<T: FromRfcValue>(&self, name: &str) -> Result<T> {
        let value = self.get_value(name).cloned().unwrap_or(RfcValue::Null);
        T::from_rfc_value(value).map_err(|e| match e {
            Error::TypeConversion { message } => {
                Error::type_conversion(format!("field {}: {}", name, message))
            }
            other => other,
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RfcValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl IntoIterator for RfcRecord {
    type Item = (String, RfcValue);
    type IntoIter = std::vec::IntoIter<(String, RfcValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Conversion from a Rust value into an `RfcValue`.
pub trait ToRfcValue {
    fn to_rfc_value(&self) -> RfcValue;
}

/// Conversion from a decoded `RfcValue` into a Rust value.
pub trait FromRfcValue: Sized {
    fn from_rfc_value(value: RfcValue) -> Result<Self>;
}

/// A Rust struct that maps onto an ABAP structure.
///
/// Implement this and invoke [`impl_rfc_structure!`](crate::impl_rfc_structure)
/// to pass the struct as a structure parameter or read it back from an
/// output, or as table rows through `Vec<T>`.
pub trait RfcStructure: Sized {
    /// Field values of this struct, keyed by ABAP field name.
    fn to_record(&self) -> RfcRecord;

    /// Rebuild the struct from decoded field values.
    fn from_record(record: &RfcRecord) -> Result<Self>;
}

/// Implement [`ToRfcValue`] and [`FromRfcValue`] for an [`RfcStructure`].
#[macro_export]
macro_rules! impl_rfc_structure {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ToRfcValue for $ty {
                fn to_rfc_value(&self) -> $crate::RfcValue {
                    $crate::RfcValue::Record(<$ty as $crate::RfcStructure>::to_record(self))
                }
            }

            impl $crate::FromRfcValue for $ty {
                fn from_rfc_value(value: $crate::RfcValue) -> $crate::Result<Self> {
                    match value {
                        $crate::RfcValue::Record(record) => {
                            <$ty as $crate::RfcStructure>::from_record(&record)
                        }
                        other => Err($crate::Error::type_conversion(format!(
                            "cannot convert {} value to {}",
                            other.kind(),
                            stringify!($ty)
                        ))),
                    }
                }
            }
        )+
    };
}

impl ToRfcValue for RfcValue {
    fn to_rfc_value(&self) -> RfcValue {
        self.clone()
    }
}

impl FromRfcValue for RfcValue {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        Ok(value)
    }
}

impl<T: ToRfcValue + ?Sized> ToRfcValue for &T {
    fn to_rfc_value(&self) -> RfcValue {
        (**self).to_rfc_value()
    }
}

impl<T: ToRfcValue> ToRfcValue for Option<T> {
    fn to_rfc_value(&self) -> RfcValue {
        match self {
            Some(v) => v.to_rfc_value(),
            None => RfcValue::Null,
        }
    }
}

impl<T: FromRfcValue> FromRfcValue for Option<T> {
    /// NULL, the all-zero date and a blank time read as `None`.
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        if value.is_absent() {
            return Ok(None);
        }
        T::from_rfc_value(value).map(Some)
    }
}

impl<T: ToRfcValue> ToRfcValue for [T] {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Table(self.iter().map(ToRfcValue::to_rfc_value).collect())
    }
}

impl<T: ToRfcValue, const N: usize> ToRfcValue for [T; N] {
    fn to_rfc_value(&self) -> RfcValue {
        self.as_slice().to_rfc_value()
    }
}

impl<T: ToRfcValue> ToRfcValue for Vec<T> {
    fn to_rfc_value(&self) -> RfcValue {
        self.as_slice().to_rfc_value()
    }
}

impl<T: FromRfcValue> FromRfcValue for Vec<T> {
    /// Table rows in order. NULL reads as an empty table.
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Table(rows) => rows.into_iter().map(T::from_rfc_value).collect(),
            RfcValue::Null => Ok(Vec::new()),
            other => Err(other.mismatch("table")),
        }
    }
}

macro_rules! impl_integer {
    ($($ty:ty),+) => {
        $(
            impl ToRfcValue for $ty {
                fn to_rfc_value(&self) -> RfcValue {
                    RfcValue::Integer(*self as i64)
                }
            }

            impl FromRfcValue for $ty {
                fn from_rfc_value(value: RfcValue) -> Result<Self> {
                    let n: i64 = match &value {
                        RfcValue::Integer(n) => *n,
                        RfcValue::Decimal(d) => d.to_i64().ok_or_else(|| value.mismatch(stringify!($ty)))?,
                        RfcValue::String(s) => crate::protocol::codec::parse_integer(s)?,
                        _ => return Err(value.mismatch(stringify!($ty))),
                    };
                    <$ty>::try_from(n).map_err(|_| {
                        Error::type_conversion(format!("{} out of range for {}", n, stringify!($ty)))
                    })
                }
            }
        )+
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl ToRfcValue for Decimal {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Decimal(*self)
    }
}

impl FromRfcValue for Decimal {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Decimal(d) => Ok(d),
            RfcValue::Float(x) => Decimal::try_from(x),
            RfcValue::Integer(n) => Ok(Decimal::from(n)),
            RfcValue::String(s) => crate::protocol::codec::parse_decimal(&s),
            other => Err(other.mismatch("Decimal")),
        }
    }
}

impl ToRfcValue for f64 {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Float(*self)
    }
}

impl FromRfcValue for f64 {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Float(x) => Ok(x),
            RfcValue::Decimal(d) => Ok(d.to_f64()),
            RfcValue::Integer(n) => Ok(n as f64),
            other => Err(other.mismatch("f64")),
        }
    }
}

impl ToRfcValue for str {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::String(self.to_string())
    }
}

impl ToRfcValue for String {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::String(self.clone())
    }
}

impl FromRfcValue for String {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::String(s) => Ok(s),
            RfcValue::Integer(n) => Ok(n.to_string()),
            RfcValue::Decimal(d) => Ok(d.to_string()),
            other => Err(other.mismatch("String")),
        }
    }
}

impl ToRfcValue for char {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::String(self.to_string())
    }
}

impl FromRfcValue for char {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match &value {
            RfcValue::String(s) if s.is_empty() => Ok(' '),
            RfcValue::String(s) if s.chars().count() == 1 => Ok(s.chars().next().unwrap_or(' ')),
            _ => Err(value.mismatch("char")),
        }
    }
}

impl ToRfcValue for bool {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Bool(*self)
    }
}

impl FromRfcValue for bool {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Bool(b) => Ok(b),
            RfcValue::String(s) => crate::protocol::codec::decode_flag(&s),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl ToRfcValue for NaiveDate {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Date(Some(*self))
    }
}

impl FromRfcValue for NaiveDate {
    /// The all-zero date reads as `NaiveDate::MIN`.
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Date(Some(d)) => Ok(d),
            RfcValue::Date(None) | RfcValue::Null => Ok(NaiveDate::MIN),
            RfcValue::DateTime(dt) => Ok(dt.date()),
            other => Err(other.mismatch("NaiveDate")),
        }
    }
}

impl ToRfcValue for NaiveTime {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Time(Some(*self))
    }
}

impl FromRfcValue for NaiveTime {
    /// A blank time reads as midnight.
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Time(Some(t)) => Ok(t),
            RfcValue::Time(None) | RfcValue::Null => Ok(NaiveTime::default()),
            RfcValue::DateTime(dt) => Ok(dt.time()),
            other => Err(other.mismatch("NaiveTime")),
        }
    }
}

impl ToRfcValue for NaiveDateTime {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::DateTime(*self)
    }
}

impl FromRfcValue for NaiveDateTime {
    /// DATE fields read at midnight; TIME fields read on 0001-01-01.
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::DateTime(dt) => Ok(dt),
            RfcValue::Date(Some(d)) => Ok(d.and_time(NaiveTime::default())),
            RfcValue::Date(None) | RfcValue::Null => Ok(NaiveDateTime::MIN),
            RfcValue::Time(t) => {
                let day_one = NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN);
                Ok(day_one.and_time(t.unwrap_or(NaiveTime::default())))
            }
            other => Err(other.mismatch("NaiveDateTime")),
        }
    }
}

impl ToRfcValue for Bytes {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Bytes(self.clone())
    }
}

impl FromRfcValue for Bytes {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Bytes(b) => Ok(b),
            other => Err(other.mismatch("Bytes")),
        }
    }
}

impl FromRfcValue for RfcStream {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        Bytes::from_rfc_value(value).map(RfcStream::new)
    }
}

impl ToRfcValue for RfcRecord {
    fn to_rfc_value(&self) -> RfcValue {
        RfcValue::Record(self.clone())
    }
}

impl FromRfcValue for RfcRecord {
    fn from_rfc_value(value: RfcValue) -> Result<Self> {
        match value {
            RfcValue::Record(r) => Ok(r),
            other => Err(other.mismatch("structure")),
        }
    }
}
