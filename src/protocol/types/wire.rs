//! Untyped wire values exchanged with a transport.
//!
//! A wire value only knows its physical shape (text, number, bytes,
//! nested record, rows). Interpreting it requires the parameter
//! descriptor it belongs to.

use bytes::Bytes;
use std::fmt;

/// One untyped value as sent to or received from a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Character data: CHAR fields, dates (`YYYYMMDD`), times (`HHMMSS`),
    /// and numbers from string-oriented transports.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Packed number as decimal text (preserves precision).
    Number(String),
    /// Raw binary payload.
    Bytes(Bytes),
    /// Nested structure.
    Structure(WireRecord),
    /// Table rows in order.
    Table(Vec<WireValue>),
}

impl WireValue {
    /// Text content for string and number values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::String(s) | WireValue::Number(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&WireRecord> {
        match self {
            WireValue::Structure(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_rows(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::Table(rows) => Some(rows),
            _ => None,
        }
    }

    /// Short shape name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            WireValue::String(_) => "string",
            WireValue::Integer(_) => "integer",
            WireValue::Number(_) => "number",
            WireValue::Bytes(_) => "bytes",
            WireValue::Structure(_) => "structure",
            WireValue::Table(_) => "table",
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::String(s) => write!(f, "'{}'", s),
            WireValue::Integer(n) => write!(f, "{}", n),
            WireValue::Number(n) => write!(f, "{}", n),
            WireValue::Bytes(b) => write!(f, "<BYTES: {} bytes>", b.len()),
            WireValue::Structure(r) => write!(f, "<STRUCTURE: {} fields>", r.len()),
            WireValue::Table(rows) => write!(f, "<TABLE: {} rows>", rows.len()),
        }
    }
}

/// Ordered collection of named wire values.
///
/// Used for function inputs, function outputs, and structure contents.
/// Lookups by name are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireRecord {
    entries: Vec<(String, WireValue)>,
}

impl WireRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing an existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: WireValue) {
        let name = name.into();
        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of `insert`.
    pub fn with(mut self, name: impl Into<String>, value: WireValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Get a value by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, WireValue)> for WireRecord {
    fn from_iter<I: IntoIterator<Item = (String, WireValue)>>(iter: I) -> Self {
        let mut record = WireRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl IntoIterator for WireRecord {
    type Item = (String, WireValue);
    type IntoIter = std::vec::IntoIter<(String, WireValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
