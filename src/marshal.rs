//! Conversion between host values and wire values, driven by parameter
//! metadata.
//!
//! Inputs: every supplied value is matched and converted before anything
//! is sent, so a bad value fails the call without a remote side effect.
//! Outputs: converted one parameter at a time, when the caller asks.
//!
//! Structures and tables recurse; structure layouts come from the
//! metadata cache and may trigger their own discovery.

use crate::cache::MetadataResolver;
use crate::error::{Error, Result};
use crate::params::{match_parameters, RfcParameter};
use crate::protocol::codec::{
    decode_date, decode_time, encode_date, encode_flag, encode_time, format_decimal, pad_char,
    parse_decimal, parse_integer, trim_char, EMPTY_DATE, EMPTY_TIME,
};
use crate::protocol::types::{
    AbapType, Decimal, FunctionMetadata, ParameterDescriptor, RfcRecord, RfcValue, WireRecord,
    WireValue,
};
use tracing::trace;

/// Parameter marshaller for one connection.
#[derive(Clone, Copy)]
pub struct Marshaller<'a> {
    resolver: MetadataResolver<'a>,
}

impl<'a> Marshaller<'a> {
    pub fn new(resolver: MetadataResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Match and convert all supplied parameters into wire inputs.
    ///
    /// NULL values are omitted so the remote side applies its default,
    /// except for DATE and TIME which send their all-zero form.
    pub fn encode_inputs(
        &self,
        metadata: &FunctionMetadata,
        params: Vec<RfcParameter>,
    ) -> Result<WireRecord> {
        let mut inputs = WireRecord::new();
        for (descriptor, value) in match_parameters(metadata, params)? {
            let wire = self
                .encode_value(descriptor, &value)
                .map_err(|e| in_context(e, &descriptor.name))?;
            match wire {
                Some(wire) => inputs.insert(descriptor.name.clone(), wire),
                None => trace!(parameter = %descriptor.name, "omitting NULL input"),
            }
        }
        Ok(inputs)
    }

    /// Convert one host value for a parameter or field.
    ///
    /// Returns `None` for NULL on kinds without a wire null.
    pub fn encode_value(
        &self,
        descriptor: &ParameterDescriptor,
        value: &RfcValue,
    ) -> Result<Option<WireValue>> {
        if value.is_null() {
            return Ok(match descriptor.data_type {
                AbapType::Date => Some(WireValue::String(EMPTY_DATE.to_string())),
                AbapType::Time => Some(WireValue::String(EMPTY_TIME.to_string())),
                _ => None,
            });
        }

        let wire = match descriptor.data_type {
            AbapType::Integer => WireValue::Integer(to_integer(descriptor, value)?),
            AbapType::Decimal => {
                let decimal = to_decimal(descriptor, value)?;
                WireValue::Number(format_decimal(decimal, descriptor.decimals)?)
            }
            AbapType::Char => {
                let text = match value {
                    RfcValue::String(s) => s.clone(),
                    RfcValue::Bool(b) => encode_flag(*b).to_string(),
                    RfcValue::Integer(n) => n.to_string(),
                    RfcValue::Decimal(d) => d.to_string(),
                    RfcValue::Float(x) => Decimal::try_from(*x)?.to_string(),
                    _ => return Err(mismatch(descriptor, value.kind())),
                };
                WireValue::String(pad_char(&text, descriptor.length)?)
            }
            AbapType::Date => {
                let date = match value {
                    RfcValue::Date(d) => *d,
                    RfcValue::DateTime(dt) => Some(dt.date()),
                    RfcValue::String(s) => decode_date(s)?,
                    _ => return Err(mismatch(descriptor, value.kind())),
                };
                WireValue::String(encode_date(date))
            }
            AbapType::Time => {
                let time = match value {
                    RfcValue::Time(t) => *t,
                    RfcValue::DateTime(dt) => Some(dt.time()),
                    RfcValue::String(s) => decode_time(s)?,
                    _ => return Err(mismatch(descriptor, value.kind())),
                };
                WireValue::String(encode_time(time))
            }
            AbapType::Bytes => match value {
                RfcValue::Bytes(b) => {
                    if let Some(length) = descriptor.length {
                        if b.len() > length as usize {
                            return Err(Error::type_conversion(format!(
                                "{} bytes exceed field length {}",
                                b.len(),
                                length
                            )));
                        }
                    }
                    WireValue::Bytes(b.clone())
                }
                _ => return Err(mismatch(descriptor, value.kind())),
            },
            AbapType::Structure => match value {
                RfcValue::Record(record) => WireValue::Structure(self.encode_record(descriptor, record)?),
                _ => return Err(mismatch(descriptor, value.kind())),
            },
            AbapType::Table => match value {
                RfcValue::Table(rows) => {
                    let row_descriptor = descriptor.row_descriptor();
                    let mut wire_rows = Vec::with_capacity(rows.len());
                    for (index, row) in rows.iter().enumerate() {
                        let wire_row = self
                            .encode_value(&row_descriptor, row)
                            .map_err(|e| in_context(e, &format!("row {}", index)))?
                            .ok_or_else(|| {
                                Error::type_conversion(format!("row {} is NULL", index))
                            })?;
                        wire_rows.push(wire_row);
                    }
                    WireValue::Table(wire_rows)
                }
                _ => return Err(mismatch(descriptor, value.kind())),
            },
        };
        Ok(Some(wire))
    }

    fn encode_record(&self, descriptor: &ParameterDescriptor, record: &RfcRecord) -> Result<WireRecord> {
        let structure = self.resolver.structure(structure_name(descriptor)?)?;
        let mut wire = WireRecord::new();
        for (name, value) in record.iter() {
            let field = structure.get_field(name).ok_or_else(|| Error::UnknownField {
                field: name.to_string(),
                structure: structure.name.clone(),
            })?;
            if let Some(encoded) = self
                .encode_value(field, value)
                .map_err(|e| in_context(e, &field.name))?
            {
                wire.insert(field.name.clone(), encoded);
            }
        }
        Ok(wire)
    }

    /// Convert one wire value back to a host value.
    ///
    /// A parameter the transport did not return decodes as NULL.
    pub fn decode_value(
        &self,
        descriptor: &ParameterDescriptor,
        wire: Option<&WireValue>,
    ) -> Result<RfcValue> {
        let Some(wire) = wire else {
            return Ok(RfcValue::Null);
        };

        let value = match (descriptor.data_type, wire) {
            (AbapType::Integer, WireValue::Integer(n)) => RfcValue::Integer(*n),
            (AbapType::Integer, WireValue::String(s) | WireValue::Number(s)) => {
                RfcValue::Integer(parse_integer(s)?)
            }
            (AbapType::Decimal, WireValue::String(s) | WireValue::Number(s)) => {
                RfcValue::Decimal(parse_decimal(s)?)
            }
            (AbapType::Decimal, WireValue::Integer(n)) => RfcValue::Decimal(Decimal::from(*n)),
            (AbapType::Char, WireValue::String(s)) => RfcValue::String(trim_char(s).to_string()),
            (AbapType::Char, WireValue::Number(s)) => RfcValue::String(s.clone()),
            (AbapType::Char, WireValue::Integer(n)) => RfcValue::String(n.to_string()),
            (AbapType::Date, WireValue::String(s)) => RfcValue::Date(decode_date(s)?),
            (AbapType::Time, WireValue::String(s)) => RfcValue::Time(decode_time(s)?),
            (AbapType::Bytes, WireValue::Bytes(b)) => RfcValue::Bytes(b.clone()),
            (AbapType::Structure, WireValue::Structure(record)) => {
                RfcValue::Record(self.decode_record(descriptor, record)?)
            }
            (AbapType::Table, WireValue::Table(rows)) => {
                let row_descriptor = descriptor.row_descriptor();
                let decoded: Result<Vec<RfcValue>> = rows
                    .iter()
                    .enumerate()
                    .map(|(index, row)| {
                        self.decode_value(&row_descriptor, Some(row))
                            .map_err(|e| in_context(e, &format!("row {}", index)))
                    })
                    .collect();
                RfcValue::Table(decoded?)
            }
            (_, other) => return Err(mismatch(descriptor, other.kind())),
        };
        Ok(value)
    }

    fn decode_record(&self, descriptor: &ParameterDescriptor, wire: &WireRecord) -> Result<RfcRecord> {
        let structure = self.resolver.structure(structure_name(descriptor)?)?;
        let mut record = RfcRecord::new();
        for field in &structure.fields {
            if let Some(value) = wire.get(&field.name) {
                let decoded = self
                    .decode_value(field, Some(value))
                    .map_err(|e| in_context(e, &field.name))?;
                record.set(field.name.clone(), decoded);
            }
        }
        Ok(record)
    }
}

fn to_integer(descriptor: &ParameterDescriptor, value: &RfcValue) -> Result<i64> {
    let integral = |d: Decimal| {
        d.to_i64()
            .ok_or_else(|| Error::type_conversion(format!("{} is not an integer", d)))
    };
    match value {
        RfcValue::Integer(n) => Ok(*n),
        RfcValue::Decimal(d) => integral(*d),
        RfcValue::Float(x) => integral(Decimal::try_from(*x)?),
        RfcValue::String(s) => parse_integer(numeric_text(s)?),
        other => Err(mismatch(descriptor, other.kind())),
    }
}

fn to_decimal(descriptor: &ParameterDescriptor, value: &RfcValue) -> Result<Decimal> {
    match value {
        RfcValue::Decimal(d) => Ok(*d),
        RfcValue::Float(x) => Decimal::try_from(*x),
        RfcValue::Integer(n) => Ok(Decimal::from(*n)),
        RfcValue::String(s) => parse_decimal(numeric_text(s)?),
        other => Err(mismatch(descriptor, other.kind())),
    }
}

/// Blank text only means "initial value" on the way back; as an input it
/// is not a number.
fn numeric_text(text: &str) -> Result<&str> {
    if text.trim().is_empty() {
        return Err(Error::type_conversion("blank text is not a number"));
    }
    Ok(text)
}

fn structure_name(descriptor: &ParameterDescriptor) -> Result<&str> {
    descriptor.structure_ref.as_deref().ok_or_else(|| {
        Error::type_conversion(format!("{} has no structure reference", descriptor.name))
    })
}

fn mismatch(descriptor: &ParameterDescriptor, actual: &str) -> Error {
    Error::type_conversion(format!(
        "expected {} value, got {}",
        descriptor.data_type, actual
    ))
}

/// Prefix conversion errors with the parameter, field or row they hit.
fn in_context(error: Error, context: &str) -> Error {
    match error {
        Error::TypeConversion { message } => {
            Error::type_conversion(format!("{}: {}", context, message))
        }
        other => other,
    }
}
