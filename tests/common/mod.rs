//! In-memory remote system used by the integration tests.
//!
//! Serves discovery for a handful of test function modules and executes
//! them on wire values, the way a remote system would.

#![allow(dead_code)]

use parking_lot::Mutex;
use rfc_thin_rs::{
    Decimal, Direction, Error, MetadataKind, RawFunctionDescriptor, RawParameter,
    RawStructureDescriptor, Result, Transport, WireRecord, WireValue,
};
use std::collections::HashMap;
use std::time::Duration;

/// Contents of the `IDES_LOGO` bitmap served by `Z_SSRT_GET_BMP_IMAGE`.
pub fn ides_logo() -> Vec<u8> {
    let mut image = b"BM".to_vec();
    image.extend((0..4096u32).map(|i| (i * 31 % 251) as u8));
    image
}

#[derive(Default)]
pub struct MockSystem {
    discoveries: Mutex<HashMap<String, usize>>,
    invocations: Mutex<Vec<(String, WireRecord)>>,
    discovery_delay: Option<Duration>,
}

impl MockSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow down discovery to widen races between concurrent callers.
    pub fn with_discovery_delay(mut self, delay: Duration) -> Self {
        self.discovery_delay = Some(delay);
        self
    }

    /// Number of discovery calls made for a name.
    pub fn discovery_count(&self, name: &str) -> usize {
        self.discoveries.lock().get(name).copied().unwrap_or(0)
    }

    /// Number of invoke calls made.
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().len()
    }

    /// Wire inputs of the most recent invoke.
    pub fn last_inputs(&self) -> Option<WireRecord> {
        self.invocations.lock().last().map(|(_, inputs)| inputs.clone())
    }

    fn record_discovery(&self, name: &str) {
        *self.discoveries.lock().entry(name.to_string()).or_default() += 1;
        if let Some(delay) = self.discovery_delay {
            std::thread::sleep(delay);
        }
    }
}

fn import(name: &str, code: &str) -> RawParameter {
    RawParameter::new(name, code, Direction::Input)
}

fn export(name: &str, code: &str) -> RawParameter {
    RawParameter::new(name, code, Direction::Output)
}

impl Transport for MockSystem {
    fn discover_function(&self, name: &str) -> Result<RawFunctionDescriptor> {
        self.record_discovery(name);
        let parameters = match name {
            "Z_SSRT_SUM" => vec![
                import("I_NUM1", "I"),
                import("I_NUM2", "I"),
                export("E_RESULT", "I"),
            ],
            "Z_SSRT_ADD" => vec![
                import("I_ADD", "I"),
                RawParameter::new("C_NUM", "I", Direction::Both),
            ],
            "Z_SSRT_DIVIDE" => vec![
                import("I_NUM1", "I"),
                import("I_NUM2", "I"),
                export("E_QUOTIENT", "P").with_length(8).with_decimals(2),
                export("E_REMAINDER", "I"),
            ],
            "Z_SSRT_IN_OUT" => vec![
                import("I_ID", "I").optional(),
                import("I_PRICE", "P").with_length(16).with_decimals(3).optional(),
                import("I_DATUM", "D").optional(),
                import("I_UZEIT", "T").optional(),
                import("I_ACTIVE", "C").with_length(1).optional(),
                import("I_MARA", "u").with_structure("ZMARA").optional(),
                import("I_MULTIPLE_ID", "h").with_row_type("I").optional(),
                import("I_MULTIPLE_NAME", "h").with_row_type("C").with_length(10).optional(),
                export("E_ID", "I"),
                export("E_PRICE", "P").with_length(16).with_decimals(3),
                export("E_DATUM", "D"),
                export("E_UZEIT", "T"),
                export("E_ACTIVE", "C").with_length(1),
                export("E_MARA_ID", "I"),
                export("E_MARA_DATUM", "D"),
                export("E_MARA_UZEIT", "T"),
                export("E_MULTIPLE_ID", "h").with_row_type("I"),
                export("E_MULTIPLE_NAME", "h").with_row_type("C").with_length(10),
            ],
            "Z_SSRT_EMPTY_DATE" => vec![export("E_DATUM", "D")],
            "Z_SSRT_MARA_LIST" => vec![
                import("I_MIN_ID", "I").optional(),
                RawParameter::new("T_MARA", "h", Direction::Both).with_structure("ZMARA"),
            ],
            "Z_SSRT_GET_BMP_IMAGE" => vec![
                import("I_OBJECT", "C").with_length(10),
                import("I_NAME", "C").with_length(70),
                import("I_ID", "C").with_length(4),
                import("I_BTYPE", "C").with_length(4),
                export("E_IMAGE", "y"),
            ],
            _ => return Err(Error::metadata_not_found(MetadataKind::Function, name)),
        };
        Ok(RawFunctionDescriptor {
            name: name.to_string(),
            parameters,
        })
    }

    fn discover_structure(&self, name: &str) -> Result<RawStructureDescriptor> {
        self.record_discovery(name);
        match name {
            "ZMARA" => Ok(RawStructureDescriptor {
                name: name.to_string(),
                fields: vec![
                    RawParameter::field("ID", "I"),
                    RawParameter::field("DATUM", "D"),
                    RawParameter::field("UZEIT", "T"),
                ],
            }),
            _ => Err(Error::metadata_not_found(MetadataKind::Structure, name)),
        }
    }

    fn invoke(&self, name: &str, inputs: &WireRecord) -> Result<WireRecord> {
        self.invocations
            .lock()
            .push((name.to_string(), inputs.clone()));

        match name {
            "Z_SSRT_SUM" => {
                let total = integer(inputs.get("I_NUM1")) + integer(inputs.get("I_NUM2"));
                Ok(WireRecord::new().with("E_RESULT", WireValue::Integer(total)))
            }
            "Z_SSRT_ADD" => {
                let total = integer(inputs.get("C_NUM")) + integer(inputs.get("I_ADD"));
                Ok(WireRecord::new().with("C_NUM", WireValue::Integer(total)))
            }
            "Z_SSRT_DIVIDE" => {
                let dividend = integer(inputs.get("I_NUM1"));
                let divisor = integer(inputs.get("I_NUM2"));
                if divisor == 0 {
                    return Err(Error::remote("DIVIDE_BY_ZERO"));
                }
                let quotient = Decimal::new(i128::from(dividend) * 100 / i128::from(divisor), 2);
                Ok(WireRecord::new()
                    .with("E_QUOTIENT", WireValue::Number(quotient.to_string()))
                    .with("E_REMAINDER", WireValue::Integer(dividend % divisor)))
            }
            "Z_SSRT_IN_OUT" => Ok(in_out(inputs)),
            "Z_SSRT_MARA_LIST" => Ok(mara_list(inputs)),
            "Z_SSRT_EMPTY_DATE" => {
                Ok(WireRecord::new().with("E_DATUM", WireValue::String("00000000".to_string())))
            }
            "Z_SSRT_GET_BMP_IMAGE" => {
                let name = inputs.get("I_NAME").and_then(WireValue::as_str).unwrap_or("");
                if name.trim_end() != "IDES_LOGO" {
                    return Err(Error::remote("NOT_FOUND"));
                }
                Ok(WireRecord::new().with("E_IMAGE", WireValue::Bytes(ides_logo().into())))
            }
            _ => Err(Error::transport(format!("function {} is not active", name))),
        }
    }
}

/// Copy every import to its export, the way Z_SSRT_IN_OUT does.
fn in_out(inputs: &WireRecord) -> WireRecord {
    let text = |s: &str| WireValue::String(s.to_string());
    let echo = |name: &str, initial: WireValue| inputs.get(name).cloned().unwrap_or(initial);
    let mara = inputs.get("I_MARA").and_then(WireValue::as_record);
    let mara_field = |name: &str, initial: WireValue| {
        mara.and_then(|m| m.get(name)).cloned().unwrap_or(initial)
    };

    WireRecord::new()
        .with("E_ID", echo("I_ID", WireValue::Integer(0)))
        .with("E_PRICE", echo("I_PRICE", WireValue::Number("0.000".to_string())))
        .with("E_DATUM", echo("I_DATUM", text("00000000")))
        .with("E_UZEIT", echo("I_UZEIT", text("000000")))
        .with("E_ACTIVE", echo("I_ACTIVE", text(" ")))
        .with("E_MARA_ID", mara_field("ID", WireValue::Integer(0)))
        .with("E_MARA_DATUM", mara_field("DATUM", text("00000000")))
        .with("E_MARA_UZEIT", mara_field("UZEIT", text("000000")))
        .with("E_MULTIPLE_ID", echo("I_MULTIPLE_ID", WireValue::Table(Vec::new())))
        .with("E_MULTIPLE_NAME", echo("I_MULTIPLE_NAME", WireValue::Table(Vec::new())))
}

/// Keep the T_MARA rows with ID >= I_MIN_ID, in order.
fn mara_list(inputs: &WireRecord) -> WireRecord {
    let min_id = integer(inputs.get("I_MIN_ID"));
    let rows = inputs
        .get("T_MARA")
        .and_then(WireValue::as_rows)
        .unwrap_or_default()
        .iter()
        .filter(|row| {
            let id = row.as_record().and_then(|r| r.get("ID"));
            integer(id) >= min_id
        })
        .cloned()
        .collect();
    WireRecord::new().with("T_MARA", WireValue::Table(rows))
}

fn integer(value: Option<&WireValue>) -> i64 {
    match value {
        Some(WireValue::Integer(n)) => *n,
        Some(WireValue::String(s)) | Some(WireValue::Number(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
