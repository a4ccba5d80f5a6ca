//! RFC metadata and value types.

mod abap_type;
mod binary;
mod decimal;
mod function;
mod metadata;
mod parameter;
mod value;
mod wire;

pub use abap_type::AbapType;
pub use binary::RfcStream;
pub use decimal::Decimal;
pub use function::{FunctionMetadata, StructureMetadata};
pub use metadata::{RawFunctionDescriptor, RawParameter, RawStructureDescriptor};
pub use parameter::{Direction, ParameterDescriptor};
pub use value::{FromRfcValue, RfcRecord, RfcStructure, RfcValue, ToRfcValue};
pub use wire::{WireRecord, WireValue};
