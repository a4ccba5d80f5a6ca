//! Wire-side building blocks: destination parameters, the transport
//! contract, metadata and value types, and per-kind conversion rules.

pub mod codec;
pub mod connect;
pub mod transport;
pub mod types;

pub use connect::ConnectParams;
pub use transport::Transport;
pub use types::{AbapType, FunctionMetadata, StructureMetadata, WireRecord, WireValue};
