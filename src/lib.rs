//! RFC Thin Client for Rust
//!
//! A client-side access layer for calling remote function modules whose
//! signatures are discovered at call time. The crate caches discovered
//! metadata per destination and converts between Rust values and the
//! string-oriented wire representation; the actual network exchange is
//! done by a pluggable [`Transport`].
//!
//! # Example
//!
//! ```no_run
//! use rfc_thin_rs::{rfc_params, ConnectParams, Connection, Decimal, Result, Transport};
//!
//! fn divide(transport: impl Transport) -> Result<()> {
//!     let conn = Connection::new(transport, ConnectParams::parse("TST:NSP/001")?)?;
//!
//!     let result = conn.execute_function("Z_SSRT_DIVIDE", rfc_params! { i_num1: 5, i_num2: 2 })?;
//!     let quotient: Decimal = result.get_output("e_quotient")?;
//!     let remainder: i32 = result.get_output("e_remainder")?;
//!     println!("{} remainder {}", quotient, remainder);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod connection;
pub mod error;
pub mod marshal;
pub mod params;
pub mod protocol;

// Re-export main types
pub use cache::{MetadataCache, MetadataLoader, MetadataResolver, TransportLoader};
pub use connection::{Connection, FunctionResult};
pub use error::{Error, MetadataKind, Result};
pub use params::{IntoParameters, Parameters, RfcParameter};
pub use protocol::connect::ConnectParams;
pub use protocol::transport::Transport;
pub use protocol::types::{
    AbapType, Decimal, Direction, FromRfcValue, FunctionMetadata, ParameterDescriptor,
    RawFunctionDescriptor, RawParameter, RawStructureDescriptor, RfcRecord, RfcStream,
    RfcStructure, RfcValue, StructureMetadata, ToRfcValue, WireRecord, WireValue,
};
