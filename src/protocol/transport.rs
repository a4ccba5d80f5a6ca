//! Transport contract.
//!
//! A transport performs the two kinds of remote calls this crate needs:
//! metadata discovery and the data exchange itself. Concrete transports
//! (binary RFC, SOAP gateway) live outside this crate; connection setup,
//! pooling and timeouts are theirs to handle.

use crate::error::Result;
use crate::protocol::types::{RawFunctionDescriptor, RawStructureDescriptor, WireRecord};

/// Remote access used by `Connection`.
///
/// All calls block the calling thread until the remote side answers.
///
/// Error contract:
/// - unknown function or structure names fail with
///   `Error::MetadataNotFound`
/// - business exceptions raised by the remote function fail with
///   `Error::Remote` carrying the exception's symbolic name
/// - anything else is `Error::Transport` (or `Error::Io`)
pub trait Transport {
    /// Fetch the parameter layout of a function.
    fn discover_function(&self, name: &str) -> Result<RawFunctionDescriptor>;

    /// Fetch the field layout of a structure.
    fn discover_structure(&self, name: &str) -> Result<RawStructureDescriptor>;

    /// Call a function.
    ///
    /// `inputs` is keyed by the parameter names from discovery. The
    /// returned record holds the output and changing parameters.
    fn invoke(&self, name: &str, inputs: &WireRecord) -> Result<WireRecord>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn discover_function(&self, name: &str) -> Result<RawFunctionDescriptor> {
        (**self).discover_function(name)
    }

    fn discover_structure(&self, name: &str) -> Result<RawStructureDescriptor> {
        (**self).discover_structure(name)
    }

    fn invoke(&self, name: &str, inputs: &WireRecord) -> Result<WireRecord> {
        (**self).invoke(name, inputs)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn discover_function(&self, name: &str) -> Result<RawFunctionDescriptor> {
        (**self).discover_function(name)
    }

    fn discover_structure(&self, name: &str) -> Result<RawStructureDescriptor> {
        (**self).discover_structure(name)
    }

    fn invoke(&self, name: &str, inputs: &WireRecord) -> Result<WireRecord> {
        (**self).invoke(name, inputs)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn discover_function(&self, name: &str) -> Result<RawFunctionDescriptor> {
        (**self).discover_function(name)
    }

    fn discover_structure(&self, name: &str) -> Result<RawStructureDescriptor> {
        (**self).discover_structure(name)
    }

    fn invoke(&self, name: &str, inputs: &WireRecord) -> Result<WireRecord> {
        (**self).invoke(name, inputs)
    }
}
