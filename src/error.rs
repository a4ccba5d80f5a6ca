//! Error types for the RFC thin client.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for RFC operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of metadata a discovery call was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    Function,
    Structure,
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKind::Function => write!(f, "function"),
            MetadataKind::Structure => write!(f, "structure"),
        }
    }
}

/// Error type for RFC thin client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a binary stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A supplied parameter name does not exist on the function.
    #[error("Parameter {parameter} was not found on function {function}.")]
    UnknownParameter { parameter: String, function: String },

    /// A requested output name does not exist on the function.
    #[error("Output parameter {parameter} was not found on function {function}.")]
    OutputNotFound { parameter: String, function: String },

    /// The remote system does not know the function or structure.
    #[error("Metadata for {kind} {name} was not found")]
    MetadataNotFound { kind: MetadataKind, name: String },

    /// Business exception raised by the remote function.
    ///
    /// Displays as the remote symbolic code, verbatim.
    #[error("{code}")]
    Remote { code: String },

    /// Type conversion error.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Failure reported by the transport.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Two parameters or fields with the same case-insensitive name.
    #[error("Duplicate parameter {parameter} in {owner}")]
    DuplicateParameter { parameter: String, owner: String },

    /// Unknown wire type code in a discovery response.
    #[error("Unsupported ABAP data type: {code}")]
    UnsupportedType { code: String },

    /// A structure value carries a field the structure does not have.
    #[error("Field {field} was not found on structure {structure}.")]
    UnknownField { field: String, structure: String },

    /// A metadata cache was handed to a connection for another destination.
    #[error("Metadata cache belongs to destination {expected}, not {actual}")]
    DestinationMismatch { expected: String, actual: String },

    /// Invalid destination string.
    #[error("Invalid destination: {message}")]
    InvalidDestination { message: String },
}

impl Error {
    /// Create a remote application error.
    pub fn remote(code: impl Into<String>) -> Self {
        Self::Remote { code: code.into() }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a metadata-not-found error.
    pub fn metadata_not_found(kind: MetadataKind, name: impl Into<String>) -> Self {
        Self::MetadataNotFound {
            kind,
            name: name.into(),
        }
    }
}
