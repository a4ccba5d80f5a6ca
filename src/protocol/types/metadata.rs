//! Raw discovery descriptors as returned by a transport.
//!
//! These structs preserve what the remote dictionary reports. For the
//! validated, user-facing form use `FunctionMetadata` and
//! `StructureMetadata`.

use super::parameter::Direction;

/// One parameter or field from a discovery response.
#[derive(Debug, Clone)]
pub struct RawParameter {
    /// Parameter name.
    pub name: String,
    /// ABAP type code (`I`, `P`, `C`, `D`, `T`, `X`, `u`, `h`, ...).
    pub type_code: String,
    /// Direction (ignored for structure fields).
    pub direction: Direction,
    /// Referenced structure for structures and tables of structures.
    pub structure: Option<String>,
    /// Element type code for tables of scalars.
    pub row_type_code: Option<String>,
    /// Field width.
    pub length: Option<u32>,
    /// Fractional digits.
    pub decimals: Option<u32>,
    /// Optional flag.
    pub optional: bool,
    /// Short text.
    pub description: Option<String>,
}

impl RawParameter {
    /// Create a raw parameter with minimal info.
    pub fn new(name: impl Into<String>, type_code: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            type_code: type_code.into(),
            direction,
            structure: None,
            row_type_code: None,
            length: None,
            decimals: None,
            optional: false,
            description: None,
        }
    }

    /// Create a raw structure field.
    pub fn field(name: impl Into<String>, type_code: impl Into<String>) -> Self {
        Self::new(name, type_code, Direction::Input)
    }

    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }

    pub fn with_row_type(mut self, row_type_code: impl Into<String>) -> Self {
        self.row_type_code = Some(row_type_code.into());
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Discovery response for a function.
#[derive(Debug, Clone)]
pub struct RawFunctionDescriptor {
    pub name: String,
    /// All parameters in declaration order, every direction mixed.
    pub parameters: Vec<RawParameter>,
}

/// Discovery response for a structure.
#[derive(Debug, Clone)]
pub struct RawStructureDescriptor {
    pub name: String,
    pub fields: Vec<RawParameter>,
}
