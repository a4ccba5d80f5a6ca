//! Parameter descriptors for function parameters and structure fields.

use super::abap_type::AbapType;

/// Direction of a function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// IMPORTING parameter (sent to the remote function).
    Input,
    /// EXPORTING parameter (returned by the remote function).
    Output,
    /// CHANGING or TABLES parameter, both sent and returned.
    Both,
}

impl Direction {
    pub fn is_input(&self) -> bool {
        matches!(self, Direction::Input | Direction::Both)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Direction::Output | Direction::Both)
    }
}

/// One named parameter of a function, or one named field of a structure.
///
/// Names compare case-insensitively: `i_num1` and `I_NUM1` denote the
/// same parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter name as reported by the remote system.
    pub name: String,
    /// Wire-level data kind.
    pub data_type: AbapType,
    /// Direction (always `Input` for structure fields).
    pub direction: Direction,
    /// Structure name for `Structure` and table-of-structure parameters.
    pub structure_ref: Option<String>,
    /// Element kind for tables of scalars.
    pub row_type: Option<AbapType>,
    /// Field width in characters (CHAR) or bytes (BYTES).
    pub length: Option<u32>,
    /// Number of fractional digits (DECIMAL).
    pub decimals: Option<u32>,
    /// Whether the remote side marks the parameter optional.
    pub optional: bool,
    /// Short text from the remote dictionary.
    pub description: Option<String>,
}

impl ParameterDescriptor {
    /// Create a descriptor with minimal info.
    pub fn new(name: impl Into<String>, data_type: AbapType, direction: Direction) -> Self {
        Self {
            name: name.into(),
            data_type,
            direction,
            structure_ref: None,
            row_type: None,
            length: None,
            decimals: None,
            optional: false,
            description: None,
        }
    }

    /// Structure field descriptor.
    pub fn field(name: impl Into<String>, data_type: AbapType) -> Self {
        Self::new(name, data_type, Direction::Input)
    }

    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure_ref = Some(structure.into());
        self
    }

    pub fn with_row_type(mut self, row_type: AbapType) -> Self {
        self.row_type = Some(row_type);
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

    /// Case-insensitive name match.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Descriptor for one row of a table parameter.
    ///
    /// Rows of a table of structures are structures of the same
    /// `structure_ref`; rows of a simple table use `row_type`.
    pub fn row_descriptor(&self) -> ParameterDescriptor {
        let mut row = ParameterDescriptor::field(self.name.clone(), self.row_kind());
        row.structure_ref = self.structure_ref.clone();
        row.length = self.length;
        row.decimals = self.decimals;
        row
    }

    fn row_kind(&self) -> AbapType {
        match (self.row_type, &self.structure_ref) {
            (Some(kind), _) => kind,
            (None, Some(_)) => AbapType::Structure,
            (None, None) => AbapType::Char,
        }
    }
}
