//! Function and structure metadata for the user-facing API.
//!
//! Both types are built once from a raw discovery response, validated,
//! and immutable afterwards. The metadata cache hands them out behind an
//! `Arc`.

use crate::error::{Error, Result};

use super::abap_type::AbapType;
use super::metadata::{RawFunctionDescriptor, RawParameter, RawStructureDescriptor};
use super::parameter::ParameterDescriptor;

/// Signature of one remote function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionMetadata {
    /// Function name.
    pub name: String,
    /// Parameters accepted by the function, in declaration order.
    pub input_parameters: Vec<ParameterDescriptor>,
    /// Parameters returned by the function, in declaration order.
    pub output_parameters: Vec<ParameterDescriptor>,
}

impl FunctionMetadata {
    /// Create function metadata, rejecting duplicate names per direction.
    pub fn new(
        name: impl Into<String>,
        input_parameters: Vec<ParameterDescriptor>,
        output_parameters: Vec<ParameterDescriptor>,
    ) -> Result<Self> {
        let name = name.into();
        ensure_unique(&name, &input_parameters)?;
        ensure_unique(&name, &output_parameters)?;
        Ok(Self {
            name,
            input_parameters,
            output_parameters,
        })
    }

    /// Create function metadata from a discovery response.
    ///
    /// Changing parameters land in both collections.
    pub fn from_raw(raw: &RawFunctionDescriptor) -> Result<Self> {
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for raw_param in &raw.parameters {
            let param = descriptor_from_raw(raw_param)?;
            if param.direction.is_input() {
                inputs.push(param.clone());
            }
            if param.direction.is_output() {
                outputs.push(param);
            }
        }
        Self::new(raw.name.clone(), inputs, outputs)
    }

    /// Find an input parameter by name (case-insensitive).
    pub fn get_input_parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.input_parameters.iter().find(|p| p.is_named(name))
    }

    /// Find an output parameter by name (case-insensitive).
    pub fn get_output_parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.output_parameters.iter().find(|p| p.is_named(name))
    }

    /// Input parameter names.
    pub fn input_names(&self) -> Vec<&str> {
        self.input_parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Output parameter names.
    pub fn output_names(&self) -> Vec<&str> {
        self.output_parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Field layout of one named structure.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureMetadata {
    pub name: String,
    pub fields: Vec<ParameterDescriptor>,
}

impl StructureMetadata {
    /// Create structure metadata, rejecting duplicate field names.
    pub fn new(name: impl Into<String>, fields: Vec<ParameterDescriptor>) -> Result<Self> {
        let name = name.into();
        ensure_unique(&name, &fields)?;
        Ok(Self { name, fields })
    }

    /// Create structure metadata from a discovery response.
    pub fn from_raw(raw: &RawStructureDescriptor) -> Result<Self> {
        let fields: Result<Vec<ParameterDescriptor>> =
            raw.fields.iter().map(descriptor_from_raw).collect();
        Self::new(raw.name.clone(), fields?)
    }

    /// Find a field by name (case-insensitive).
    pub fn get_field(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.fields.iter().find(|f| f.is_named(name))
    }

    /// Field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

fn descriptor_from_raw(raw: &RawParameter) -> Result<ParameterDescriptor> {
    let data_type = AbapType::from_code(&raw.type_code)?;
    let row_type = raw
        .row_type_code
        .as_deref()
        .map(AbapType::from_code)
        .transpose()?;
    if data_type == AbapType::Structure && raw.structure.is_none() {
        return Err(Error::type_conversion(format!(
            "structure parameter {} has no structure reference",
            raw.name
        )));
    }
    Ok(ParameterDescriptor {
        name: raw.name.clone(),
        data_type,
        direction: raw.direction,
        structure_ref: raw.structure.clone(),
        row_type,
        length: raw.length,
        decimals: raw.decimals,
        optional: raw.optional,
        description: raw.description.clone(),
    })
}

fn ensure_unique(owner: &str, params: &[ParameterDescriptor]) -> Result<()> {
    for (i, param) in params.iter().enumerate() {
        if params[..i].iter().any(|p| p.is_named(&param.name)) {
            return Err(Error::DuplicateParameter {
                parameter: param.name.clone(),
                owner: owner.to_string(),
            });
        }
    }
    Ok(())
}
