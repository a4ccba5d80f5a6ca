//! Named parameters supplied by callers, and matching them against a
//! function's signature.

use crate::error::{Error, Result};
use crate::protocol::types::{
    FunctionMetadata, ParameterDescriptor, RfcRecord, RfcStructure, RfcValue, ToRfcValue,
};

/// One named input value.
#[derive(Debug, Clone, PartialEq)]
pub struct RfcParameter {
    /// Parameter name, matched case-insensitively.
    pub name: String,
    /// Value to send.
    pub value: RfcValue,
}

impl RfcParameter {
    /// Create a parameter.
    ///
    /// # Example
    ///
    /// ```
    /// use rfc_thin_rs::{RfcParameter, RfcValue};
    ///
    /// let param = RfcParameter::new("i_num1", 2);
    /// assert_eq!(param.value, RfcValue::Integer(2));
    /// ```
    pub fn new(name: impl Into<String>, value: impl ToRfcValue) -> Self {
        Self {
            name: name.into(),
            value: value.to_rfc_value(),
        }
    }
}

/// Builder for a parameter list.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    params: Vec<RfcParameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl ToRfcValue) -> Self {
        self.params.push(RfcParameter::new(name, value));
        self
    }

    /// Add a parameter in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToRfcValue) {
        self.params.push(RfcParameter::new(name, value));
    }

    /// One parameter per field of a struct.
    pub fn from_structure<S: RfcStructure>(value: &S) -> Self {
        value.to_record().into_parameters().into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<RfcParameter> for Parameters {
    fn from_iter<I: IntoIterator<Item = RfcParameter>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

/// Anything that can produce a sequence of named values.
pub trait IntoParameters {
    fn into_parameters(self) -> Vec<RfcParameter>;
}

impl IntoParameters for () {
    fn into_parameters(self) -> Vec<RfcParameter> {
        Vec::new()
    }
}

impl IntoParameters for RfcParameter {
    fn into_parameters(self) -> Vec<RfcParameter> {
        vec![self]
    }
}

impl IntoParameters for Vec<RfcParameter> {
    fn into_parameters(self) -> Vec<RfcParameter> {
        self
    }
}

impl<const N: usize> IntoParameters for [RfcParameter; N] {
    fn into_parameters(self) -> Vec<RfcParameter> {
        self.into()
    }
}

impl IntoParameters for &[RfcParameter] {
    fn into_parameters(self) -> Vec<RfcParameter> {
        self.to_vec()
    }
}

impl IntoParameters for Parameters {
    fn into_parameters(self) -> Vec<RfcParameter> {
        self.params
    }
}

impl IntoParameters for RfcRecord {
    /// Each field becomes a parameter of the same name.
    fn into_parameters(self) -> Vec<RfcParameter> {
        self.into_iter()
            .map(|(name, value)| RfcParameter { name, value })
            .collect()
    }
}

/// Build a parameter list from `name: value` pairs.
///
/// ```
/// use rfc_thin_rs::rfc_params;
///
/// let params = rfc_params! { i_num1: 2, i_num2: 7 };
/// assert_eq!(params.len(), 2);
/// assert_eq!(params[0].name, "i_num1");
/// ```
#[macro_export]
macro_rules! rfc_params {
    ($($name:ident : $value:expr),* $(,)?) => {{
        let params: ::std::vec::Vec<$crate::RfcParameter> =
            vec![$($crate::RfcParameter::new(stringify!($name), $value)),*];
        params
    }};
}

/// Match supplied parameters against a function's inputs.
///
/// Every supplied name must resolve (case-insensitively) to an input
/// parameter; parameters not supplied are left to the remote defaults.
/// Returns the descriptor for each supplied value, in supply order.
pub fn match_parameters(
    metadata: &FunctionMetadata,
    params: Vec<RfcParameter>,
) -> Result<Vec<(&ParameterDescriptor, RfcValue)>> {
    let mut matched: Vec<(&ParameterDescriptor, RfcValue)> = Vec::with_capacity(params.len());
    for param in params {
        let descriptor =
            metadata
                .get_input_parameter(&param.name)
                .ok_or_else(|| Error::UnknownParameter {
                    parameter: param.name.clone(),
                    function: metadata.name.clone(),
                })?;
        if matched.iter().any(|(d, _)| d.is_named(&descriptor.name)) {
            return Err(Error::DuplicateParameter {
                parameter: param.name,
                owner: metadata.name.clone(),
            });
        }
        matched.push((descriptor, param.value));
    }
    Ok(matched)
}

/// Find an output parameter, failing with `OutputNotFound`.
pub fn match_output<'m>(metadata: &'m FunctionMetadata, name: &str) -> Result<&'m ParameterDescriptor> {
    metadata
        .get_output_parameter(name)
        .ok_or_else(|| Error::OutputNotFound {
            parameter: name.to_string(),
            function: metadata.name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::{AbapType, Direction};

    fn make_sum_metadata() -> FunctionMetadata {
        FunctionMetadata::new(
            "Z_SSRT_SUM",
            vec![
                ParameterDescriptor::new("I_NUM1", AbapType::Integer, Direction::Input),
                ParameterDescriptor::new("I_NUM2", AbapType::Integer, Direction::Input),
            ],
            vec![ParameterDescriptor::new("E_RESULT", AbapType::Integer, Direction::Output)],
        )
        .unwrap()
    }

    #[test]
    fn test_match_ignores_case() {
        let metadata = make_sum_metadata();
        for name in ["i_num1", "I_NUM1", "I_Num1"] {
            let matched = match_parameters(&metadata, vec![RfcParameter::new(name, 2)]).unwrap();
            assert_eq!(matched[0].0.name, "I_NUM1");
            assert_eq!(matched[0].1, RfcValue::Integer(2));
        }
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let metadata = make_sum_metadata();
        let err = match_parameters(
            &metadata,
            rfc_params! { i_num1: 2, i_num2: 4, i_num3: 4 },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter i_num3 was not found on function Z_SSRT_SUM."
        );
    }

    #[test]
    fn test_omitted_parameters_allowed() {
        let metadata = make_sum_metadata();
        let matched = match_parameters(&metadata, rfc_params! { i_num2: 4 }).unwrap();
        assert_eq!(matched.len(), 1);
        assert!(match_parameters(&metadata, ().into_parameters()).unwrap().is_empty());
    }

    #[test]
    fn test_same_parameter_twice_rejected() {
        let metadata = make_sum_metadata();
        let err = match_parameters(&metadata, rfc_params! { i_num1: 2, I_NUM1: 3 }).unwrap_err();
        assert!(matches!(err, Error::DuplicateParameter { .. }));
    }

    #[test]
    fn test_match_output() {
        let metadata = make_sum_metadata();
        assert_eq!(match_output(&metadata, "e_result").unwrap().name, "E_RESULT");
        assert!(matches!(
            match_output(&metadata, "I_NUM1"),
            Err(Error::OutputNotFound { .. })
        ));
    }

    #[test]
    fn test_parameters_builder() {
        let params = Parameters::new().with("I_NUM1", 2).with("I_NUM2", 4);
        assert_eq!(params.len(), 2);
        let list = params.into_parameters();
        assert_eq!(list[1].name, "I_NUM2");
    }

    #[test]
    fn test_record_into_parameters() {
        let record = RfcRecord::new().with("I_ID", 2).with("I_ACTIVE", true);
        let params = record.into_parameters();
        assert_eq!(params[0], RfcParameter::new("I_ID", 2));
        assert_eq!(params[1].value, RfcValue::Bool(true));
    }
}
