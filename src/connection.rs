//! High-level Connection API for calling remote functions.

use crate::cache::{MetadataCache, MetadataResolver, TransportLoader};
use crate::error::{Error, Result};
use crate::marshal::Marshaller;
use crate::params::{match_output, IntoParameters};
use crate::protocol::connect::ConnectParams;
use crate::protocol::transport::Transport;
use crate::protocol::types::{
    FromRfcValue, FunctionMetadata, RfcStream, RfcStructure, RfcValue, StructureMetadata,
    WireRecord,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outputs of one function call.
///
/// Values stay in wire form until asked for; each accessor converts the
/// named output using the function's cached metadata.
pub struct FunctionResult<'a, T: Transport> {
    conn: &'a Connection<T>,
    metadata: Arc<FunctionMetadata>,
    outputs: WireRecord,
}

impl<'a, T: Transport> FunctionResult<'a, T> {
    /// Metadata of the function that produced this result.
    pub fn metadata(&self) -> &FunctionMetadata {
        &self.metadata
    }

    /// Get the number of output values returned.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Check if the call returned no outputs.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Get output parameter names, in declaration order.
    pub fn output_names(&self) -> Vec<&str> {
        self.metadata.output_names()
    }

    /// Raw wire outputs.
    pub fn raw_outputs(&self) -> &WireRecord {
        &self.outputs
    }

    /// Convert an output to a host value.
    ///
    /// The name is matched case-insensitively. Reading an absent DATE as a
    /// non-nullable `NaiveDate` yields `NaiveDate::MIN`; use
    /// [`get_nullable`](Self::get_nullable) to see the absence.
    pub fn get_output<V: FromRfcValue>(&self, name: &str) -> Result<V> {
        V::from_rfc_value(self.get_value(name)?)
    }

    /// Convert an output, mapping absent values (NULL, no date, blank
    /// time) to `None`.
    pub fn get_nullable<V: FromRfcValue>(&self, name: &str) -> Result<Option<V>> {
        let value = self.get_value(name)?;
        if value.is_absent() {
            return Ok(None);
        }
        V::from_rfc_value(value).map(Some)
    }

    /// Convert a table output, row by row.
    pub fn get_table<V: FromRfcValue>(&self, name: &str) -> Result<Vec<V>> {
        match self.get_value(name)? {
            RfcValue::Null => Ok(Vec::new()),
            RfcValue::Table(rows) => rows.into_iter().map(V::from_rfc_value).collect(),
            other => Err(Error::type_conversion(format!(
                "{} is a {} value, not a table",
                name,
                other.kind()
            ))),
        }
    }

    /// Convert a structure output into a struct.
    pub fn get_structure<S: RfcStructure>(&self, name: &str) -> Result<S> {
        match self.get_value(name)? {
            RfcValue::Record(record) => S::from_record(&record),
            other => Err(Error::type_conversion(format!(
                "{} is a {} value, not a structure",
                name,
                other.kind()
            ))),
        }
    }

    /// Binary output, buffered.
    pub fn get_bytes(&self, name: &str) -> Result<Bytes> {
        self.get_output(name)
    }

    /// Binary output as a reader over the same data.
    pub fn get_stream(&self, name: &str) -> Result<RfcStream> {
        self.get_output(name)
    }

    /// Decoded output value.
    pub fn get_value(&self, name: &str) -> Result<RfcValue> {
        let descriptor = match_output(&self.metadata, name)?;
        trace!(function = %self.metadata.name, parameter = %descriptor.name, "converting output");
        let loader = TransportLoader(&self.conn.transport);
        let marshaller = Marshaller::new(MetadataResolver::new(&self.conn.cache, &loader));
        marshaller.decode_value(descriptor, self.outputs.get(&descriptor.name))
    }
}

impl<T: Transport> std::fmt::Debug for FunctionResult<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionResult")
            .field("function", &self.metadata.name)
            .field("outputs", &self.outputs)
            .finish()
    }
}

/// A connection to one destination.
///
/// Owns the transport and a metadata cache scoped to the destination.
/// All calls block the calling thread; a connection can be shared by
/// reference across threads when its transport allows it.
pub struct Connection<T: Transport> {
    transport: T,
    params: ConnectParams,
    cache: Arc<MetadataCache>,
}

impl<T: Transport> Connection<T> {
    /// Create a connection with its own empty metadata cache.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rfc_thin_rs::{rfc_params, ConnectParams, Connection, Transport};
    ///
    /// fn sum(transport: impl Transport) -> rfc_thin_rs::Result<i32> {
    ///     let conn = Connection::new(transport, ConnectParams::new("TST"))?;
    ///     let result = conn.execute_function("Z_SSRT_SUM", rfc_params! { i_num1: 2, i_num2: 4 })?;
    ///     result.get_output("e_result")
    /// }
    /// ```
    pub fn new(transport: T, params: ConnectParams) -> Result<Self> {
        let cache = Arc::new(MetadataCache::new(params.destination.clone()));
        Self::with_cache(transport, params, cache)
    }

    /// Create a connection that shares an existing metadata cache.
    ///
    /// The cache must belong to the same destination.
    pub fn with_cache(transport: T, params: ConnectParams, cache: Arc<MetadataCache>) -> Result<Self> {
        params.validate()?;
        if cache.destination() != params.destination {
            return Err(Error::DestinationMismatch {
                expected: cache.destination().to_string(),
                actual: params.destination,
            });
        }
        debug!(destination = %params.destination, client = %params.client, "connection ready");
        Ok(Self {
            transport,
            params,
            cache,
        })
    }

    /// Connection parameters.
    pub fn params(&self) -> &ConnectParams {
        &self.params
    }

    pub fn destination(&self) -> &str {
        &self.params.destination
    }

    /// Shared metadata cache of this connection.
    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Function metadata, discovered on first use.
    pub fn function_metadata(&self, name: &str) -> Result<Arc<FunctionMetadata>> {
        let loader = TransportLoader(&self.transport);
        self.cache.get_function_metadata(name, &loader)
    }

    /// Structure metadata, discovered on first use.
    pub fn structure_metadata(&self, name: &str) -> Result<Arc<StructureMetadata>> {
        let loader = TransportLoader(&self.transport);
        self.cache.get_structure_metadata(name, &loader)
    }

    /// Call a remote function.
    ///
    /// Resolves the function's metadata, matches and converts every
    /// supplied parameter, and only then invokes the transport. Errors
    /// from matching or conversion leave the remote side untouched.
    /// Business exceptions come back as [`Error::Remote`].
    pub fn execute_function(
        &self,
        name: &str,
        params: impl IntoParameters,
    ) -> Result<FunctionResult<'_, T>> {
        let loader = TransportLoader(&self.transport);
        let resolver = MetadataResolver::new(&self.cache, &loader);
        let metadata = resolver.function(name)?;

        let inputs = Marshaller::new(resolver).encode_inputs(&metadata, params.into_parameters())?;

        debug!(
            destination = %self.params.destination,
            function = %metadata.name,
            inputs = inputs.len(),
            "invoking function"
        );
        let outputs = self.transport.invoke(&metadata.name, &inputs).map_err(|e| {
            debug!(function = %metadata.name, error = %e, "function call failed");
            e
        })?;

        Ok(FunctionResult {
            conn: self,
            metadata,
            outputs,
        })
    }
}

impl<T: Transport> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("params", &self.params)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataKind;
    use crate::protocol::types::{
        Direction, RawFunctionDescriptor, RawParameter, RawStructureDescriptor, WireValue,
    };
    use crate::rfc_params;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use tracing_test::traced_test;

    /// Echoes E_DATUM back from I_DATUM and records every invoke.
    #[derive(Default)]
    struct EchoTransport {
        invoked: Mutex<Vec<WireRecord>>,
    }

    impl Transport for EchoTransport {
        fn discover_function(&self, name: &str) -> Result<RawFunctionDescriptor> {
            match name {
                "Z_ECHO_DATE" => Ok(RawFunctionDescriptor {
                    name: name.to_string(),
                    parameters: vec![
                        RawParameter::new("I_DATUM", "D", Direction::Input),
                        RawParameter::new("E_DATUM", "D", Direction::Output),
                    ],
                }),
                _ => Err(Error::metadata_not_found(MetadataKind::Function, name)),
            }
        }

        fn discover_structure(&self, name: &str) -> Result<RawStructureDescriptor> {
            Err(Error::metadata_not_found(MetadataKind::Structure, name))
        }

        fn invoke(&self, _name: &str, inputs: &WireRecord) -> Result<WireRecord> {
            self.invoked.lock().push(inputs.clone());
            let date = inputs
                .get("I_DATUM")
                .cloned()
                .unwrap_or_else(|| WireValue::String("00000000".to_string()));
            Ok(WireRecord::new().with("E_DATUM", date))
        }
    }

    #[test]
    fn test_null_date_round_trip() {
        let conn = Connection::new(EchoTransport::default(), ConnectParams::new("TST")).unwrap();
        let result = conn
            .execute_function("Z_ECHO_DATE", rfc_params! { i_datum: None::<NaiveDate> })
            .unwrap();

        assert_eq!(result.get_nullable::<NaiveDate>("e_datum").unwrap(), None);
        assert_eq!(result.get_output::<Option<NaiveDate>>("E_DATUM").unwrap(), None);
        assert_eq!(result.get_output::<NaiveDate>("E_DATUM").unwrap(), NaiveDate::MIN);
    }

    #[test]
    fn test_unknown_parameter_is_not_sent() {
        let transport = EchoTransport::default();
        let conn = Connection::new(&transport, ConnectParams::new("TST")).unwrap();
        let err = conn
            .execute_function("Z_ECHO_DATE", rfc_params! { i_datum2: "20140406" })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter i_datum2 was not found on function Z_ECHO_DATE."
        );
        assert!(transport.invoked.lock().is_empty());
    }

    #[test]
    fn test_output_not_found() {
        let conn = Connection::new(EchoTransport::default(), ConnectParams::new("TST")).unwrap();
        let result = conn.execute_function("Z_ECHO_DATE", ()).unwrap();
        assert!(matches!(
            result.get_output::<NaiveDate>("I_DATUM"),
            Err(Error::OutputNotFound { .. })
        ));
        assert_eq!(result.output_names(), vec!["E_DATUM"]);
    }

    #[test]
    fn test_logon_settings_kept_for_transport() {
        let params = ConnectParams::parse("TST:NSP/001/DE").unwrap().with_user("DEVELOPER");
        let conn = Connection::new(EchoTransport::default(), params).unwrap();
        assert_eq!(conn.params().system_id.as_deref(), Some("NSP"));
        assert_eq!(conn.params().language, "DE");
        assert_eq!(conn.params().user.as_deref(), Some("DEVELOPER"));
        assert!(Connection::new(
            EchoTransport::default(),
            ConnectParams::new("TST").with_language("GERMAN")
        )
        .is_err());
    }

    #[test]
    fn test_cache_for_other_destination_rejected() {
        let cache = Arc::new(MetadataCache::new("PRD"));
        let err = Connection::with_cache(EchoTransport::default(), ConnectParams::new("TST"), cache)
            .unwrap_err();
        assert!(matches!(err, Error::DestinationMismatch { .. }));
    }

    #[test]
    fn test_shared_cache_discovers_once() {
        let transport = EchoTransport::default();
        let first = Connection::new(&transport, ConnectParams::new("TST")).unwrap();
        let second =
            Connection::with_cache(&transport, ConnectParams::new("TST"), Arc::clone(first.cache()))
                .unwrap();

        let a = first.function_metadata("Z_ECHO_DATE").unwrap();
        let b = second.function_metadata("Z_ECHO_DATE").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    #[traced_test]
    fn test_invocation_is_logged() {
        let conn = Connection::new(EchoTransport::default(), ConnectParams::new("TST")).unwrap();
        conn.execute_function("Z_ECHO_DATE", ()).unwrap();
        assert!(logs_contain("invoking function"));
        assert!(logs_contain("discovering metadata"));
    }
}
