//! Destination parameters identifying the target system of a connection.

use crate::error::{Error, Result};

/// Default logon client.
pub const DEFAULT_CLIENT: &str = "000";
/// Default logon language.
pub const DEFAULT_LANGUAGE: &str = "EN";

/// Connection parameters.
///
/// The destination names the target system. Metadata caches are scoped
/// to a destination: two connections share a cache only when they talk to
/// the same destination.
///
/// `system_id`, `client`, `language` and `user` are logon settings owned
/// by the transport, which opens the remote session with them. This crate
/// only validates them and keeps them with the connection
/// (`Connection::params`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// Destination name (for example `TST` or `TST-SOAP`).
    pub destination: String,
    /// Three-character system ID, if known.
    pub system_id: Option<String>,
    /// Logon client (default: `000`).
    pub client: String,
    /// Logon language (default: `EN`).
    pub language: String,
    /// Logon user, if the transport needs one.
    pub user: Option<String>,
}

impl ConnectParams {
    /// Create new connection parameters for a destination.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            system_id: None,
            client: DEFAULT_CLIENT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            user: None,
        }
    }

    /// Set the system ID.
    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    /// Set the logon client.
    ///
    /// # Example
    ///
    /// ```
    /// use rfc_thin_rs::ConnectParams;
    ///
    /// let params = ConnectParams::new("TST").with_client("100");
    /// assert_eq!(params.client, "100");
    /// ```
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Set the logon language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the logon user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Parse a destination string like `DEST` or `DEST:SID/CLIENT[/LANG]`.
    pub fn parse(dest_str: &str) -> Result<Self> {
        let dest_str = dest_str.trim();
        let (destination, system_part) = match dest_str.split_once(':') {
            Some((d, rest)) => (d, Some(rest)),
            None => (dest_str, None),
        };

        let mut params = Self::new(destination);
        if let Some(system_part) = system_part {
            let mut parts = system_part.split('/');
            let system_id = parts.next().unwrap_or_default();
            let client = parts.next().ok_or_else(|| Error::InvalidDestination {
                message: "Expected format: DEST:SID/CLIENT[/LANG]".to_string(),
            })?;
            params = params.with_system_id(system_id).with_client(client);
            if let Some(language) = parts.next() {
                params = params.with_language(language);
            }
            if parts.next().is_some() {
                return Err(Error::InvalidDestination {
                    message: format!("Too many parts in '{}'", dest_str),
                });
            }
        }

        params.validate()?;
        Ok(params)
    }

    /// Check that every part is well-formed.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidDestination { message });

        if self.destination.is_empty()
            || !self
                .destination
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return invalid(format!("Invalid destination name '{}'", self.destination));
        }
        if let Some(sid) = &self.system_id {
            if sid.len() != 3 || !sid.chars().all(|c| c.is_ascii_alphanumeric()) {
                return invalid(format!("Invalid system ID '{}'", sid));
            }
        }
        if self.client.len() != 3 || !self.client.chars().all(|c| c.is_ascii_digit()) {
            return invalid(format!("Invalid client '{}'", self.client));
        }
        if self.language.is_empty()
            || self.language.len() > 2
            || !self.language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return invalid(format!("Invalid language '{}'", self.language));
        }
        Ok(())
    }
}
