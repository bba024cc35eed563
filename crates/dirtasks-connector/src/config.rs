//! Connection configuration
//!
//! Configuration for a single directory connection. A config is owned by one
//! invocation and never shared or pooled.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};

/// Port used when the configured port is 0.
pub const DEFAULT_LDAP_PORT: u16 = 389;

/// Transport security mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Plain LDAP.
    #[default]
    None,
    /// Plain connection upgraded with the StartTLS extended operation.
    #[serde(alias = "starttls")]
    StartTls,
    /// TLS from the first byte (LDAPS).
    #[serde(alias = "ssl", alias = "implicit")]
    Ldaps,
}

impl TlsMode {
    /// URL scheme for this mode.
    pub fn scheme(self) -> &'static str {
        match self {
            TlsMode::Ldaps => "ldaps",
            TlsMode::None | TlsMode::StartTls => "ldap",
        }
    }
}

/// Credentials used for the bind.
#[derive(Clone, PartialEq, Eq)]
pub enum BindCredentials {
    Anonymous,
    Simple { username: String, password: String },
}

impl std::fmt::Debug for BindCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindCredentials::Anonymous => f.write_str("Anonymous"),
            BindCredentials::Simple { username, .. } => f
                .debug_struct("Simple")
                .field("username", username)
                .field("password", &"***REDACTED***")
                .finish(),
        }
    }
}

/// Configuration for a directory connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Directory server hostname or IP address.
    pub host: String,

    /// Server port. 0 means the default LDAP port (389).
    #[serde(default)]
    pub port: u16,

    /// Bind user (DN, UPN or down-level logon name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Bind password.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Bind anonymously instead of with username/password.
    #[serde(default)]
    pub anonymous_bind: bool,

    /// Transport security.
    #[serde(default)]
    pub tls_mode: TlsMode,

    /// Accept any server certificate. Dangerous outside test directories.
    #[serde(default)]
    pub ignore_certificate_errors: bool,

    /// Transport connect timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,
}

fn default_connection_timeout() -> u64 {
    30
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***REDACTED***"))
            .field("anonymous_bind", &self.anonymous_bind)
            .field("tls_mode", &self.tls_mode)
            .field("ignore_certificate_errors", &self.ignore_certificate_errors)
            .field("connection_timeout_secs", &self.connection_timeout_secs)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a config for the given host with default settings.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 0,
            username: None,
            password: None,
            anonymous_bind: false,
            tls_mode: TlsMode::None,
            ignore_certificate_errors: false,
            connection_timeout_secs: default_connection_timeout(),
        }
    }

    /// Set username and password for a simple bind.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.anonymous_bind = false;
        self
    }

    /// Bind anonymously.
    #[must_use]
    pub fn with_anonymous_bind(mut self) -> Self {
        self.anonymous_bind = true;
        self
    }

    /// Set the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the transport security mode.
    #[must_use]
    pub fn with_tls_mode(mut self, mode: TlsMode) -> Self {
        self.tls_mode = mode;
        self
    }

    /// Disable server certificate verification.
    #[must_use]
    pub fn with_ignore_certificate_errors(mut self) -> Self {
        self.ignore_certificate_errors = true;
        self
    }

    /// Port actually used for the connection.
    pub fn effective_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_LDAP_PORT
        } else {
            self.port
        }
    }

    /// Connect timeout as Duration.
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connection_timeout_secs)
    }

    /// Directory URL for this config.
    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.tls_mode.scheme(),
            self.host.trim(),
            self.effective_port()
        )
    }

    /// Credentials to bind with.
    pub fn credentials(&self) -> BindCredentials {
        if self.anonymous_bind {
            BindCredentials::Anonymous
        } else {
            BindCredentials::Simple {
                username: self.username.clone().unwrap_or_default(),
                password: self.password.clone().unwrap_or_default(),
            }
        }
    }

    /// Validate the configuration. Never touches the network.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConnectorError::invalid_configuration("host is missing"));
        }

        if !self.anonymous_bind {
            if self.username.as_deref().map_or(true, str::is_empty) {
                return Err(ConnectorError::invalid_configuration(
                    "username is missing",
                ));
            }
            if self.password.as_deref().map_or(true, str::is_empty) {
                return Err(ConnectorError::invalid_configuration(
                    "password is missing",
                ));
            }
        }

        Ok(())
    }

    /// Log a security warning when certificate verification is disabled.
    pub fn warn_if_insecure(&self) {
        if self.ignore_certificate_errors {
            tracing::warn!(
                target: "security",
                host = %self.host,
                "TLS certificate verification is DISABLED for this directory connection. \
                 Any server certificate will be accepted."
            );
        }
    }
}
