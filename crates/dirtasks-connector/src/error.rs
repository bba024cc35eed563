//! Connector error types
//!
//! Error definitions grouped into the categories callers branch on:
//! configuration, connectivity, authentication, protocol, operation and
//! cancellation.

use thiserror::Error;

/// Error that can occur while talking to a directory.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Configuration errors (raised before any network activity)
    /// Connection or request configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // Connectivity errors
    /// Failed to establish the transport (TCP connect, TLS negotiation).
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A request did not complete within the configured time limit.
    #[error("connection timeout after {timeout_ms} ms")]
    ConnectionTimeout { timeout_ms: u64 },

    // Authentication errors
    /// The server rejected the bind.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // Protocol errors
    /// A search scope value that has no wire representation.
    #[error("invalid scope: {value}")]
    InvalidScope { value: String },

    /// A dereference policy value that has no wire representation.
    #[error("invalid dereference policy: {value}")]
    InvalidDereference { value: String },

    /// Malformed or unexpected server response.
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// Attribute data that cannot be coerced into the requested representation.
    #[error("invalid data for attribute '{attribute}': {message}")]
    InvalidData { attribute: String, message: String },

    // Operation errors
    /// The server answered a request with a failure result.
    #[error("operation failed: {message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The target entry does not exist.
    #[error("object not found: {identifier}")]
    ObjectNotFound { identifier: String },

    /// The value being added is already present on the attribute.
    #[error("value already present on '{attribute}' of {identifier}")]
    AttributeValueExists {
        identifier: String,
        attribute: String,
    },

    // Cancellation
    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Connectivity,
    Authentication,
    Protocol,
    Operation,
    Cancelled,
}

impl ConnectorError {
    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectorError::InvalidConfiguration { .. } => ErrorKind::Configuration,
            ConnectorError::ConnectionFailed { .. } | ConnectorError::ConnectionTimeout { .. } => {
                ErrorKind::Connectivity
            }
            ConnectorError::AuthenticationFailed { .. } => ErrorKind::Authentication,
            ConnectorError::InvalidScope { .. }
            | ConnectorError::InvalidDereference { .. }
            | ConnectorError::Protocol { .. }
            | ConnectorError::InvalidData { .. } => ErrorKind::Protocol,
            ConnectorError::OperationFailed { .. }
            | ConnectorError::ObjectNotFound { .. }
            | ConnectorError::AttributeValueExists { .. } => ErrorKind::Operation,
            ConnectorError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Check if this error is transient.
    ///
    /// Nothing is retried internally; this only tells callers whether
    /// re-running the whole invocation may help.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Connectivity
    }

    /// Check if this error is a caller-requested cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConnectorError::Cancelled)
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ConnectorError::ConnectionTimeout { .. } => "CONNECTION_TIMEOUT",
            ConnectorError::AuthenticationFailed { .. } => "AUTH_FAILED",
            ConnectorError::InvalidScope { .. } => "INVALID_SCOPE",
            ConnectorError::InvalidDereference { .. } => "INVALID_DEREF",
            ConnectorError::Protocol { .. } => "PROTOCOL_ERROR",
            ConnectorError::InvalidData { .. } => "INVALID_DATA",
            ConnectorError::OperationFailed { .. } => "OPERATION_FAILED",
            ConnectorError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            ConnectorError::AttributeValueExists { .. } => "VALUE_EXISTS",
            ConnectorError::Cancelled => "CANCELLED",
        }
    }

    // Convenience constructors

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an authentication failed error.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        ConnectorError::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        ConnectorError::Protocol {
            message: message.into(),
        }
    }

    /// Create an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        ConnectorError::OperationFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create an operation failed error with source.
    pub fn operation_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::OperationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
