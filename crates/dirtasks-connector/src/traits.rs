//! Directory client capability trait
//!
//! The paging state machine and the one-shot tasks are written once against
//! [`DirectoryClient`]; each directory library provides one implementation.

use async_trait::async_trait;

use crate::config::{BindCredentials, ConnectionConfig};
use crate::error::ConnectorResult;
use crate::operation::{PageRequest, PageResponse};

/// Low-level operations on one directory connection.
///
/// A client serves exactly one invocation: `connect`, `bind`, any number of
/// requests issued one at a time, then `close`.
#[async_trait]
pub trait DirectoryClient: Send {
    /// Open the transport described by `config`, negotiating TLS/StartTLS.
    ///
    /// Failures are connectivity errors.
    async fn connect(&mut self, config: &ConnectionConfig) -> ConnectorResult<()>;

    /// Authenticate on the open transport.
    ///
    /// A rejected bind is an authentication error.
    async fn bind(&mut self, credentials: &BindCredentials) -> ConnectorResult<()>;

    /// Send one search request carrying a paging control and wait for the
    /// complete page.
    async fn search_page(&mut self, request: &PageRequest<'_>) -> ConnectorResult<PageResponse>;

    /// Add values to an attribute of an existing entry.
    ///
    /// Returns `AttributeValueExists` when a value is already present and
    /// `ObjectNotFound` when the entry does not exist.
    async fn add_values(
        &mut self,
        dn: &str,
        attribute: &str,
        values: &[String],
    ) -> ConnectorResult<()>;

    /// Delete an entry by DN.
    async fn delete(&mut self, dn: &str) -> ConnectorResult<()>;

    /// Release the connection. Must be safe to call after a failed
    /// `connect` or `bind`, and more than once.
    async fn close(&mut self) -> ConnectorResult<()>;
}
