//! ldap3-backed directory client
//!
//! Implements [`DirectoryClient`] over one `ldap3` async connection.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::controls::{PagedResults, RawControl};
use ldap3::{Ldap, LdapConnAsync, LdapError, LdapResult, Mod, SearchOptions};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use dirtasks_connector::config::{BindCredentials, ConnectionConfig};
use dirtasks_connector::error::{ConnectorError, ConnectorResult};
use dirtasks_connector::operation::{PageRequest, PageResponse};
use dirtasks_connector::traits::DirectoryClient;

use crate::entry::{decode_entries, paged_cursor};
use crate::settings::conn_settings;
use crate::translate::{deref_aliases, ldap_scope};

/// Result code for a rejected bind.
const RC_INVALID_CREDENTIALS: u32 = 49;
/// attributeOrValueExists
const RC_VALUE_EXISTS: u32 = 20;
/// noSuchObject
const RC_NO_SUCH_OBJECT: u32 = 32;
/// entryAlreadyExists, returned by Active Directory for duplicate members
const RC_ALREADY_EXISTS: u32 = 68;

/// Attribute list that requests all user attributes.
const ALL_USER_ATTRIBUTES: &str = "*";

/// Directory client backed by an `ldap3` connection.
///
/// One client serves one invocation; it is not reused after [`close`].
///
/// [`close`]: DirectoryClient::close
#[derive(Default)]
pub struct LdapDirectoryClient {
    ldap: Option<Ldap>,
    driver: Option<JoinHandle<()>>,
    url: String,
}

impl LdapDirectoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn connection(&mut self) -> ConnectorResult<&mut Ldap> {
        self.ldap
            .as_mut()
            .ok_or_else(|| ConnectorError::connection_failed("not connected"))
    }
}

impl std::fmt::Debug for LdapDirectoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapDirectoryClient")
            .field("url", &self.url)
            .field("connected", &self.ldap.is_some())
            .finish()
    }
}

fn result_message(operation: &str, result: &LdapResult) -> String {
    if result.text.is_empty() {
        format!("{} failed with code {}", operation, result.rc)
    } else {
        format!(
            "{} failed with code {}: {}",
            operation, result.rc, result.text
        )
    }
}

/// Per-page search parameters besides base, scope and filter.
#[derive(Debug)]
struct PageSearch<'a> {
    options: SearchOptions,
    paging: RawControl,
    attributes: Vec<&'a str>,
    timeout: Option<Duration>,
}

/// Build the search parameters for one page. The paging control is critical
/// so a server without paging support rejects the search.
fn page_search<'a>(request: &PageRequest<'a>) -> PageSearch<'a> {
    let spec = request.spec;

    let mut paging = RawControl::from(PagedResults {
        size: request.page_size,
        cookie: request.cursor.cookie().to_vec(),
    });
    paging.crit = true;

    let options = SearchOptions::new()
        .deref(deref_aliases(spec.deref))
        .typesonly(spec.types_only)
        .timelimit(spec.server_time_limit);

    let mut attributes = spec.requested_attribute_names();
    if attributes.is_empty() {
        attributes.push(ALL_USER_ATTRIBUTES);
    }

    let timeout = (spec.ms_limit > 0).then(|| Duration::from_millis(spec.ms_limit));

    PageSearch {
        options,
        paging,
        attributes,
        timeout,
    }
}

#[async_trait]
impl DirectoryClient for LdapDirectoryClient {
    async fn connect(&mut self, config: &ConnectionConfig) -> ConnectorResult<()> {
        let url = config.url();
        debug!(url = %url, "Connecting to LDAP server");

        let (conn, ldap) = LdapConnAsync::with_settings(conn_settings(config), &url)
            .await
            .map_err(|e| {
                ConnectorError::connection_failed_with_source(
                    format!("Failed to connect to LDAP server at {}", url),
                    e,
                )
            })?;

        // Spawn the connection driver
        let driver = tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        self.ldap = Some(ldap);
        self.driver = Some(driver);
        self.url = url;
        Ok(())
    }

    async fn bind(&mut self, credentials: &BindCredentials) -> ConnectorResult<()> {
        let (bind_dn, bind_password) = match credentials {
            BindCredentials::Anonymous => ("", ""),
            BindCredentials::Simple { username, password } => {
                (username.as_str(), password.as_str())
            }
        };

        debug!(bind_dn = %bind_dn, "Performing LDAP bind");

        let ldap = self.connection()?;
        let result = ldap.simple_bind(bind_dn, bind_password).await.map_err(|e| {
            ConnectorError::connection_failed_with_source(
                format!("LDAP bind failed for '{}'", bind_dn),
                e,
            )
        })?;

        match result.rc {
            0 => Ok(()),
            RC_INVALID_CREDENTIALS => Err(ConnectorError::authentication_failed(format!(
                "invalid credentials for '{}' (code {})",
                bind_dn, result.rc
            ))),
            _ => Err(ConnectorError::authentication_failed(result_message(
                "LDAP bind", &result,
            ))),
        }
    }

    #[instrument(skip_all, fields(page = request.page_number))]
    async fn search_page(&mut self, request: &PageRequest<'_>) -> ConnectorResult<PageResponse> {
        let spec = request.spec;
        let PageSearch {
            options,
            paging,
            attributes,
            timeout,
        } = page_search(request);

        let ldap = self.connection()?;
        ldap.with_search_options(options).with_controls(vec![paging]);
        if let Some(timeout) = timeout {
            ldap.with_timeout(timeout);
        }

        let result = ldap
            .search(
                &spec.search_base,
                ldap_scope(spec.scope),
                spec.effective_filter(),
                attributes,
            )
            .await
            .map_err(|e| match e {
                LdapError::Timeout { .. } => ConnectorError::ConnectionTimeout {
                    timeout_ms: spec.ms_limit,
                },
                e => ConnectorError::operation_failed_with_source("LDAP search failed", e),
            })?;

        let ldap3::SearchResult(entries, status) = result;
        if status.rc != 0 {
            return Err(ConnectorError::operation_failed(result_message(
                "LDAP search",
                &status,
            )));
        }

        let entries = decode_entries(entries)?;
        let cursor = paged_cursor(&status.ctrls)?;

        debug!(
            entries = entries.len(),
            has_cookie = cursor.as_ref().is_some_and(|c| !c.is_last()),
            "LDAP page received"
        );

        Ok(PageResponse { entries, cursor })
    }

    #[instrument(skip(self, values))]
    async fn add_values(
        &mut self,
        dn: &str,
        attribute: &str,
        values: &[String],
    ) -> ConnectorResult<()> {
        let set: HashSet<&str> = values.iter().map(String::as_str).collect();

        let ldap = self.connection()?;
        let result = ldap
            .modify(dn, vec![Mod::Add(attribute, set)])
            .await
            .map_err(|e| {
                ConnectorError::operation_failed_with_source(
                    format!("Failed to modify entry: {}", dn),
                    e,
                )
            })?;

        match result.rc {
            0 => {
                info!(dn = %dn, "LDAP entry modified successfully");
                Ok(())
            }
            RC_VALUE_EXISTS | RC_ALREADY_EXISTS => Err(ConnectorError::AttributeValueExists {
                identifier: dn.to_string(),
                attribute: attribute.to_string(),
            }),
            RC_NO_SUCH_OBJECT => Err(ConnectorError::ObjectNotFound {
                identifier: dn.to_string(),
            }),
            _ => Err(ConnectorError::operation_failed(result_message(
                "LDAP modify",
                &result,
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&mut self, dn: &str) -> ConnectorResult<()> {
        let ldap = self.connection()?;

        debug!(dn = %dn, "Deleting LDAP entry");

        let result = ldap.delete(dn).await.map_err(|e| {
            ConnectorError::operation_failed_with_source(
                format!("Failed to delete entry: {}", dn),
                e,
            )
        })?;

        match result.rc {
            0 => {
                info!(dn = %dn, "LDAP entry deleted successfully");
                Ok(())
            }
            RC_NO_SUCH_OBJECT => Err(ConnectorError::ObjectNotFound {
                identifier: dn.to_string(),
            }),
            _ => Err(ConnectorError::operation_failed(result_message(
                "LDAP delete",
                &result,
            ))),
        }
    }

    async fn close(&mut self) -> ConnectorResult<()> {
        // Unbind also tears down the TLS layer; there is no separate StopTLS.
        let unbound = match self.ldap.take() {
            Some(mut ldap) => {
                debug!(url = %self.url, "Unbinding from LDAP server");
                ldap.unbind().await
            }
            None => Ok(()),
        };

        if let Some(driver) = self.driver.take() {
            driver.abort();
        }

        unbound.map_err(|e| {
            ConnectorError::connection_failed_with_source(
                format!("LDAP unbind failed for {}", self.url),
                e,
            )
        })
    }
}
