//! Task entry points over LDAP
//!
//! Each call opens its own connection with a fresh [`LdapDirectoryClient`]
//! and releases it before returning.

use tokio_util::sync::CancellationToken;

use dirtasks_connector::config::ConnectionConfig;
use dirtasks_connector::error::ConnectorResult;
use dirtasks_connector::membership::{self, AddToGroupInput};
use dirtasks_connector::operation::SearchRequestSpec;
use dirtasks_connector::outcome::{DeleteOutcome, MembershipOutcome, SearchOutcome};
use dirtasks_connector::removal::{self, DeleteUserInput};
use dirtasks_connector::search;

use crate::client::LdapDirectoryClient;

/// Run a paginated search against an LDAP server.
pub async fn search_objects(
    config: &ConnectionConfig,
    spec: &SearchRequestSpec,
    cancel: &CancellationToken,
) -> ConnectorResult<SearchOutcome> {
    search::search_objects(LdapDirectoryClient::new(), config, spec, cancel).await
}

/// Add a user to a group's `member` attribute.
pub async fn add_user_to_group(
    config: &ConnectionConfig,
    input: &AddToGroupInput,
) -> ConnectorResult<MembershipOutcome> {
    membership::add_user_to_group(LdapDirectoryClient::new(), config, input).await
}

/// Delete a user entry.
pub async fn delete_user(
    config: &ConnectionConfig,
    input: &DeleteUserInput,
) -> ConnectorResult<DeleteOutcome> {
    removal::delete_user(LdapDirectoryClient::new(), config, input).await
}
