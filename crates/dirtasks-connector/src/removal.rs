//! Entry removal task
//!
//! Deletes one directory entry by DN.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ConnectionConfig;
use crate::dn::{compose_dn, first_rdn_value, split_first_rdn};
use crate::error::{ConnectorError, ConnectorResult};
use crate::outcome::{is_reported, DeleteOutcome};
use crate::session::Session;
use crate::traits::DirectoryClient;

/// Input of the delete-user task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserInput {
    /// DN of the entry to delete.
    pub distinguished_name: String,
}

impl DeleteUserInput {
    pub fn new(distinguished_name: impl Into<String>) -> Self {
        Self {
            distinguished_name: distinguished_name.into(),
        }
    }

    /// Build the DN from a common name and its container path.
    pub fn from_parts(common_name: &str, path: &str) -> Self {
        Self::new(compose_dn("CN", common_name, path))
    }

    pub fn validate(&self) -> ConnectorResult<()> {
        if self.distinguished_name.trim().is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "distinguished name is missing",
            ));
        }
        Ok(())
    }
}

/// Connect, bind, delete the entry and release the connection.
#[instrument(skip_all, fields(host = %config.host, dn = %input.distinguished_name))]
pub async fn delete_user<C: DirectoryClient>(
    client: C,
    config: &ConnectionConfig,
    input: &DeleteUserInput,
) -> ConnectorResult<DeleteOutcome> {
    config.validate()?;
    input.validate()?;

    let dn = input.distinguished_name.trim();
    let (_, path) = split_first_rdn(dn);

    let mut outcome = DeleteOutcome {
        success: true,
        error: None,
        common_name: first_rdn_value(dn),
        path: path.to_string(),
    };

    let result = async {
        let mut session = Session::establish(client, config).await?;
        let deleted = session.client_mut().delete(dn).await;
        session.release().await;
        deleted
    }
    .await;

    match result {
        Ok(()) => info!("Entry deleted"),
        Err(e) if is_reported(&e) => {
            outcome.success = false;
            outcome.error = Some(e.to_string());
        }
        Err(e) => return Err(e),
    }

    Ok(outcome)
}
