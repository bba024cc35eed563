//! Group membership task
//!
//! Adds a user DN to a group's `member` attribute with one modify request.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ConnectionConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::outcome::{is_reported, MembershipOutcome};
use crate::session::Session;
use crate::traits::DirectoryClient;

/// Attribute holding group members.
pub const MEMBER_ATTRIBUTE: &str = "member";

/// What to do when the user is already a member of the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserExistsAction {
    /// Report a failure.
    #[default]
    #[serde(alias = "Throw", alias = "throw")]
    Fail,
    /// Treat the request as satisfied.
    #[serde(alias = "Skip", alias = "skip")]
    Ignore,
}

/// Input of the add-to-group task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToGroupInput {
    /// DN of the user to add.
    pub user_dn: String,

    /// DN of the group to add the user to.
    pub group_dn: String,

    #[serde(default)]
    pub user_exists_action: UserExistsAction,
}

impl AddToGroupInput {
    pub fn new(user_dn: impl Into<String>, group_dn: impl Into<String>) -> Self {
        Self {
            user_dn: user_dn.into(),
            group_dn: group_dn.into(),
            user_exists_action: UserExistsAction::Fail,
        }
    }

    #[must_use]
    pub fn with_user_exists_action(mut self, action: UserExistsAction) -> Self {
        self.user_exists_action = action;
        self
    }

    pub fn validate(&self) -> ConnectorResult<()> {
        if self.user_dn.trim().is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "user distinguished name is missing",
            ));
        }
        if self.group_dn.trim().is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "group distinguished name is missing",
            ));
        }
        Ok(())
    }
}

/// Connect, bind, add the member and release the connection.
#[instrument(skip_all, fields(host = %config.host, group = %input.group_dn))]
pub async fn add_user_to_group<C: DirectoryClient>(
    client: C,
    config: &ConnectionConfig,
    input: &AddToGroupInput,
) -> ConnectorResult<MembershipOutcome> {
    config.validate()?;
    input.validate()?;

    let result = async {
        let mut session = Session::establish(client, config).await?;
        let added = session
            .client_mut()
            .add_values(
                &input.group_dn,
                MEMBER_ATTRIBUTE,
                std::slice::from_ref(&input.user_dn),
            )
            .await;
        session.release().await;
        added
    }
    .await;

    let mut outcome = MembershipOutcome {
        success: true,
        error: None,
        user_dn: input.user_dn.clone(),
        group_dn: input.group_dn.clone(),
        already_member: false,
    };

    match result {
        Ok(()) => {
            info!(user = %input.user_dn, "User added to group");
        }
        Err(ConnectorError::AttributeValueExists { .. })
            if input.user_exists_action == UserExistsAction::Ignore =>
        {
            info!(user = %input.user_dn, "User already a member, skipped");
            outcome.already_member = true;
        }
        Err(e) if is_reported(&e) => {
            outcome.success = false;
            outcome.already_member = matches!(e, ConnectorError::AttributeValueExists { .. });
            outcome.error = Some(e.to_string());
        }
        Err(e) => return Err(e),
    }

    Ok(outcome)
}
