//! Result assembly
//!
//! Caller-facing result shapes. Entries and an error message are mutually
//! exclusive: a failed outcome never carries partial entries.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult, ErrorKind};
use crate::operation::DirectoryEntry;

/// Result of a paginated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub entries: Vec<DirectoryEntry>,
}

impl SearchOutcome {
    /// A successful outcome with all collected entries.
    pub fn succeeded(entries: Vec<DirectoryEntry>) -> Self {
        Self {
            success: true,
            error: None,
            entries,
        }
    }

    /// A failed outcome with a human-readable message and no entries.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            entries: Vec::new(),
        }
    }

    /// Package a search result.
    ///
    /// Cancellation, configuration and protocol-contract errors are returned
    /// as `Err`; connectivity, authentication and operation failures become
    /// a failed outcome.
    pub fn assemble(result: ConnectorResult<Vec<DirectoryEntry>>) -> ConnectorResult<Self> {
        match result {
            Ok(entries) => Ok(Self::succeeded(entries)),
            Err(e) if is_reported(&e) => Ok(Self::failed(e.to_string())),
            Err(e) => Err(e),
        }
    }
}

/// Whether an error is reported inside an outcome rather than returned.
pub(crate) fn is_reported(error: &ConnectorError) -> bool {
    matches!(
        error.kind(),
        ErrorKind::Connectivity | ErrorKind::Authentication | ErrorKind::Operation
    ) || matches!(error, ConnectorError::InvalidData { .. } | ConnectorError::Protocol { .. })
}

/// Result of adding a user to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub user_dn: String,
    pub group_dn: String,

    /// The user was already a member and the add was skipped.
    #[serde(default)]
    pub already_member: bool,
}

/// Result of deleting an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Value of the entry's first RDN.
    pub common_name: String,

    /// DN of the container the entry lived in.
    pub path: String,
}
