//! # Directory Task Framework
//!
//! Directory-agnostic core for paginated directory searches and one-shot
//! directory tasks.
//!
//! ## Architecture
//!
//! - [`DirectoryClient`] - capability trait each directory library implements
//! - [`Session`] - validated, connected and bound client
//! - [`search`] - the RFC 2696 paging driver with cooperative cancellation
//! - [`coerce`] - raw attribute values to string / hex / GUID representations
//! - [`outcome`] - caller-facing result shapes
//! - [`membership`], [`removal`] - add-to-group and delete-entry tasks
//!
//! ## Example
//!
//! ```ignore
//! use dirtasks_connector::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ConnectionConfig::new("dc.example.com").with_credentials("u", "p");
//! let spec = SearchRequestSpec::new("ou=users,dc=example,dc=com", Scope::Subtree, "(objectClass=person)")
//!     .with_attribute(AttributeSpec::guid("objectGUID"))
//!     .with_page_size(200);
//!
//! let outcome = search_objects(client, &config, &spec, &CancellationToken::new()).await?;
//! ```

pub mod coerce;
pub mod config;
pub mod dn;
pub mod error;
pub mod membership;
pub mod operation;
pub mod outcome;
pub mod removal;
pub mod search;
pub mod session;
pub mod traits;
pub mod types;

pub use traits::DirectoryClient;
pub use session::Session;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{BindCredentials, ConnectionConfig, TlsMode, DEFAULT_LDAP_PORT};
    pub use crate::error::{ConnectorError, ConnectorResult, ErrorKind};
    pub use crate::membership::{add_user_to_group, AddToGroupInput, UserExistsAction};
    pub use crate::operation::{
        AttributeSpec, AttributeValue, DirectoryEntry, EntryAttribute, PageCursor, PageRequest,
        PageResponse, RawAttribute, RawEntry, SearchRequestSpec, DEFAULT_PAGE_SIZE,
    };
    pub use crate::outcome::{DeleteOutcome, MembershipOutcome, SearchOutcome};
    pub use crate::removal::{delete_user, DeleteUserInput};
    pub use crate::search::{drain_pages, run_search, search_objects};
    pub use crate::session::Session;
    pub use crate::traits::DirectoryClient;
    pub use crate::types::{DerefPolicy, ReturnType, Scope};
}

// Re-export async_trait for client implementors
pub use async_trait::async_trait;
