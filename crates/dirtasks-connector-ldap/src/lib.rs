//! # LDAP Directory Client
//!
//! LDAP/Active Directory backend for dirtasks, built on `ldap3`.
//!
//! ## Features
//!
//! - LDAP v3 over plain TCP, LDAPS and StartTLS
//! - RFC 2696 paged searches with order-preserving entry decoding
//! - Group membership and entry deletion
//!
//! ## Example
//!
//! ```ignore
//! use dirtasks_connector::prelude::*;
//! use dirtasks_connector_ldap::search_objects;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ConnectionConfig::new("dc01.example.com")
//!     .with_credentials("EXAMPLE\\svc-tasks", "secret")
//!     .with_tls_mode(TlsMode::StartTls);
//! let spec = SearchRequestSpec::new("DC=example,DC=com", Scope::Subtree, "(objectClass=user)")
//!     .with_attribute(AttributeSpec::guid("objectGUID"));
//!
//! let outcome = search_objects(&config, &spec, &CancellationToken::new()).await?;
//! ```

pub mod client;
pub mod entry;
pub mod settings;
pub mod tasks;
pub mod translate;

// Re-exports
pub use client::LdapDirectoryClient;
pub use tasks::{add_user_to_group, delete_user, search_objects};
