//! Search option enums and their wire translation
//!
//! Caller-facing enumerations for search scope, alias dereferencing and
//! attribute return types. The wire values are the RFC 4511 enumerations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConnectorError;

/// Search depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
    /// The base entry only.
    Base,
    /// Immediate children of the base entry.
    OneLevel,
    /// The base entry and all of its descendants.
    #[default]
    Subtree,
}

impl Scope {
    /// RFC 4511 `SearchRequest.scope` value.
    pub fn wire_value(self) -> i32 {
        match self {
            Scope::Base => 0,
            Scope::OneLevel => 1,
            Scope::Subtree => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Base => "base",
            Scope::OneLevel => "one-level",
            Scope::Subtree => "subtree",
        }
    }
}

impl FromStr for Scope {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" | "scopebase" => Ok(Scope::Base),
            "one-level" | "onelevel" | "one" | "scopeone" => Ok(Scope::OneLevel),
            "subtree" | "sub" | "scopesub" => Ok(Scope::Subtree),
            _ => Err(ConnectorError::InvalidScope {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Scope {
    type Error = ConnectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.as_str().to_string()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When alias entries are dereferenced during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DerefPolicy {
    #[default]
    Never,
    /// While searching below the base.
    Searching,
    /// When locating the base entry.
    Finding,
    Always,
}

impl DerefPolicy {
    /// RFC 4511 `SearchRequest.derefAliases` value.
    pub fn wire_value(self) -> i32 {
        match self {
            DerefPolicy::Never => 0,
            DerefPolicy::Searching => 1,
            DerefPolicy::Finding => 2,
            DerefPolicy::Always => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DerefPolicy::Never => "never",
            DerefPolicy::Searching => "searching",
            DerefPolicy::Finding => "finding",
            DerefPolicy::Always => "always",
        }
    }
}

impl FromStr for DerefPolicy {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "derefnever" => Ok(DerefPolicy::Never),
            "searching" | "derefsearching" => Ok(DerefPolicy::Searching),
            "finding" | "dereffinding" => Ok(DerefPolicy::Finding),
            "always" | "derefalways" => Ok(DerefPolicy::Always),
            _ => Err(ConnectorError::InvalidDereference {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for DerefPolicy {
    type Error = ConnectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DerefPolicy> for String {
    fn from(policy: DerefPolicy) -> Self {
        policy.as_str().to_string()
    }
}

/// Representation an attribute value is returned in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Natural string conversion of each value.
    #[default]
    #[serde(alias = "String")]
    String,
    /// Uppercase hex of the raw bytes, no separators.
    #[serde(alias = "Byte", alias = "bytes")]
    Byte,
    /// Canonical GUID text of a 16-byte value.
    #[serde(alias = "Guid", alias = "uuid")]
    Guid,
}
