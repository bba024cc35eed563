//! Search operation types
//!
//! Search request parameters, raw page exchange types and the normalized
//! entries produced by a search.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};
use crate::types::{DerefPolicy, ReturnType, Scope};

/// Page size used when the requested page size is not positive.
pub const DEFAULT_PAGE_SIZE: i32 = 500;

/// Filter used when the requested filter is empty.
pub const MATCH_ALL_FILTER: &str = "(objectClass=*)";

/// An attribute to request, with the representation to return it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Attribute name, matched case-insensitively against returned names.
    pub key: String,

    #[serde(default)]
    pub return_type: ReturnType,
}

impl AttributeSpec {
    /// Request an attribute as a plain string.
    pub fn string(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            return_type: ReturnType::String,
        }
    }

    /// Request an attribute as an uppercase hex string.
    pub fn bytes(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            return_type: ReturnType::Byte,
        }
    }

    /// Request an attribute as GUID text.
    pub fn guid(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            return_type: ReturnType::Guid,
        }
    }
}

/// Parameters of one paginated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequestSpec {
    /// DN to start from. Empty means the root.
    #[serde(default)]
    pub search_base: String,

    #[serde(default)]
    pub scope: Scope,

    /// Search filter. Empty matches every entry.
    #[serde(default)]
    pub filter: String,

    /// Attributes to return. Empty returns all user attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,

    /// Entries per page. Not positive means 500.
    #[serde(default = "default_page_size")]
    pub page_size: i32,

    /// Stop after this many entries. Not positive means unlimited.
    #[serde(default)]
    pub max_results: i32,

    /// Client-side batching hint for backends that stream within a page.
    #[serde(default = "default_batch_size")]
    pub batch_size: i32,

    /// Maximum time to wait for each page, in milliseconds. 0 means no limit.
    #[serde(default)]
    pub ms_limit: u64,

    /// Time limit sent to the server, in seconds. 0 means no limit.
    #[serde(default)]
    pub server_time_limit: i32,

    #[serde(default)]
    pub deref: DerefPolicy,

    /// Return attribute names only.
    #[serde(default)]
    pub types_only: bool,
}

fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

fn default_batch_size() -> i32 {
    1
}

impl Default for SearchRequestSpec {
    fn default() -> Self {
        Self {
            search_base: String::new(),
            scope: Scope::Subtree,
            filter: String::new(),
            attributes: Vec::new(),
            page_size: default_page_size(),
            max_results: 0,
            batch_size: default_batch_size(),
            ms_limit: 0,
            server_time_limit: 0,
            deref: DerefPolicy::Never,
            types_only: false,
        }
    }
}

impl SearchRequestSpec {
    /// Create a search with the given base, scope and filter.
    pub fn new(search_base: impl Into<String>, scope: Scope, filter: impl Into<String>) -> Self {
        Self {
            search_base: search_base.into(),
            scope,
            filter: filter.into(),
            ..Default::default()
        }
    }

    /// Add a requested attribute.
    #[must_use]
    pub fn with_attribute(mut self, spec: AttributeSpec) -> Self {
        self.attributes.push(spec);
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the result cap.
    #[must_use]
    pub fn with_max_results(mut self, max_results: i32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the dereference policy.
    #[must_use]
    pub fn with_deref(mut self, deref: DerefPolicy) -> Self {
        self.deref = deref;
        self
    }

    /// Page size actually sent in the paging control.
    pub fn effective_page_size(&self) -> i32 {
        if self.page_size > 0 {
            self.page_size
        } else {
            DEFAULT_PAGE_SIZE
        }
    }

    /// Filter actually sent to the server.
    pub fn effective_filter(&self) -> &str {
        if self.filter.trim().is_empty() {
            MATCH_ALL_FILTER
        } else {
            &self.filter
        }
    }

    /// Result cap, if any.
    pub fn result_limit(&self) -> Option<usize> {
        usize::try_from(self.max_results).ok().filter(|n| *n > 0)
    }

    /// Attribute names to request, in order. Empty means all.
    pub fn requested_attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.key.as_str()).collect()
    }

    /// Validate the request. Never touches the network.
    pub fn validate(&self) -> ConnectorResult<()> {
        if let Some(spec) = self.attributes.iter().find(|a| a.key.trim().is_empty()) {
            return Err(ConnectorError::invalid_configuration(format!(
                "attribute key must not be blank (return type {:?})",
                spec.return_type
            )));
        }

        if self.server_time_limit < 0 {
            return Err(ConnectorError::invalid_configuration(
                "server_time_limit must not be negative",
            ));
        }

        Ok(())
    }
}

/// Opaque paging cookie issued by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor(Vec<u8>);

impl PageCursor {
    /// Cursor for the first page.
    pub fn start() -> Self {
        Self(Vec::new())
    }

    pub fn from_cookie(cookie: Vec<u8>) -> Self {
        Self(cookie)
    }

    /// An empty cookie marks the last page.
    pub fn is_last(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cookie(&self) -> &[u8] {
        &self.0
    }
}

/// One page request handed to a directory client.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub spec: &'a SearchRequestSpec,
    pub page_size: i32,
    pub cursor: &'a PageCursor,
    /// 1-based page number, for diagnostics.
    pub page_number: u32,
}

/// One raw attribute as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    pub name: String,
    pub values: Vec<Vec<u8>>,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>, values: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Attribute with UTF-8 string values.
    pub fn strings<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            values
                .into_iter()
                .map(|v| v.into().into_bytes())
                .collect(),
        )
    }
}

/// One raw entry as returned by the server, attributes in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub dn: String,
    pub attributes: Vec<RawAttribute>,
}

/// The server's answer to one page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResponse {
    pub entries: Vec<RawEntry>,
    /// Cursor from the paging response control. `None` when the control
    /// was absent, which is treated as the last page.
    pub cursor: Option<PageCursor>,
}

impl PageResponse {
    /// Whether another page must be requested.
    pub fn next_cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref().filter(|c| !c.is_last())
    }
}

/// A coerced attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Scalar(String),
    List(Vec<String>),
}

impl AttributeValue {
    /// Get the scalar value, if single-valued.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AttributeValue::Scalar(s) => Some(s),
            AttributeValue::List(_) => None,
        }
    }

    /// Get all values as string slices.
    pub fn as_strings(&self) -> Vec<&str> {
        match self {
            AttributeValue::Scalar(s) => vec![s.as_str()],
            AttributeValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Scalar(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Scalar(s.to_string())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        AttributeValue::List(values)
    }
}

/// A named, coerced attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAttribute {
    pub key: String,
    pub value: AttributeValue,
}

/// A normalized search result entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub distinguished_name: String,
    pub attributes: Vec<EntryAttribute>,
}

impl DirectoryEntry {
    pub fn new(distinguished_name: impl Into<String>) -> Self {
        Self {
            distinguished_name: distinguished_name.into(),
            attributes: Vec::new(),
        }
    }

    /// Get the first attribute with this name (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.key.eq_ignore_ascii_case(key))
            .map(|a| &a.value)
    }
}
