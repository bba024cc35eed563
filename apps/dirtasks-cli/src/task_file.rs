//! YAML task files
//!
//! A task file holds the connection and the task input:
//!
//! ```yaml
//! connection:
//!   host: dc01.example.com
//!   username: EXAMPLE\svc-tasks
//!   tls_mode: start_tls
//! input:
//!   search_base: OU=Users,DC=example,DC=com
//!   filter: (objectClass=user)
//!   page_size: 200
//!   attributes:
//!     - key: objectGUID
//!       return_type: guid
//! ```

use std::fs;
use std::path::Path;

use dirtasks_connector::config::ConnectionConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{CliError, CliResult};

/// Connection plus task input, as read from a task file.
#[derive(Debug, Deserialize)]
pub struct TaskFile<I> {
    pub connection: ConnectionConfig,
    pub input: I,
}

impl<I> TaskFile<I> {
    /// Use `password` for the bind, replacing any password in the file.
    pub fn with_password(mut self, password: Option<String>) -> Self {
        if let Some(password) = password {
            self.connection.password = Some(password);
        }
        self
    }
}

/// Parse a task file from YAML text.
pub fn parse_task_file<I: DeserializeOwned>(content: &str) -> CliResult<TaskFile<I>> {
    serde_yaml::from_str(content).map_err(|e| {
        let location = if let Some(loc) = e.location() {
            format!(" at line {}, column {}", loc.line(), loc.column())
        } else {
            String::new()
        };
        CliError::Validation(format!("Invalid YAML{location}: {e}"))
    })
}

/// Read and parse a task file.
pub fn load_task_file<I: DeserializeOwned>(path: &Path) -> CliResult<TaskFile<I>> {
    if !path.exists() {
        return Err(CliError::Validation(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("Failed to read file {}: {}", path.display(), e)))?;

    parse_task_file(&content)
}
