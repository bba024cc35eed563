//! CLI error types and exit codes

use dirtasks_connector::error::{ConnectorError, ErrorKind};
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: Task ran and reported a failure, or general error
/// - 2: Authentication failed
/// - 3: Directory unreachable
/// - 4: Invalid task file or input
/// - 5: Protocol or server error
/// - 130: Cancelled (Ctrl-C)
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid task file: {0}")]
    Validation(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) | CliError::Output(_) => 1,
            CliError::Validation(_) => 4,
            CliError::Connector(e) => match e.kind() {
                ErrorKind::Configuration => 4,
                ErrorKind::Connectivity => 3,
                ErrorKind::Authentication => 2,
                ErrorKind::Protocol | ErrorKind::Operation => 5,
                ErrorKind::Cancelled => 130,
            },
        }
    }

    /// Print the error to stderr
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(format!("JSON error: {}", e))
    }
}
