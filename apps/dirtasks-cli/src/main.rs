//! dirtasks CLI - run directory tasks from YAML task files
//!
//! Each command reads a task file, runs one task against the directory and
//! prints the JSON outcome on stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dirtasks_connector::membership::AddToGroupInput;
use dirtasks_connector::operation::SearchRequestSpec;
use dirtasks_connector::removal::DeleteUserInput;

mod error;
mod logging;
mod task_file;

use error::CliResult;
use task_file::{load_task_file, TaskFile};

/// dirtasks - paginated directory search and directory maintenance tasks
#[derive(Parser, Debug)]
#[command(name = "dirtasks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Pretty-print the JSON result
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a paginated search
    Search(TaskArgs),

    /// Add a user to a group
    AddToGroup(TaskArgs),

    /// Delete a user entry
    DeleteUser(TaskArgs),
}

#[derive(Args)]
struct TaskArgs {
    /// Path to the YAML task file
    #[arg(short = 't', long = "task")]
    task: PathBuf,

    /// Bind password, overriding the task file
    #[arg(long, env = "DIRTASKS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl std::fmt::Debug for TaskArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskArgs")
            .field("task", &self.task)
            .field("password", &self.password.as_ref().map(|_| "***REDACTED***"))
            .finish()
    }
}

impl TaskArgs {
    fn load<I: serde::de::DeserializeOwned>(&self) -> CliResult<TaskFile<I>> {
        Ok(load_task_file(&self.task)?.with_password(self.password.clone()))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.log_level, cli.log_json) {
        e.print();
        std::process::exit(e.exit_code());
    }

    match run(cli).await {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

/// Run the selected task. Returns whether the task succeeded.
async fn run(cli: Cli) -> CliResult<bool> {
    match &cli.command {
        Commands::Search(args) => {
            let task: TaskFile<SearchRequestSpec> = args.load()?;
            let cancel = cancel_on_ctrl_c();
            let outcome =
                dirtasks_connector_ldap::search_objects(&task.connection, &task.input, &cancel)
                    .await?;
            info!(entries = outcome.entries.len(), "Search finished");
            print_json(&outcome, cli.pretty)?;
            Ok(outcome.success)
        }
        Commands::AddToGroup(args) => {
            let task: TaskFile<AddToGroupInput> = args.load()?;
            let outcome =
                dirtasks_connector_ldap::add_user_to_group(&task.connection, &task.input).await?;
            print_json(&outcome, cli.pretty)?;
            Ok(outcome.success)
        }
        Commands::DeleteUser(args) => {
            let task: TaskFile<DeleteUserInput> = args.load()?;
            let outcome =
                dirtasks_connector_ldap::delete_user(&task.connection, &task.input).await?;
            print_json(&outcome, cli.pretty)?;
            Ok(outcome.success)
        }
    }
}

/// A token cancelled on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, cancelling");
                trigger.cancel();
            }
            Err(e) => warn!(error = %e, "Unable to listen for Ctrl-C"),
        }
    });
    token
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
