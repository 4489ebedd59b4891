//! CLI entry point for taskdeck.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::{AddArgs, EditArgs, LsArgs};
use taskdeck_app::{AppConfig, AsyncTaskStore, Backend, TaskCollection};
use taskdeck_core::TaskId;
use taskdeck_store::{HttpStore, JsonFileStore, MemoryStore};

mod commands;
mod view;

/// Dated, prioritized tasks mirrored from a REST service or a JSON file.
#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "taskdeck: dated, prioritized personal tasks")]
struct Cli {
    /// Configuration file (defaults to the per-user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks, open ones first.
    Ls(LsArgs),

    /// Create a task.
    Add(AddArgs),

    /// Change fields of an existing task.
    Edit(EditArgs),

    /// Toggle the done flag of a task.
    Done {
        #[arg(long)]
        id: TaskId,
    },

    /// Delete a task.
    Rm {
        #[arg(long)]
        id: TaskId,
    },

    /// Interactive session where deletions can be undone.
    Shell,
}

fn main() -> Result<()> {
    let Cli { config, cmd } = Cli::parse();
    install_tracing();

    let config = AppConfig::load(config.as_deref())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(&config, cmd))
}

async fn execute_command(config: &AppConfig, command: Command) -> Result<()> {
    let store = &config.store;
    match store.backend {
        Backend::Http => {
            let http = HttpStore::new(&store.url, store.timeout())?;
            run_with(http, config, command).await
        }
        Backend::File => run_with(JsonFileStore::new(&store.path), config, command).await,
        Backend::Memory => run_with(MemoryStore::new(), config, command).await,
    }
}

async fn run_with<S: AsyncTaskStore>(store: S, config: &AppConfig, command: Command) -> Result<()> {
    let mut collection = TaskCollection::with_options(store, config.collection_options());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(command, &mut collection, &mut out).await
}

fn install_tracing() {
    // Honors RUST_LOG; stdout stays reserved for command output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::{Priority, SortKey};

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "taskdeck",
            "--config",
            "/tmp/taskdeck.toml",
            "add",
            "--text",
            "Doctors Appointment",
            "--date",
            "2024-02-05",
            "--time",
            "14:30",
            "--priority",
            "high",
            "--reminder",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/taskdeck.toml")));
        match cli.cmd {
            Command::Add(args) => {
                assert_eq!(args.text, "Doctors Appointment");
                assert_eq!(args.date, "2024-02-05");
                assert_eq!(args.time, "14:30");
                assert_eq!(args.priority, Priority::High);
                assert!(args.reminder);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_ls_command() {
        let cli = Cli::parse_from(["taskdeck", "ls", "--search", "milk", "--sort", "priorityDesc"]);
        match cli.cmd {
            Command::Ls(args) => {
                assert_eq!(args.search.as_deref(), Some("milk"));
                assert_eq!(args.sort, Some(SortKey::PriorityDesc));
            }
            _ => panic!("expected ls command"),
        }
    }

    #[test]
    fn parse_done_command() {
        let cli = Cli::parse_from(["taskdeck", "done", "--id", "5"]);
        match cli.cmd {
            Command::Done { id } => assert_eq!(id, TaskId(5)),
            _ => panic!("expected done command"),
        }
    }

    #[test]
    fn rejects_bad_priority() {
        assert!(Cli::try_parse_from(["taskdeck", "add", "--text", "x", "--date", "d", "--time", "t", "--priority", "urgent"]).is_err());
    }
}
