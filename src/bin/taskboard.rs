//! Command-line front end for the task tracker.
//!
//! Usage:
//!
//! ```text
//! taskboard [--config <path>] <command>
//! ```
//!
//! Tasks are stored as JSON documents under the configured storage
//! directory. Every command loads the store, applies one operation and
//! prints the resulting board.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use taskboard::config::{ConfigError, TrackerConfig};
use taskboard::task::{
    adapters::{json_file::JsonFileTaskRepository, memory::RecordingView},
    domain::{
        CategoryId, DEADLINE_FORMAT, SortChoice, Task, TaskData, TaskDomainError, TaskId,
        TaskStatus, parse_deadline,
    },
    ports::TaskRepositoryError,
    services::{CreateTaskRequest, TaskStore, TaskStoreError, TransitionOutcome},
};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG: &str = "taskboard.toml";

type Store = TaskStore<JsonFileTaskRepository, RecordingView, DefaultClock>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    #[error(transparent)]
    Storage(#[from] TaskRepositoryError),
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    #[error("invalid task status: {0}")]
    Status(String),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to init tracing: {0}")]
    Tracing(String),
}

#[derive(Debug, Parser)]
#[command(name = "taskboard", about = "Personal task tracker")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the board, optionally only one category.
    List {
        /// Category label to filter by; an empty label lists uncategorized tasks.
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the live categories.
    Categories,
    /// Create a task.
    Add {
        #[command(flatten)]
        fields: TaskFields,
        /// Bucket to create the task in.
        #[arg(long, default_value = "pending")]
        status: String,
    },
    /// Replace the content of a task.
    Edit {
        /// Task identifier.
        id: TaskId,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Advance a task to its next bucket.
    Advance {
        /// Task identifier.
        id: TaskId,
    },
    /// Delete a task.
    Remove {
        /// Task identifier.
        id: TaskId,
    },
    /// Delete every task whose deadline had passed.
    PurgeOutdated,
    /// Delete every task of a category.
    RemoveCategory {
        /// Category label.
        label: String,
    },
    /// Delete every task.
    Clear,
    /// Reorder every task.
    Sort {
        /// One of `alpha_asc`, `alpha_desc`, `date_asc`, `date_desc`.
        choice: String,
    },
}

#[derive(Debug, clap::Args)]
struct TaskFields {
    /// Display name.
    #[arg(long)]
    title: String,
    /// Deadline as YYYY-MM-DD.
    #[arg(long)]
    deadline: String,
    /// Free-text category.
    #[arg(long, default_value = "")]
    category: String,
    /// Free-text description.
    #[arg(long, default_value = "")]
    description: String,
    /// Mark as urgent.
    #[arg(long)]
    urgent: bool,
    /// Mark as highlighted.
    #[arg(long)]
    highlight: bool,
}

impl TaskFields {
    fn into_data(self) -> Result<TaskData, CliError> {
        let deadline = parse_deadline(&self.deadline)?;
        Ok(TaskData::new(self.title, deadline)
            .with_category(self.category)
            .with_description(self.description)
            .with_urgent(self.urgent)
            .with_highlight(self.highlight))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "taskboard failed");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    init_tracing()?;
    let config = load_config(cli.config.as_deref())?;

    let repository = JsonFileTaskRepository::open(&config.storage_dir)?;
    let store = TaskStore::new(
        Arc::new(repository),
        Arc::new(RecordingView::with_durations(config.effects)),
        Arc::new(DefaultClock),
    );
    store.load(config.seed_defaults).await?;

    run(&store, cli.command).await
}

fn init_tracing() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| CliError::Tracing(err.to_string()))
}

fn load_config(path: Option<&Utf8Path>) -> Result<TrackerConfig, CliError> {
    match path {
        Some(explicit) => Ok(TrackerConfig::load(explicit)?),
        None if Utf8Path::new(DEFAULT_CONFIG).exists() => {
            Ok(TrackerConfig::load(Utf8Path::new(DEFAULT_CONFIG))?)
        }
        None => Ok(TrackerConfig::default()),
    }
}

async fn run(store: &Store, command: Command) -> Result<(), CliError> {
    match command {
        Command::List { category } => {
            let filter = category.as_deref().map(CategoryId::from_label);
            return print_tasks(&store.tasks_in_category(filter.as_ref()));
        }
        Command::Categories => return print_categories(store),
        Command::Add { fields, status } => {
            let bucket =
                TaskStatus::try_from(status.as_str()).map_err(|err| CliError::Status(err.0))?;
            let request = CreateTaskRequest::new(fields.into_data()?).with_status(bucket);
            let task = store.create_task(request).await?;
            info!(task_id = %task.id(), "added");
        }
        Command::Edit { id, fields } => {
            store.update_task(id, fields.into_data()?).await?;
        }
        Command::Advance { id } => {
            if store.transition(id).await? == TransitionOutcome::AlreadyCompleted {
                info!(task_id = %id, "task is already completed");
            }
        }
        Command::Remove { id } => store.remove_task(id).await?,
        Command::PurgeOutdated => {
            let removed = store.remove_all_outdated().await?;
            info!(removed, "purged outdated tasks");
        }
        Command::RemoveCategory { label } => {
            let removed = store.remove_category(&label).await?;
            info!(removed, category = %label, "removed category");
        }
        Command::Clear => {
            let removed = store.remove_all().await?;
            info!(removed, "cleared board");
        }
        Command::Sort { choice } => {
            store.sort(choice.parse::<SortChoice>()?).await?;
        }
    }
    print_board(store)
}

fn print_board(store: &Store) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for status in TaskStatus::ALL {
        writeln!(out, "== {status}")?;
        for task in store.bucket(status) {
            write_task(&mut out, &task)?;
        }
    }
    Ok(())
}

fn print_tasks(tasks: &[Task]) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for task in tasks {
        write_task(&mut out, task)?;
    }
    Ok(())
}

fn print_categories(store: &Store) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for category in store.categories() {
        writeln!(out, "{}\t{}", category.id(), category.label())?;
    }
    Ok(())
}

fn write_task(out: &mut impl Write, task: &Task) -> io::Result<()> {
    let mut flags = String::new();
    if task.data().urgent {
        flags.push_str(" !");
    }
    if task.data().highlight {
        flags.push_str(" *");
    }
    if task.is_outdated() {
        flags.push_str(" (outdated)");
    }
    writeln!(
        out,
        "{id}  [{status}] {title}  <{category}>  due {deadline}{flags}",
        id = task.id(),
        status = task.status(),
        title = task.title(),
        category = task.category(),
        deadline = task.deadline().format(DEADLINE_FORMAT),
    )
}
