//! Command-line interface for project-tracker
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in per-entity submodules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::model::{EntityId, TaskStatus};
use crate::output::OutputOptions;
use crate::repository::Repository;
use crate::storage::{Snapshot, Store};

mod dump;
mod project;
mod task;
mod user;

/// Project Tracker CLI: manage users, projects, and tasks
#[derive(Parser, Debug)]
#[command(name = "project-tracker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the JSON store (overrides the config file)
    #[arg(long, global = true, env = "TRACKER_STORE")]
    pub store: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, env = "TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new user
    AddUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,
    },

    /// List users
    ListUsers,

    /// Create a project for a user
    AddProject {
        /// User name or email
        #[arg(long)]
        user: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Due date (e.g., 2025-09-30 or "Oct 2")
        #[arg(long)]
        due: Option<String>,
    },

    /// List projects (optionally by user)
    ListProjects {
        /// User name or email
        #[arg(long)]
        user: Option<String>,

        /// Search in title/description
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a task to a project
    AddTask {
        /// Project title
        #[arg(long)]
        project: String,

        #[arg(long)]
        title: String,

        /// User name or email
        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// List tasks (optionally filtered)
    ListTasks {
        /// Project title
        #[arg(long)]
        project: Option<String>,

        /// Only tasks with this status: todo, doing, done
        #[arg(long)]
        status: Option<TaskStatus>,
    },

    /// Mark a task done
    CompleteTask {
        #[arg(long)]
        task_id: EntityId,
    },

    /// Change a task's status (todo, doing, done)
    SetStatus {
        #[arg(long)]
        task_id: EntityId,

        #[arg(long)]
        status: String,
    },

    /// Assign/Change task owner
    AssignTask {
        #[arg(long)]
        task_id: EntityId,

        /// User name or email
        #[arg(long)]
        user: String,
    },

    /// Add a contributor (many-to-many)
    AddContributor {
        #[arg(long)]
        task_id: EntityId,

        /// User name or email
        #[arg(long)]
        user: String,
    },

    /// Edit project fields
    EditProject {
        #[arg(long)]
        project_id: EntityId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// New due date; an empty value clears it
        #[arg(long)]
        due: Option<String>,
    },

    /// Print raw JSON store for debugging
    DumpData,
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

/// Loaded configuration plus an opened repository
struct TrackerContext {
    config: Config,
    repo: Repository,
}

impl TrackerContext {
    fn none_marker(&self) -> &str {
        &self.config.output.none_marker
    }
}

fn open_store(globals: &GlobalOptions) -> Result<(Config, Store)> {
    let config = Config::discover(globals.config.as_deref())?;
    let path = config.store_path(globals.store.as_deref());
    debug!(store = %path.display(), "using store");
    let store = Store::new(path, Snapshot::empty()).with_indent(config.store.indent);
    Ok((config, store))
}

fn load_context(globals: &GlobalOptions) -> Result<TrackerContext> {
    let (config, store) = open_store(globals)?;
    let repo = Repository::open(store)?;
    Ok(TrackerContext { config, repo })
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = GlobalOptions {
            store: self.store,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::AddUser { name, email } => {
                user::run_add(user::AddOptions { name, email }, &globals)
            }
            Commands::ListUsers => user::run_list(&globals),
            Commands::AddProject {
                user,
                title,
                description,
                due,
            } => project::run_add(
                project::AddOptions {
                    user,
                    title,
                    description,
                    due,
                },
                &globals,
            ),
            Commands::ListProjects { user, search } => {
                project::run_list(project::ListOptions { user, search }, &globals)
            }
            Commands::EditProject {
                project_id,
                title,
                description,
                due,
            } => project::run_edit(
                project::EditOptions {
                    project_id,
                    title,
                    description,
                    due,
                },
                &globals,
            ),
            Commands::AddTask {
                project,
                title,
                assigned_to,
            } => task::run_add(
                task::AddOptions {
                    project,
                    title,
                    assigned_to,
                },
                &globals,
            ),
            Commands::ListTasks { project, status } => {
                task::run_list(task::ListOptions { project, status }, &globals)
            }
            Commands::CompleteTask { task_id } => task::run_complete(task_id, &globals),
            Commands::SetStatus { task_id, status } => {
                task::run_set_status(task_id, &status, &globals)
            }
            Commands::AssignTask { task_id, user } => task::run_assign(task_id, &user, &globals),
            Commands::AddContributor { task_id, user } => {
                task::run_add_contributor(task_id, &user, &globals)
            }
            Commands::DumpData => dump::run(&globals),
        }
    }
}
