use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    DepartmentCommands, GroupCommands, StepCommands, TagCommands, WorkflowCommands,
};

/// Command line editor for workflow process definitions
///
/// A workflow process is an ordered list of approval steps, each optionally
/// owned by a department, plus same-assignment groups saying which steps of
/// one department go to the same person. Definitions are edited in a local
/// draft file and submitted to a backend: the local SQLite store by default,
/// or a REST API when --api-url is given.
#[derive(Parser)]
#[command(version, about, name = "stepwise")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/stepwise/stepwise.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Base URL of a workflow REST API; overrides the local store
    #[arg(long, global = true, env = "STEPWISE_API_URL")]
    pub api_url: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Stepwise CLI
///
/// - `workflow`: drafts, submission and stored workflow processes
/// - `step`: edit the steps of a draft
/// - `group`: same-assignment groups of a draft
/// - `department`, `tag`: reference data for steps
#[derive(Subcommand)]
pub enum Commands {
    /// Manage workflow processes and drafts
    #[command(alias = "w")]
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
    /// Edit the steps of a draft
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Edit same-assignment groups of a draft
    #[command(alias = "g")]
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
    /// Manage departments
    #[command(alias = "d")]
    Department {
        #[command(subcommand)]
        command: DepartmentCommands,
    },
    /// Browse the field tags a step can check
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
}
