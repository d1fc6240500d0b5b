//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the capi binary.

use clap::{Parser, Subcommand};

/// Cloud Controller API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "capi", about = "Cloud Controller API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Give up after this many seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
///
/// Commands taking an optional app fall back to `CAPI_APP_GUID`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List an app's processes.
    Processes {
        /// App guid.
        app: Option<String>,
    },

    /// Show per-instance statistics of a process.
    Stats {
        /// Process guid.
        process: String,
    },

    /// Resolve an app name in `CAPI_SPACE_GUID` to its guid.
    AppGuid {
        /// App name.
        name: String,
    },

    /// Show the guid of an app's current droplet.
    Droplet {
        /// App guid.
        app: Option<String>,
    },

    /// Show the package behind an app's current droplet.
    Package {
        /// App guid.
        app: Option<String>,
    },

    /// Show an app's environment variables.
    Env {
        /// App guid.
        app: Option<String>,
    },

    /// Work with tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
}

/// Task subcommands.
#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Get a task by guid.
    Get {
        /// Task guid.
        guid: String,
    },

    /// List an app's tasks.
    List {
        /// App guid.
        app: Option<String>,

        /// Only tasks with this name (repeatable).
        #[arg(long = "name")]
        names: Vec<String>,

        /// Only tasks in this state (repeatable).
        #[arg(long = "state")]
        states: Vec<String>,
    },

    /// Run a command as a task.
    Run {
        /// Command to run.
        command: String,

        /// Task name.
        #[arg(long)]
        name: Option<String>,

        /// Droplet to run against (defaults to the app's current droplet).
        #[arg(long)]
        droplet: Option<String>,

        /// App guid.
        #[arg(long)]
        app: Option<String>,

        /// Wait for the task to finish.
        #[arg(long, default_value = "false")]
        wait: bool,
    },
}
