//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Run the HTTP service.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Interface to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Database file (overrides `storage.database_path`)
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,
}

/// List all students.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add a student.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Student name
    #[arg(short, long)]
    pub name: String,

    /// Student age
    #[arg(short, long)]
    pub age: String,

    /// Enrolled course
    #[arg(short, long)]
    pub course: String,
}

/// Update a student. Omitted fields keep their stored values.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Id of the student to update
    pub id: String,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New age
    #[arg(short, long)]
    pub age: Option<String>,

    /// New course
    #[arg(short, long)]
    pub course: Option<String>,
}

/// Delete a student.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the student to delete
    pub id: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to configuration file (uses default if not specified)
        file: Option<PathBuf>,
    },
}
