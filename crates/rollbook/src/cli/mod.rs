//! Command-line interface for rollbook.
//!
//! This module provides the CLI structure for the `rollbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, ListCommand, ServeCommand, UpdateCommand,
};

use crate::logging::Verbosity;

/// rollbook - Keep track of students
///
/// Runs the students HTTP service, or talks to one as a client.
#[derive(Debug, Parser)]
#[command(name = "rollbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short = 'C', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Students collection URL (overrides `client.api_url`)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the students HTTP service
    Serve(ServeCommand),

    /// List all students
    List(ListCommand),

    /// Add a student
    Add(AddCommand),

    /// Update a student
    Update(UpdateCommand),

    /// Delete a student
    Delete(DeleteCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
