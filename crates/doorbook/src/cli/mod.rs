//! Command-line interface for doorbook.
//!
//! This module provides the CLI structure for the `doorbook` binary, the
//! front end that drives the record store.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, DeleteCommand, EditCommand, ExportCommand,
    FieldArgs, ImportCommand, ListCommand, OutputFormat, RecentCommand, SearchCommand,
    ShowCommand, StatsCommand,
};

/// doorbook - Building names and door codes, kept on your device
///
/// A personal directory of buildings, addresses and entry codes for couriers.
#[derive(Debug, Parser)]
#[command(name = "doorbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
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
    /// Add a building
    Add(AddCommand),

    /// Show one building and mark it as viewed
    Show(ShowCommand),

    /// Edit a building's details
    Edit(EditCommand),

    /// Delete a building
    Delete(DeleteCommand),

    /// List all buildings
    List(ListCommand),

    /// List recently viewed buildings
    Recent(RecentCommand),

    /// Search buildings
    Search(SearchCommand),

    /// Export all buildings to a JSON file
    Export(ExportCommand),

    /// Replace all buildings with the contents of an export file
    Import(ImportCommand),

    /// Delete all buildings
    Clear(ClearCommand),

    /// Show storage statistics
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
