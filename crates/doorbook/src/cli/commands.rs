//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::building::BuildingDraft;

/// Fields accepted when adding a building.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Building name
    pub name: String,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Optional building fields shared by `add` and `edit`.
///
/// On `edit`, an empty string clears the field.
#[derive(Debug, Default, Args)]
pub struct FieldArgs {
    /// Street address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Neighborhood or district
    #[arg(short, long)]
    pub neighborhood: Option<String>,

    /// Street-door code
    #[arg(long = "outer-code", value_name = "CODE")]
    pub outer_door_code: Option<String>,

    /// Inner-door code
    #[arg(long = "inner-code", value_name = "CODE")]
    pub inner_door_code: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl FieldArgs {
    /// Overlay the given fields onto `draft`, leaving unspecified ones alone.
    #[must_use]
    pub fn overlay(self, mut draft: BuildingDraft) -> BuildingDraft {
        if self.address.is_some() {
            draft.address = self.address;
        }
        if self.neighborhood.is_some() {
            draft.neighborhood = self.neighborhood;
        }
        if self.outer_door_code.is_some() {
            draft.outer_door_code = self.outer_door_code;
        }
        if self.inner_door_code.is_some() {
            draft.inner_door_code = self.inner_door_code;
        }
        if self.notes.is_some() {
            draft.notes = self.notes;
        }
        draft
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the building to edit
    pub id: String,

    /// New building name
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the building to show
    pub id: String,

    /// Don't record this as a view
    #[arg(long)]
    pub no_touch: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the building to delete
    pub id: String,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Recent command arguments.
#[derive(Debug, Args)]
pub struct RecentCommand {
    /// Maximum number of buildings (defaults to the configured limit)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in name, address, neighborhood and notes
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write to this directory instead of the configured one
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file
    #[arg(long, conflicts_with = "dir")]
    pub stdout: bool,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Export document to import
    pub file: PathBuf,

    /// Confirm that all existing buildings will be replaced
    #[arg(short, long)]
    pub yes: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Confirm that all buildings will be deleted
    #[arg(short, long)]
    pub yes: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
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

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
