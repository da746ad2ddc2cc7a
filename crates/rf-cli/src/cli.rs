//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::fetch::FetchArgs;
use crate::commands::find::FindArgs;

/// Classroom finder.
///
/// Answers "which classrooms are free right now, and for how long?" from
/// the campus reference tables and the classrooms' calendar feeds.
#[derive(Debug, Parser)]
#[command(name = "rf", version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find classrooms matching the given criteria.
    Find(FindArgs),

    /// Download every calendar feed into the cache.
    Fetch(FetchArgs),

    /// List the registered sub-buildings, buildings and locations.
    Locations {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
