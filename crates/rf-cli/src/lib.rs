//! Classroom finder CLI library.
//!
//! This crate provides the CLI interface for the classroom finder.

mod cli;
pub mod commands;
mod config;
pub mod loader;

pub use cli::{Cli, Commands};
pub use config::Config;
