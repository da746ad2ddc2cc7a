//! CLI subcommand implementations.

pub mod fetch;
pub mod find;
pub mod locations;
pub mod util;
