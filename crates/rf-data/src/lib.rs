//! Data loading for the classroom finder.
//!
//! Turns the CSV reference tables into a [`rf_core::Catalog`] and calendar
//! feeds into [`rf_core::Schedule`]s.
//!
//! # Failure policy
//!
//! Reference tables are required: any unreadable file or row is an error.
//! Calendar feeds are best effort: malformed events are dropped while
//! parsing, and a feed that cannot be parsed at all leaves its classrooms
//! with an empty schedule.

use std::path::PathBuf;

use rf_core::CatalogError;
use thiserror::Error;

pub mod calendar;
pub mod reference;

pub use calendar::{Feed, install_feeds, parse_calendar};
pub use reference::{
    CLASSROOMS_FILE, load_catalog, load_classrooms, load_locations, location_file,
};

/// Data loading errors.
#[derive(Debug, Error)]
pub enum DataError {
    /// A reference table could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A yes/no column held something else.
    #[error("invalid {column} value for classroom {classroom}: {value:?} (expected Yes or No)")]
    InvalidFlag {
        classroom: String,
        column: &'static str,
        value: String,
    },

    /// The reference tables are inconsistent.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A calendar feed is not valid iCalendar.
    #[error("invalid calendar {schedule_id}: {message}")]
    InvalidCalendar { schedule_id: String, message: String },
}
