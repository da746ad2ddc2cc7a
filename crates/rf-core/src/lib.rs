//! Core domain logic for the classroom finder.
//!
//! This crate contains the fundamental types and logic for:
//! - Schedules: point-in-time availability over a classroom's courses
//! - Locations: alias-keyed registries of campuses and buildings
//! - Catalog: the classroom collection and its filtering pipeline

mod catalog;
pub mod classroom;
pub mod filter;
pub mod interval;
pub mod location;
pub mod schedule;

pub use catalog::{Catalog, CatalogError};
pub use classroom::{Capacity, Classroom, ClassroomRecord, Equipment};
pub use filter::{ClassroomFilter, Criterion};
pub use interval::{Interval, IntervalError};
pub use location::{Location, LocationKind, LocationLabel, LocationRegistry, Locations};
pub use schedule::{INDEFINITE_AVAILABILITY, Schedule};
