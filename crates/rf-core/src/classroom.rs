//! Classroom records and their live schedule.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, TimeDelta, TimeZone};
use serde::Serialize;

use crate::interval::Interval;
use crate::location::LocationKind;
use crate::schedule::Schedule;

/// A classroom row as supplied by the reference data provider.
///
/// Location fields hold raw aliases; they are resolved against the
/// registries when the catalog is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassroomRecord {
    pub name: String,
    pub description: Option<String>,
    pub floor: Option<i32>,
    pub sub_building: Option<String>,
    pub building: Option<String>,
    pub location: Option<String>,
    pub places: Option<u32>,
    pub outlets: Option<u32>,
    pub computers: Option<u32>,
    pub projector: bool,
    pub audio: bool,
    pub schedule_id: Option<String>,
}

impl ClassroomRecord {
    pub fn location_alias(&self, kind: LocationKind) -> Option<&str> {
        match kind {
            LocationKind::SubBuilding => self.sub_building.as_deref(),
            LocationKind::Building => self.building.as_deref(),
            LocationKind::Location => self.location.as_deref(),
        }
    }
}

/// Countable equipment, filtered by minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Places,
    Outlets,
    Computers,
}

impl Capacity {
    pub const ALL: [Self; 3] = [Self::Places, Self::Outlets, Self::Computers];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Places => "places",
            Self::Outlets => "outlets",
            Self::Computers => "computers",
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equipment a classroom either has or lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Projector,
    Audio,
}

impl Equipment {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Projector => "projector",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classroom of the catalog.
///
/// Static attributes never change once built. The schedule can be replaced
/// at any time with [`Classroom::set_schedule`]; readers hold on to the
/// [`Arc`] they got, so a query never observes a partially loaded schedule.
#[derive(Debug)]
pub struct Classroom {
    name: String,
    description: Option<String>,
    floor: Option<i32>,
    sub_building: Option<String>,
    building: Option<String>,
    location: Option<String>,
    places: Option<u32>,
    outlets: Option<u32>,
    computers: Option<u32>,
    projector: bool,
    audio: bool,
    schedule_id: Option<String>,
    schedule: RwLock<Arc<Schedule>>,
}

impl Classroom {
    /// Builds a classroom whose location aliases are already resolved.
    ///
    /// Aliases that do not name a location must be cleared by the caller.
    pub(crate) fn from_resolved(record: ClassroomRecord) -> Self {
        Self {
            name: record.name,
            description: record.description,
            floor: record.floor,
            sub_building: record.sub_building,
            building: record.building,
            location: record.location,
            places: record.places,
            outlets: record.outlets,
            computers: record.computers,
            projector: record.projector,
            audio: record.audio,
            schedule_id: record.schedule_id,
            schedule: RwLock::new(Arc::new(Schedule::empty())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub const fn floor(&self) -> Option<i32> {
        self.floor
    }

    /// Alias of the location of `kind`, only set when it resolves.
    pub fn location_alias(&self, kind: LocationKind) -> Option<&str> {
        match kind {
            LocationKind::SubBuilding => self.sub_building.as_deref(),
            LocationKind::Building => self.building.as_deref(),
            LocationKind::Location => self.location.as_deref(),
        }
    }

    pub const fn capacity(&self, capacity: Capacity) -> Option<u32> {
        match capacity {
            Capacity::Places => self.places,
            Capacity::Outlets => self.outlets,
            Capacity::Computers => self.computers,
        }
    }

    pub const fn has(&self, equipment: Equipment) -> bool {
        match equipment {
            Equipment::Projector => self.projector,
            Equipment::Audio => self.audio,
        }
    }

    pub fn schedule_id(&self) -> Option<&str> {
        self.schedule_id.as_deref()
    }

    /// Snapshot of the current schedule.
    pub fn schedule(&self) -> Arc<Schedule> {
        Arc::clone(&self.schedule.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the whole schedule.
    pub fn set_schedule(&self, schedule: impl Into<Arc<Schedule>>) {
        let schedule = schedule.into();
        *self.schedule.write().unwrap_or_else(PoisonError::into_inner) = schedule;
    }

    pub fn is_available<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        self.schedule().is_available(at)
    }

    pub fn current_interval<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Option<Interval> {
        self.schedule().current_interval(at).cloned()
    }

    pub fn next_interval<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Option<Interval> {
        self.schedule().next_interval(at).cloned()
    }

    pub fn available_duration<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> TimeDelta {
        self.schedule().available_duration(at)
    }

    pub fn unavailable_duration<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> TimeDelta {
        self.schedule().unavailable_duration(at)
    }
}
