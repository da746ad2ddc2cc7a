//! Classroom filtering.
//!
//! A [`ClassroomFilter`] holds one optional value per dimension. Each set
//! value becomes a [`Criterion`]; the result keeps the classrooms matching
//! every criterion, in catalog order. Criteria are pure predicates so the
//! order they run in never changes the result.

use chrono::{DateTime, TimeDelta, Utc};

use crate::classroom::{Capacity, Classroom, Equipment};
use crate::location::{LocationKind, Locations};

/// Query options, each unset value disabling its dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassroomFilter {
    /// Exact classroom name.
    pub name: Option<String>,
    /// Required availability at the query instant.
    pub available: Option<bool>,
    /// Minimum time left before the next course. Implies availability.
    pub duration: Option<TimeDelta>,
    /// Exact floor.
    pub floor: Option<i32>,
    /// Sub-building name or alias.
    pub sub_building: Option<String>,
    /// Building name or alias.
    pub building: Option<String>,
    /// Campus name or alias.
    pub location: Option<String>,
    /// Minimum number of places.
    pub places: Option<u32>,
    /// Minimum number of outlets.
    pub outlets: Option<u32>,
    /// Minimum number of computers.
    pub computers: Option<u32>,
    /// Required projector presence.
    pub projector: Option<bool>,
    /// Required audio system presence.
    pub audio: Option<bool>,
}

impl ClassroomFilter {
    pub fn location(&self, kind: LocationKind) -> Option<&str> {
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

    pub const fn equipment(&self, equipment: Equipment) -> Option<bool> {
        match equipment {
            Equipment::Projector => self.projector,
            Equipment::Audio => self.audio,
        }
    }

    /// The set values as criteria, in canonical order.
    pub fn criteria(&self) -> Vec<Criterion<'_>> {
        let mut criteria = Vec::new();

        if let Some(name) = &self.name {
            criteria.push(Criterion::Name(name));
        }
        if let Some(available) = self.available {
            criteria.push(Criterion::Available(available));
        }
        if let Some(duration) = self.duration {
            criteria.push(Criterion::MinDuration(duration));
        }
        if let Some(floor) = self.floor {
            criteria.push(Criterion::Floor(floor));
        }
        for kind in LocationKind::ALL {
            if let Some(value) = self.location(kind) {
                criteria.push(Criterion::Location(kind, value));
            }
        }
        for capacity in Capacity::ALL {
            if let Some(min) = self.capacity(capacity) {
                criteria.push(Criterion::MinCapacity(capacity, min));
            }
        }
        for equipment in [Equipment::Projector, Equipment::Audio] {
            if let Some(expected) = self.equipment(equipment) {
                criteria.push(Criterion::Equipment(equipment, expected));
            }
        }

        criteria
    }

    /// Whether no dimension is filtered.
    pub fn is_empty(&self) -> bool {
        self.criteria().is_empty()
    }

    /// Keeps the classrooms matching every set value, preserving order.
    pub fn apply<'c, I>(
        &self,
        classrooms: I,
        locations: &Locations,
        at: DateTime<Utc>,
    ) -> Vec<&'c Classroom>
    where
        I: IntoIterator<Item = &'c Classroom>,
    {
        let mut results: Vec<&Classroom> = classrooms.into_iter().collect();
        for criterion in self.criteria() {
            results.retain(|classroom| criterion.matches(classroom, locations, at));
            tracing::trace!(?criterion, remaining = results.len(), "applied criterion");
        }
        results
    }
}

/// A single narrowing predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion<'a> {
    Name(&'a str),
    Available(bool),
    MinDuration(TimeDelta),
    Floor(i32),
    Location(LocationKind, &'a str),
    MinCapacity(Capacity, u32),
    Equipment(Equipment, bool),
}

impl Criterion<'_> {
    /// Whether `classroom` passes at `at`.
    ///
    /// Location values match a registered location by name or alias;
    /// undefined attributes never match.
    pub fn matches(
        &self,
        classroom: &Classroom,
        locations: &Locations,
        at: DateTime<Utc>,
    ) -> bool {
        match *self {
            Self::Name(name) => classroom.name() == name,
            Self::Available(expected) => classroom.is_available(&at) == expected,
            Self::MinDuration(min) => {
                let schedule = classroom.schedule();
                schedule.is_available(&at) && schedule.available_duration(&at) >= min
            }
            Self::Floor(floor) => classroom.floor() == Some(floor),
            Self::Location(kind, value) => classroom
                .location_alias(kind)
                .and_then(|alias| locations.registry(kind).get(alias))
                .is_some_and(|location| location.matches(value)),
            Self::MinCapacity(capacity, min) => {
                classroom.capacity(capacity).is_some_and(|count| count >= min)
            }
            Self::Equipment(equipment, expected) => classroom.has(equipment) == expected,
        }
    }
}
