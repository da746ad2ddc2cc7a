//! The classroom catalog and its query entry point.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::classroom::{Classroom, ClassroomRecord};
use crate::filter::ClassroomFilter;
use crate::location::{Location, LocationKind, Locations};
use crate::schedule::Schedule;

/// Errors raised while assembling the catalog from reference data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The same alias was registered twice for one kind.
    #[error("duplicate {kind} alias: {alias}")]
    DuplicateAlias { kind: LocationKind, alias: String },

    /// A classroom references an alias missing from its registry.
    #[error("classroom {classroom} references unknown {kind} alias: {alias}")]
    UnknownLocation {
        classroom: String,
        kind: LocationKind,
        alias: String,
    },
}

/// Every known classroom along with the locations they reference.
#[derive(Debug, Default)]
pub struct Catalog {
    locations: Locations,
    classrooms: Vec<Classroom>,
}

impl Catalog {
    /// Builds the catalog, resolving each classroom's location aliases once.
    ///
    /// Aliases registered without a location are dropped from the classroom.
    /// Classrooms start with an empty schedule.
    pub fn build(
        locations: Locations,
        records: Vec<ClassroomRecord>,
    ) -> Result<Self, CatalogError> {
        let classrooms = records
            .into_iter()
            .map(|record| resolve(&locations, record).map(Classroom::from_resolved))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(classrooms = classrooms.len(), "built catalog");
        Ok(Self {
            locations,
            classrooms,
        })
    }

    pub const fn locations(&self) -> &Locations {
        &self.locations
    }

    pub fn classrooms(&self) -> &[Classroom] {
        &self.classrooms
    }

    /// The location of `kind` a classroom is in.
    pub fn location_of(&self, classroom: &Classroom, kind: LocationKind) -> Option<&Location> {
        classroom
            .location_alias(kind)
            .and_then(|alias| self.locations.registry(kind).get(alias))
    }

    /// Distinct schedule identifiers, in catalog order.
    pub fn schedule_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.classrooms
            .iter()
            .filter_map(Classroom::schedule_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Installs `schedule` on every classroom using `schedule_id`.
    ///
    /// Returns how many classrooms were updated.
    pub fn install_schedule(&self, schedule_id: &str, schedule: Schedule) -> usize {
        let schedule = Arc::new(schedule);
        let mut updated = 0;
        for classroom in &self.classrooms {
            if classroom.schedule_id() == Some(schedule_id) {
                classroom.set_schedule(Arc::clone(&schedule));
                updated += 1;
            }
        }
        if updated == 0 {
            tracing::debug!(schedule_id, "no classroom uses schedule");
        }
        updated
    }

    /// Classrooms matching `filter` at `at`, in catalog order.
    pub fn get_classrooms<Tz: TimeZone>(
        &self,
        filter: &ClassroomFilter,
        at: &DateTime<Tz>,
    ) -> Vec<&Classroom> {
        filter.apply(&self.classrooms, &self.locations, at.with_timezone(&Utc))
    }
}

fn resolve(
    locations: &Locations,
    mut record: ClassroomRecord,
) -> Result<ClassroomRecord, CatalogError> {
    for kind in LocationKind::ALL {
        let Some(alias) = record.location_alias(kind) else {
            continue;
        };

        let registry = locations.registry(kind);
        if !registry.contains(alias) {
            return Err(CatalogError::UnknownLocation {
                classroom: record.name.clone(),
                kind,
                alias: alias.to_string(),
            });
        }
        if registry.get(alias).is_none() {
            match kind {
                LocationKind::SubBuilding => record.sub_building = None,
                LocationKind::Building => record.building = None,
                LocationKind::Location => record.location = None,
            }
        }
    }
    Ok(record)
}
