//! Shared location descriptors (campuses, buildings, sub-buildings).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::catalog::CatalogError;

/// A place a classroom can be found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub alias: String,
    pub name: String,
    /// Free-text hint to find the place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indication: Option<String>,
}

impl Location {
    /// Whether a filter value designates this location by name or alias.
    pub fn matches(&self, value: &str) -> bool {
        self.name == value || self.alias == value
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.indication {
            Some(indication) => write!(f, "{} ({indication})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// The three levels a classroom is located by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    SubBuilding,
    Building,
    Location,
}

impl LocationKind {
    pub const ALL: [Self; 3] = [Self::SubBuilding, Self::Building, Self::Location];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubBuilding => "sub_building",
            Self::Building => "building",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alias-keyed lookup of the locations of one [`LocationKind`].
///
/// An alias may be registered without a location, in which case classrooms
/// referencing it are treated as having no location of that kind.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    entries: BTreeMap<String, Option<Location>>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `alias`, failing if it is already known.
    pub fn insert(
        &mut self,
        kind: LocationKind,
        alias: impl Into<String>,
        location: Option<Location>,
    ) -> Result<(), CatalogError> {
        let alias = alias.into();
        if self.entries.contains_key(&alias) {
            return Err(CatalogError::DuplicateAlias { kind, alias });
        }
        self.entries.insert(alias, location);
        Ok(())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// The location registered under `alias`, if it resolves to one.
    pub fn get(&self, alias: &str) -> Option<&Location> {
        self.entries.get(alias).and_then(Option::as_ref)
    }

    /// Resolved locations, ordered by alias.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.entries.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display form of a user-supplied value: the registered location when
    /// the value is a known alias, the raw text otherwise.
    pub fn describe<'a>(&'a self, value: &'a str) -> LocationLabel<'a> {
        self.get(value)
            .map_or(LocationLabel::Raw(value), LocationLabel::Known)
    }
}

impl FromIterator<Location> for LocationRegistry {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|location| (location.alias.clone(), Some(location)))
            .collect();
        Self { entries }
    }
}

/// A location as shown to a user, possibly unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationLabel<'a> {
    Known(&'a Location),
    Raw(&'a str),
}

impl fmt::Display for LocationLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(location) => location.fmt(f),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// The registries of every [`LocationKind`].
#[derive(Debug, Clone, Default)]
pub struct Locations {
    pub sub_buildings: LocationRegistry,
    pub buildings: LocationRegistry,
    pub locations: LocationRegistry,
}

impl Locations {
    pub const fn registry(&self, kind: LocationKind) -> &LocationRegistry {
        match kind {
            LocationKind::SubBuilding => &self.sub_buildings,
            LocationKind::Building => &self.buildings,
            LocationKind::Location => &self.locations,
        }
    }

    pub fn registry_mut(&mut self, kind: LocationKind) -> &mut LocationRegistry {
        match kind {
            LocationKind::SubBuilding => &mut self.sub_buildings,
            LocationKind::Building => &mut self.buildings,
            LocationKind::Location => &mut self.locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Location {
        Location {
            alias: "BU".into(),
            name: "Library".into(),
            indication: Some("next to the cafeteria".into()),
        }
    }

    #[test]
    fn matches_name_or_alias() {
        let location = library();
        assert!(location.matches("BU"));
        assert!(location.matches("Library"));
        assert!(!location.matches("library"));
    }

    #[test]
    fn display_appends_indication() {
        assert_eq!(library().to_string(), "Library (next to the cafeteria)");

        let plain = Location {
            indication: None,
            ..library()
        };
        assert_eq!(plain.to_string(), "Library");
    }

    #[test]
    fn alias_without_location_resolves_to_none() {
        let mut registry = LocationRegistry::new();
        registry
            .insert(LocationKind::Building, "X", None)
            .unwrap();

        assert!(registry.contains("X"));
        assert!(registry.get("X").is_none());
        assert_eq!(registry.locations().count(), 0);
    }

    #[test]
    fn insert_rejects_duplicate_alias() {
        let mut registry = LocationRegistry::new();
        registry
            .insert(LocationKind::Building, "BU", Some(library()))
            .unwrap();

        let err = registry
            .insert(LocationKind::Building, "BU", None)
            .unwrap_err();
        assert_eq!(err.to_string(), "duplicate building alias: BU");
    }

    #[test]
    fn describe_falls_back_to_raw_text() {
        let registry: LocationRegistry = [library()].into_iter().collect();

        assert_eq!(
            registry.describe("BU").to_string(),
            "Library (next to the cafeteria)"
        );
        assert_eq!(registry.describe("Gym").to_string(), "Gym");
    }
}
