//! CSV reference tables.
//!
//! The data folder holds one table per [`LocationKind`] with the columns
//! `alias,name,indication`, plus the classroom table. Empty cells are
//! undefined values, never zero.

use std::io;
use std::path::{Path, PathBuf};

use rf_core::{Catalog, ClassroomRecord, Location, LocationKind, LocationRegistry, Locations};
use serde::Deserialize;

use crate::DataError;

/// File name of the classroom table.
pub const CLASSROOMS_FILE: &str = "classrooms.csv";

/// File name of the table registering locations of `kind`.
pub const fn location_file(kind: LocationKind) -> &'static str {
    match kind {
        LocationKind::SubBuilding => "sub_buildings.csv",
        LocationKind::Building => "buildings.csv",
        LocationKind::Location => "locations.csv",
    }
}

#[derive(Debug, Deserialize)]
struct LocationRow {
    alias: Option<String>,
    name: Option<String>,
    indication: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClassroomRow {
    name: String,
    description: Option<String>,
    floor: Option<i32>,
    sub_building: Option<String>,
    building: Option<String>,
    location: Option<String>,
    places: Option<u32>,
    outlets: Option<u32>,
    computers: Option<u32>,
    projector: Option<String>,
    audio: Option<String>,
    schedule_id: Option<String>,
}

impl ClassroomRow {
    fn into_record(self) -> Result<ClassroomRecord, DataError> {
        let projector = parse_flag(&self.name, "projector", self.projector.as_deref())?;
        let audio = parse_flag(&self.name, "audio", self.audio.as_deref())?;
        Ok(ClassroomRecord {
            name: self.name,
            description: self.description,
            floor: self.floor,
            sub_building: self.sub_building,
            building: self.building,
            location: self.location,
            places: self.places,
            outlets: self.outlets,
            computers: self.computers,
            projector,
            audio,
            schedule_id: self.schedule_id,
        })
    }
}

fn parse_flag(classroom: &str, column: &'static str, value: Option<&str>) -> Result<bool, DataError> {
    match value.map(str::trim) {
        Some("Yes") => Ok(true),
        None | Some("" | "No") => Ok(false),
        Some(other) => Err(DataError::InvalidFlag {
            classroom: classroom.to_string(),
            column,
            value: other.to_string(),
        }),
    }
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> DataError + '_ {
    move |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads a location table.
///
/// Rows without alias are ignored; rows without name register the alias
/// as having no location.
pub fn read_locations<R: io::Read>(
    reader: R,
    kind: LocationKind,
    path: &Path,
) -> Result<LocationRegistry, DataError> {
    let mut registry = LocationRegistry::new();
    for row in csv::Reader::from_reader(reader).deserialize() {
        let row: LocationRow = row.map_err(csv_error(path))?;
        let Some(alias) = row.alias else {
            continue;
        };
        let location = row.name.map(|name| Location {
            alias: alias.clone(),
            name,
            indication: row.indication,
        });
        registry.insert(kind, alias, location)?;
    }
    Ok(registry)
}

/// Reads the classroom table.
pub fn read_classrooms<R: io::Read>(
    reader: R,
    path: &Path,
) -> Result<Vec<ClassroomRecord>, DataError> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .map(|row| {
            let row: ClassroomRow = row.map_err(csv_error(path))?;
            row.into_record()
        })
        .collect()
}

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Csv {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Loads the location table of `kind` from the data folder.
pub fn load_locations(folder: &Path, kind: LocationKind) -> Result<LocationRegistry, DataError> {
    let path = folder.join(location_file(kind));
    let registry = read_locations(open(&path)?, kind, &path)?;
    tracing::debug!(%kind, entries = registry.len(), "loaded locations");
    Ok(registry)
}

/// Loads the classroom table from the data folder.
pub fn load_classrooms(folder: &Path) -> Result<Vec<ClassroomRecord>, DataError> {
    let path: PathBuf = folder.join(CLASSROOMS_FILE);
    read_classrooms(open(&path)?, &path)
}

/// Loads every reference table and builds the catalog.
pub fn load_catalog(folder: &Path) -> Result<Catalog, DataError> {
    let mut locations = Locations::default();
    for kind in LocationKind::ALL {
        *locations.registry_mut(kind) = load_locations(folder, kind)?;
    }
    let records = load_classrooms(folder)?;
    Ok(Catalog::build(locations, records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSROOMS: &str = "\
name,description,floor,sub_building,building,location,places,outlets,computers,projector,audio,schedule_id
A101,Lecture hall,1,,A,NORD,120,10,,Yes,Yes,1001
B204,,2,B2,B,NORD,30,,24,No,,1002
Lab,,,,,,,,,No,No,
";

    fn write_tables(dir: &Path) {
        std::fs::write(
            dir.join("locations.csv"),
            "alias,name,indication\nNORD,Campus Nord,Tram stop Université\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("buildings.csv"),
            "alias,name,indication\nA,Bâtiment A,\nB,,\n,Orphan,\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("sub_buildings.csv"),
            "alias,name,indication\nB2,Aile B2,First floor stairs\n",
        )
        .unwrap();
        std::fs::write(dir.join(CLASSROOMS_FILE), CLASSROOMS).unwrap();
    }

    #[test]
    fn read_classrooms_keeps_undefined_values() {
        let records = read_classrooms(CLASSROOMS.as_bytes(), Path::new("mem")).unwrap();
        assert_eq!(records.len(), 3);

        let a101 = &records[0];
        assert_eq!(a101.description.as_deref(), Some("Lecture hall"));
        assert_eq!(a101.places, Some(120));
        assert_eq!(a101.computers, None);
        assert!(a101.projector && a101.audio);
        assert_eq!(a101.sub_building, None);

        let b204 = &records[1];
        assert_eq!(b204.description, None);
        assert_eq!(b204.outlets, None);
        assert!(!b204.audio);

        let lab = &records[2];
        assert_eq!(lab.floor, None);
        assert_eq!(lab.schedule_id, None);
    }

    #[test]
    fn read_classrooms_rejects_bad_flag() {
        let table = "name,description,floor,sub_building,building,location,places,outlets,computers,projector,audio,schedule_id\nA,,1,,,,,,,maybe,No,1\n";
        let err = read_classrooms(table.as_bytes(), Path::new("mem")).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidFlag { column: "projector", .. }
        ));
    }

    #[test]
    fn read_classrooms_rejects_non_numeric_floor() {
        let table = "name,description,floor,sub_building,building,location,places,outlets,computers,projector,audio,schedule_id\nA,,first,,,,,,,No,No,1\n";
        let err = read_classrooms(table.as_bytes(), Path::new("mem")).unwrap_err();
        assert!(matches!(err, DataError::Csv { .. }));
    }

    #[test]
    fn read_locations_handles_missing_names() {
        let table = "alias,name,indication\nA,Bâtiment A,\nB,,\n,Orphan,\n";
        let registry =
            read_locations(table.as_bytes(), LocationKind::Building, Path::new("mem")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("A").unwrap().indication, None);
        assert!(registry.contains("B"));
        assert!(registry.get("B").is_none());
    }

    #[test]
    fn load_catalog_from_folder() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());

        let catalog = load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.classrooms().len(), 3);

        let b204 = &catalog.classrooms()[1];
        let sub_building = catalog
            .location_of(b204, LocationKind::SubBuilding)
            .unwrap();
        assert_eq!(sub_building.to_string(), "Aile B2 (First floor stairs)");
        assert!(catalog.location_of(b204, LocationKind::Building).is_none());
        assert_eq!(catalog.schedule_ids(), ["1001", "1002"]);
    }

    #[test]
    fn load_catalog_fails_on_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(dir.path()).unwrap_err();
        assert!(err.to_string().contains("sub_buildings.csv"));
    }
}
