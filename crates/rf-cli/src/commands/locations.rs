//! Locations command: lists the registered places.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use rf_core::{Location, LocationKind, Locations};

const fn heading(kind: LocationKind) -> &'static str {
    match kind {
        LocationKind::SubBuilding => "Sub-buildings",
        LocationKind::Building => "Buildings",
        LocationKind::Location => "Locations",
    }
}

pub fn run<W: Write>(writer: &mut W, locations: &Locations, json: bool) -> Result<()> {
    if json {
        let output: BTreeMap<&str, Vec<&Location>> = LocationKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str(), locations.registry(kind).locations().collect()))
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    for kind in LocationKind::ALL {
        writeln!(writer, "{}:", heading(kind))?;
        let mut any = false;
        for location in locations.registry(kind).locations() {
            writeln!(writer, "- {}: {location}", location.alias)?;
            any = true;
        }
        if !any {
            writeln!(writer, "- none")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn locations() -> Locations {
        let mut locations = Locations::default();
        locations.buildings = [
            Location {
                alias: "B".into(),
                name: "Bâtiment B".into(),
                indication: Some("Near the library".into()),
            },
            Location {
                alias: "A".into(),
                name: "Bâtiment A".into(),
                indication: None,
            },
        ]
        .into_iter()
        .collect();
        locations
            .locations
            .insert(LocationKind::Location, "NORD", Some(Location {
                alias: "NORD".into(),
                name: "Campus Nord".into(),
                indication: None,
            }))
            .unwrap();
        locations
            .locations
            .insert(LocationKind::Location, "NONE", None)
            .unwrap();
        locations
    }

    #[test]
    fn locations_text_output() {
        let mut output = Vec::new();
        run(&mut output, &locations(), false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Sub-buildings:
        - none
        Buildings:
        - A: Bâtiment A
        - B: Bâtiment B (Near the library)
        Locations:
        - NORD: Campus Nord
        ");
    }

    #[test]
    fn locations_json_output() {
        let mut output = Vec::new();
        run(&mut output, &locations(), true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["building"][0]["alias"], "A");
        assert!(value["building"][0].get("indication").is_none());
        assert_eq!(value["building"][1]["indication"], "Near the library");
        assert_eq!(value["sub_building"].as_array().unwrap().len(), 0);
        assert_eq!(value["location"].as_array().unwrap().len(), 1);
    }
}
