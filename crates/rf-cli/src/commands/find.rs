//! Find command: classrooms matching a query, with their availability.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use clap::{ArgAction, Args};
use rf_core::{
    Capacity, Catalog, Classroom, ClassroomFilter, Equipment, Interval, Location, LocationKind,
    Locations,
};
use serde::Serialize;

use super::util::{format_duration, format_interval, localize, parse_datetime, parse_duration};
use crate::loader::LoadArgs;

const RULER: &str = "========================================";

#[derive(Debug, Clone, Default, Args)]
pub struct FindArgs {
    /// Show all classrooms.
    #[arg(long, conflicts_with_all = ["available", "unavailable"])]
    pub all: bool,

    /// Show available classrooms only (default).
    #[arg(short, long, conflicts_with = "unavailable")]
    pub available: bool,

    /// Show unavailable classrooms only.
    #[arg(short, long)]
    pub unavailable: bool,

    /// Check availability at this date instead of now (e.g. "10/03/2025 14h30").
    #[arg(short, long, value_parser = parse_datetime)]
    pub date: Option<NaiveDateTime>,

    /// Minimum availability duration (e.g. "2h", "1d4h30m").
    #[arg(short = 't', long, value_parser = parse_duration)]
    pub duration: Option<TimeDelta>,

    /// Classroom name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Floor.
    #[arg(short, long, allow_negative_numbers = true)]
    pub floor: Option<i32>,

    /// Sub-building name or alias.
    #[arg(short, long)]
    pub sub_building: Option<String>,

    /// Building name or alias.
    #[arg(short, long)]
    pub building: Option<String>,

    /// Location name or alias.
    #[arg(short, long)]
    pub location: Option<String>,

    /// Minimum number of places.
    #[arg(short, long)]
    pub places: Option<u32>,

    /// Minimum number of outlets.
    #[arg(short, long)]
    pub outlets: Option<u32>,

    /// Minimum number of computers.
    #[arg(short, long)]
    pub computers: Option<u32>,

    /// Only classrooms with a projector.
    #[arg(long, overrides_with = "no_projector")]
    pub projector: bool,

    /// Only classrooms without a projector.
    #[arg(long, overrides_with = "projector")]
    pub no_projector: bool,

    /// Only classrooms with an audio system.
    #[arg(long, overrides_with = "no_audio")]
    pub audio: bool,

    /// Only classrooms without an audio system.
    #[arg(long, overrides_with = "audio")]
    pub no_audio: bool,

    /// More detailed output (repeat for full details).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub load: LoadArgs,
}

const fn flag_pair(with: bool, without: bool) -> Option<bool> {
    if with {
        Some(true)
    } else if without {
        Some(false)
    } else {
        None
    }
}

impl FindArgs {
    pub fn filter(&self) -> ClassroomFilter {
        let available = if self.all {
            None
        } else {
            Some(!self.unavailable)
        };

        ClassroomFilter {
            name: self.name.clone(),
            available,
            duration: self.duration,
            floor: self.floor,
            sub_building: self.sub_building.clone(),
            building: self.building.clone(),
            location: self.location.clone(),
            places: self.places,
            outlets: self.outlets,
            computers: self.computers,
            projector: flag_pair(self.projector, self.no_projector),
            audio: flag_pair(self.audio, self.no_audio),
        }
    }

    /// The query instant: `--date` in `zone`, or now.
    pub fn instant(&self, zone: Tz) -> Result<DateTime<Tz>> {
        match self.date {
            Some(naive) => localize(naive, &zone),
            None => Ok(Utc::now().with_timezone(&zone)),
        }
    }
}

/// One-line description of what was asked, e.g.
/// `Available classrooms for at least 2 hours on the floor 3 :`.
pub fn describe_request(filter: &ClassroomFilter, locations: &Locations) -> String {
    let mut parts = vec![
        match filter.available {
            Some(true) => "Available classrooms",
            Some(false) => "Unavailable classrooms",
            None => "All classrooms",
        }
        .to_string(),
    ];

    if let Some(duration) = filter.duration {
        parts.push(format!("for at least {}", format_duration(duration)));
    }
    if let Some(name) = &filter.name {
        parts.push(format!("named '{name}'"));
    }
    if let Some(floor) = filter.floor {
        parts.push(format!("on the floor {floor}"));
    }
    for kind in LocationKind::ALL {
        let Some(value) = filter.location(kind) else {
            continue;
        };
        let place = locations.registry(kind).describe(value);
        parts.push(match kind {
            LocationKind::SubBuilding => format!("in the sub-building '{place}'"),
            LocationKind::Building => format!("in the building '{place}'"),
            LocationKind::Location => format!("at the location '{place}'"),
        });
    }
    for (count, what) in [
        (filter.places, "places"),
        (filter.outlets, "outlets"),
        (filter.computers, "computers"),
    ] {
        if let Some(count) = count {
            parts.push(format!("with a minimum of {count} {what}"));
        }
    }
    if let Some(projector) = filter.projector {
        parts.push(if projector { "with a projector" } else { "without a projector" }.to_string());
    }
    if let Some(audio) = filter.audio {
        parts.push(
            if audio { "with an audio system" } else { "without an audio system" }.to_string(),
        );
    }

    format!("{} :", parts.join(" "))
}

/// How long the current status lasts, `None` when available indefinitely.
fn status_duration(classroom: &Classroom, at: &DateTime<Tz>) -> Option<TimeDelta> {
    if classroom.is_available(at) {
        classroom
            .next_interval(at)
            .map(|_| classroom.available_duration(at))
    } else {
        Some(classroom.unavailable_duration(at))
    }
}

fn describe_status(classroom: &Classroom, at: &DateTime<Tz>) -> String {
    let status = if classroom.is_available(at) {
        "Available"
    } else {
        "Unavailable"
    };
    match status_duration(classroom, at) {
        Some(duration) => format!("{status} for {}", format_duration(duration)),
        None => format!("{status} indefinitely"),
    }
}

fn regular_line(catalog: &Catalog, classroom: &Classroom, at: &DateTime<Tz>) -> String {
    let mut parts = vec![classroom.name().to_string()];
    for kind in [LocationKind::Building, LocationKind::Location] {
        if let Some(location) = catalog.location_of(classroom, kind) {
            parts.push(location.to_string());
        }
    }
    parts.push(describe_status(classroom, at));
    parts.join(" | ")
}

fn write_full<W: Write>(
    writer: &mut W,
    catalog: &Catalog,
    classroom: &Classroom,
    at: &DateTime<Tz>,
) -> Result<()> {
    let zone = at.timezone();

    writeln!(writer, "{RULER}")?;
    writeln!(writer, "Name: {}", classroom.name())?;
    if let Some(description) = classroom.description() {
        writeln!(writer, "Description: {description}")?;
    }
    if let Some(floor) = classroom.floor() {
        writeln!(writer, "Floor: {floor}")?;
    }
    for (kind, label) in [
        (LocationKind::SubBuilding, "Sub-building"),
        (LocationKind::Building, "Building"),
        (LocationKind::Location, "Location"),
    ] {
        if let Some(location) = catalog.location_of(classroom, kind) {
            writeln!(writer, "{label}: {location}")?;
        }
    }
    for (count, label) in [
        (classroom.capacity(Capacity::Places), "Places"),
        (classroom.capacity(Capacity::Outlets), "Outlets"),
        (classroom.capacity(Capacity::Computers), "Computers"),
    ] {
        if let Some(count) = count {
            writeln!(writer, "{label}: {count}")?;
        }
    }
    writeln!(writer, "Projector: {}", yes_no(classroom.has(Equipment::Projector)))?;
    writeln!(writer, "Audio: {}", yes_no(classroom.has(Equipment::Audio)))?;

    let duration = status_duration(classroom, at)
        .map_or_else(|| "indefinitely".to_string(), format_duration);
    if classroom.is_available(at) {
        writeln!(writer, "Available: Yes")?;
        writeln!(writer, "Available duration: {duration}")?;
        if let Some(next) = classroom.next_interval(at) {
            writeln!(writer, "Next course: {}", format_interval(&next, &zone))?;
        }
    } else {
        writeln!(writer, "Available: No")?;
        writeln!(writer, "Unavailable duration: {duration}")?;
        if let Some(current) = classroom.current_interval(at) {
            writeln!(writer, "Current course: {}", format_interval(&current, &zone))?;
        }
    }
    writeln!(writer, "{RULER}")?;
    Ok(())
}

const fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

#[derive(Debug, Serialize)]
struct ClassroomView<'a> {
    name: &'a str,
    description: Option<&'a str>,
    floor: Option<i32>,
    sub_building: Option<&'a Location>,
    building: Option<&'a Location>,
    location: Option<&'a Location>,
    places: Option<u32>,
    outlets: Option<u32>,
    computers: Option<u32>,
    projector: bool,
    audio: bool,
    available: bool,
    /// Seconds until the status changes, null when available indefinitely.
    duration_seconds: Option<i64>,
    current_course: Option<Interval>,
    next_course: Option<Interval>,
}

impl<'a> ClassroomView<'a> {
    fn new(catalog: &'a Catalog, classroom: &'a Classroom, at: &DateTime<Tz>) -> Self {
        Self {
            name: classroom.name(),
            description: classroom.description(),
            floor: classroom.floor(),
            sub_building: catalog.location_of(classroom, LocationKind::SubBuilding),
            building: catalog.location_of(classroom, LocationKind::Building),
            location: catalog.location_of(classroom, LocationKind::Location),
            places: classroom.capacity(Capacity::Places),
            outlets: classroom.capacity(Capacity::Outlets),
            computers: classroom.capacity(Capacity::Computers),
            projector: classroom.has(Equipment::Projector),
            audio: classroom.has(Equipment::Audio),
            available: classroom.is_available(at),
            duration_seconds: status_duration(classroom, at).map(|d| d.num_seconds()),
            current_course: classroom.current_interval(at),
            next_course: classroom.next_interval(at),
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    catalog: &Catalog,
    args: &FindArgs,
    at: &DateTime<Tz>,
) -> Result<()> {
    let filter = args.filter();
    let request = describe_request(&filter, catalog.locations());
    let classrooms = catalog.get_classrooms(&filter, at);
    tracing::debug!(%at, found = classrooms.len(), "classroom query");

    if args.json {
        let views: Vec<_> = classrooms
            .iter()
            .map(|classroom| ClassroomView::new(catalog, classroom, at))
            .collect();
        let output = serde_json::json!({
            "request": request,
            "date": at.to_rfc3339(),
            "classrooms": views,
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    writeln!(writer, "{request}")?;
    if classrooms.is_empty() {
        writeln!(writer, "No classrooms found.")?;
        return Ok(());
    }

    match args.verbose {
        0 => {
            let names: Vec<_> = classrooms.iter().map(|classroom| classroom.name()).collect();
            writeln!(writer, "{}", names.join(", "))?;
        }
        1 => {
            for classroom in &classrooms {
                writeln!(writer, "{}", regular_line(catalog, classroom, at))?;
            }
        }
        _ => {
            for classroom in &classrooms {
                write_full(writer, catalog, classroom, at)?;
            }
        }
    }

    Ok(())
}
