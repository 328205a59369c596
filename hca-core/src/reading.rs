use crate::error::HcaError;
use crate::season::SeasonLabel;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Date format used for CSV exports: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Alternate date format accepted on import: "DD/MM/YYYY"
pub const DATE_FORMAT_ALT: &str = "%d/%m/%Y";

/// Column layout of a readings CSV.
pub const CSV_HEADER: &str = "date,kitchen,living_room,bedroom,kids_room,bathroom,season";

/// The fixed set of rooms an allocator reading covers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Room {
    Kitchen,
    LivingRoom,
    Bedroom,
    KidsRoom,
    Bathroom,
}

impl Room {
    pub const ALL: [Room; 5] = [
        Room::Kitchen,
        Room::LivingRoom,
        Room::Bedroom,
        Room::KidsRoom,
        Room::Bathroom,
    ];

    /// CSV column name for this room.
    pub fn column_name(&self) -> &'static str {
        match self {
            Room::Kitchen => "kitchen",
            Room::LivingRoom => "living_room",
            Room::Bedroom => "bedroom",
            Room::KidsRoom => "kids_room",
            Room::Bathroom => "bathroom",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Room::Kitchen => "Kitchen",
            Room::LivingRoom => "Living room",
            Room::Bedroom => "Bedroom",
            Room::KidsRoom => "Kids room",
            Room::Bathroom => "Bathroom",
        };
        write!(f, "{name}")
    }
}

/// A snapshot of cumulative per-room allocator values taken on one date.
/// Values only grow over time, apart from meter replacements, which the
/// delta computation clamps away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub date: NaiveDate,
    pub rooms: BTreeMap<Room, f64>,
    /// Season assigned at entry time; wins over derivation from the date.
    pub season: Option<SeasonLabel>,
    /// Outdoor temperature noted alongside the reading, if any.
    pub outdoor_temp: Option<f64>,
}

impl Reading {
    pub fn new(date: NaiveDate, rooms: BTreeMap<Room, f64>) -> Reading {
        Reading {
            date,
            rooms,
            season: None,
            outdoor_temp: None,
        }
    }

    /// Cumulative value for one room; rooms missing from the snapshot read
    /// as zero.
    pub fn value(&self, room: Room) -> f64 {
        self.rooms.get(&room).copied().unwrap_or(0.0)
    }

    /// Sum of all room values.
    pub fn total(&self) -> f64 {
        Room::ALL.iter().map(|room| self.value(*room)).sum()
    }

    /// The season this reading belongs to: the explicitly assigned label
    /// when present, otherwise derived from the date.
    pub fn effective_season(&self) -> SeasonLabel {
        self.season
            .unwrap_or_else(|| SeasonLabel::of_date(self.date))
    }
}

impl Ord for Reading {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl PartialOrd for Reading {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Reading {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for Reading {}

/// Accepts ISO "YYYY-MM-DD" and European "DD/MM/YYYY" dates.
pub fn parse_date(s: &str) -> Result<NaiveDate, HcaError> {
    let s = s.trim();
    let parsed = if s.contains('/') {
        NaiveDate::parse_from_str(s, DATE_FORMAT_ALT)
    } else {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
    };
    parsed.map_err(|_| HcaError::DateParse(s.to_string()))
}

impl TryFrom<StringRecord> for Reading {
    type Error = HcaError;

    /// Parses one row of a readings CSV. Room cells that fail to parse read
    /// as zero; an unparseable date rejects the row.
    fn try_from(record: StringRecord) -> Result<Self, Self::Error> {
        let date = parse_date(record.get(0).unwrap_or_default())?;
        let mut rooms = BTreeMap::new();
        for (i, room) in Room::ALL.iter().enumerate() {
            let value = record
                .get(i + 1)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(0.0);
            rooms.insert(*room, value);
        }
        let season = record
            .get(6)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .transpose()?;
        Ok(Reading {
            date,
            rooms,
            season,
            outdoor_temp: None,
        })
    }
}

/// Parse a readings CSV body into Readings.
pub fn readings_from_csv(data: &str) -> Result<Vec<Reading>, HcaError> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes())
        .records()
        .map(|record| Reading::try_from(record?))
        .collect()
}

/// Render readings back to the CSV column layout. The season column carries
/// the effective season so labels stay fixed across re-imports.
pub fn readings_to_csv(readings: &[Reading]) -> String {
    let mut lines = Vec::with_capacity(readings.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for reading in readings {
        let rooms = Room::ALL
            .iter()
            .map(|room| format!("{:.1}", reading.value(*room)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(format!(
            "{},{},{}",
            reading.date.format(DATE_FORMAT),
            rooms,
            reading.effective_season()
        ));
    }
    lines.join("\n")
}
