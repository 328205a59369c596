use crate::error::HcaError;
use chrono::{Datelike, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Month labels for the fixed season axis, August through July.
pub const SEASON_MONTH_LABELS: [&str; 12] = [
    "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul",
];

/// A heating season spans the calendar year boundary, roughly mid-autumn
/// through mid-spring, and is labelled by its two-digit start and end years:
/// `24/25` covers October 2024 through the spring of 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeasonLabel {
    start_year: i32,
}

impl SeasonLabel {
    pub fn new(start_year: i32) -> SeasonLabel {
        SeasonLabel { start_year }
    }

    /// The season a calendar date belongs to. Kept as an explicit branch
    /// table over month ranges so the edge months stay auditable:
    /// October-December open a new season, January-April close the one
    /// opened the previous autumn, and the May-September shoulder falls
    /// back to the most recently closed season.
    pub fn of_date(date: NaiveDate) -> SeasonLabel {
        let year = date.year();
        let start_year = match date.month() {
            10..=12 => year,
            1..=4 => year - 1,
            _ => year - 1,
        };
        SeasonLabel { start_year }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    /// The window temperature archives are queried for: October 1 through
    /// April 30 of the following year.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let start = NaiveDate::from_ymd_opt(self.start_year, 10, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(self.start_year + 1, 4, 30).unwrap();
        (start, end)
    }
}

/// Index of a date's month on the fixed season axis: August = 0 .. July = 11.
pub fn season_month_index(date: NaiveDate) -> usize {
    ((date.month0() + 5) % 12) as usize
}

impl fmt::Display for SeasonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}",
            self.start_year.rem_euclid(100),
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl FromStr for SeasonLabel {
    type Err = HcaError;

    /// Accepts `24/25` and `2024/2025`; the second year must follow the
    /// first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || HcaError::SeasonParse(s.to_string());
        let (first, second) = s.trim().split_once('/').ok_or_else(malformed)?;
        let first: i32 = first.trim().parse().map_err(|_| malformed())?;
        let second: i32 = second.trim().parse().map_err(|_| malformed())?;
        let start_year = if first < 100 { 2000 + first } else { first };
        let matches_next = if second < 100 {
            (start_year + 1).rem_euclid(100) == second
        } else {
            start_year + 1 == second
        };
        if !matches_next {
            return Err(malformed());
        }
        Ok(SeasonLabel { start_year })
    }
}

impl Serialize for SeasonLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeasonLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
