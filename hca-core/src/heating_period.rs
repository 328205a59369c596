use crate::error::HcaError;
use crate::reading::parse_date;
use crate::season::SeasonLabel;
use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// An explicit interval during which the heating plant was on. An absent
/// `end` marks a period still running; its effective end is the evaluation
/// date supplied by the caller, so the answer for recent dates tracks the
/// clock without any ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatingPeriod {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl HeatingPeriod {
    /// A closed or open period. Rejects `start` after `end`.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<HeatingPeriod, HcaError> {
        if let Some(end) = end {
            if start > end {
                return Err(HcaError::InvalidPeriod { start, end });
            }
        }
        Ok(HeatingPeriod { start, end })
    }

    /// A period switched on and not yet off.
    pub fn open(start: NaiveDate) -> HeatingPeriod {
        HeatingPeriod { start, end: None }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// The end used in membership tests: the declared end, or `today` for
    /// an open period.
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        self.end.unwrap_or(today)
    }

    /// Inclusive on both endpoints.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.start <= date && date <= self.effective_end(today)
    }

    /// Inclusive day count.
    pub fn days(&self, today: NaiveDate) -> i64 {
        (self.effective_end(today) - self.start).num_days() + 1
    }

    /// The season a period belongs to, keyed off its start date.
    pub fn season(&self) -> SeasonLabel {
        SeasonLabel::of_date(self.start)
    }
}

/// The registry of declared heating intervals. Periods are independent of
/// readings and of each other: overlaps are kept as entered, never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeatingPeriodSet {
    periods: Vec<HeatingPeriod>,
}

impl HeatingPeriodSet {
    pub fn new() -> HeatingPeriodSet {
        HeatingPeriodSet::default()
    }

    pub fn add(&mut self, period: HeatingPeriod) {
        self.periods.push(period);
    }

    /// Removes the period at `index` in insertion order.
    pub fn remove(&mut self, index: usize) -> Option<HeatingPeriod> {
        (index < self.periods.len()).then(|| self.periods.remove(index))
    }

    pub fn periods(&self) -> &[HeatingPeriod] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// True when `date` falls inside any period (union semantics).
    pub fn is_heating_day(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.periods.iter().any(|p| p.contains(date, today))
    }

    /// The period covering `date`. When several overlap, the earliest start
    /// wins; periods sharing a start fall back to insertion order.
    pub fn period_containing(&self, date: NaiveDate, today: NaiveDate) -> Option<&HeatingPeriod> {
        let mut found: Option<&HeatingPeriod> = None;
        for period in &self.periods {
            if !period.contains(date, today) {
                continue;
            }
            match found {
                Some(best) if best.start() <= period.start() => {}
                _ => found = Some(period),
            }
        }
        found
    }

    /// Distinct days the heating was on during one season. Overlapping
    /// periods count each day once.
    pub fn heating_days_in_season(&self, season: SeasonLabel, today: NaiveDate) -> i64 {
        let season_periods: Vec<&HeatingPeriod> = self
            .periods
            .iter()
            .filter(|p| p.season() == season)
            .collect();
        let Some(first) = season_periods.iter().map(|p| p.start()).min() else {
            return 0;
        };
        let last = season_periods
            .iter()
            .map(|p| p.effective_end(today))
            .max()
            .unwrap_or(first);
        first
            .iter_days()
            .take_while(|day| *day <= last)
            .filter(|day| season_periods.iter().any(|p| p.contains(*day, today)))
            .count() as i64
    }

    /// Month flags for one season's periods on a 13-slot axis running from
    /// August of the start year through August of the following year.
    pub fn month_occupancy(&self, season: SeasonLabel, today: NaiveDate) -> [bool; 13] {
        let mut flags = [false; 13];
        for period in self.periods.iter().filter(|p| p.season() == season) {
            let end = period.effective_end(today);
            for day in period.start().iter_days().take_while(|d| *d <= end) {
                let months_since_august = (day.year() - season.start_year()) * 12
                    + day.month0() as i32
                    - 7;
                if (0..13).contains(&months_since_august) {
                    flags[months_since_august as usize] = true;
                }
            }
        }
        flags
    }

    /// Parse a `start,end` CSV body; an empty end cell marks an open
    /// period. Invalid intervals reject the row.
    pub fn from_csv(data: &str) -> Result<HeatingPeriodSet, HcaError> {
        let mut set = HeatingPeriodSet::new();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());
        for record in reader.records() {
            let record = record?;
            let start = parse_date(record.get(0).unwrap_or_default())?;
            let end = record
                .get(1)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_date)
                .transpose()?;
            set.add(HeatingPeriod::new(start, end)?);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::{HeatingPeriod, HeatingPeriodSet};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn closed(start: NaiveDate, end: NaiveDate) -> HeatingPeriod {
        HeatingPeriod::new(start, Some(end)).unwrap()
    }

    #[test]
    fn test_construction_rejects_inverted_interval() {
        let result = HeatingPeriod::new(date(2024, 11, 25), Some(date(2024, 11, 5)));
        assert!(result.is_err());
    }

    #[test]
    fn test_membership_is_inclusive_on_both_endpoints() {
        let today = date(2025, 6, 30);
        let mut set = HeatingPeriodSet::new();
        set.add(closed(date(2024, 11, 5), date(2024, 11, 25)));

        assert!(set.is_heating_day(date(2024, 11, 5), today));
        assert!(set.is_heating_day(date(2024, 11, 25), today));
        assert!(!set.is_heating_day(date(2024, 11, 4), today));
        assert!(!set.is_heating_day(date(2024, 11, 26), today));
    }

    #[test]
    fn test_open_period_ends_at_evaluation_time() {
        let today = date(2024, 12, 10);
        let mut set = HeatingPeriodSet::new();
        set.add(HeatingPeriod::open(date(2024, 11, 1)));

        assert!(set.is_heating_day(today, today));
        assert!(!set.is_heating_day(date(2024, 12, 11), today));
        // moving the clock forward moves the effective end with it
        assert!(set.is_heating_day(date(2024, 12, 11), date(2024, 12, 11)));
    }

    #[test]
    fn test_period_containing_prefers_earliest_start() {
        let today = date(2025, 6, 30);
        let mut set = HeatingPeriodSet::new();
        set.add(closed(date(2024, 11, 10), date(2024, 12, 20)));
        set.add(closed(date(2024, 11, 1), date(2024, 11, 30)));

        let hit = set.period_containing(date(2024, 11, 15), today).unwrap();
        assert_eq!(hit.start(), date(2024, 11, 1));
        // membership stays union-based
        assert!(set.is_heating_day(date(2024, 12, 15), today));
    }

    #[test]
    fn test_heating_days_count_overlaps_once() {
        let today = date(2025, 6, 30);
        let mut set = HeatingPeriodSet::new();
        set.add(closed(date(2024, 11, 1), date(2024, 11, 10)));
        set.add(closed(date(2024, 11, 5), date(2024, 11, 14)));

        let season = "24/25".parse().unwrap();
        assert_eq!(set.heating_days_in_season(season, today), 14);
        assert_eq!(set.heating_days_in_season("23/24".parse().unwrap(), today), 0);
    }

    #[test]
    fn test_month_occupancy_flags() {
        let today = date(2025, 6, 30);
        let mut set = HeatingPeriodSet::new();
        set.add(closed(date(2024, 12, 20), date(2025, 1, 10)));

        let flags = set.month_occupancy("24/25".parse().unwrap(), today);
        assert!(flags[4]); // December
        assert!(flags[5]); // January
        assert!(!flags[3]); // November untouched
    }

    #[test]
    fn test_from_csv_with_open_period() {
        let csv = "start,end\n2024-11-05,2024-11-25\n2025-10-15,\n";
        let set = HeatingPeriodSet::from_csv(csv).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.periods()[1].is_open());
    }

    #[test]
    fn test_inclusive_day_count() {
        let today = date(2025, 6, 30);
        let period = closed(date(2024, 11, 5), date(2024, 11, 25));
        assert_eq!(period.days(today), 21);
    }
}
