//! Chart-ready series built from readings and daily estimates.

use crate::interpolation::DailyEstimate;
use chrono::NaiveDate;
use hca_core::consumption::Delta;
use hca_core::reading::{Reading, Room};
use hca_core::season::season_month_index;
use hca_core::temperature::TemperatureSeries;
use serde::Serialize;

/// Days per bucket in the climate rollup.
const WEEK_DAYS: usize = 7;

/// Season-aligned cumulative consumption, one slot per month starting at
/// August. Slots before the first reading stay `None`; gaps after it carry
/// the previous cumulative forward, so a quiet month never reads as a
/// reset to zero.
pub fn monthly_cumulative(season_readings: &[Reading]) -> [Option<f64>; 12] {
    let mut sorted = season_readings.to_vec();
    sorted.sort();

    let mut slots: [Option<f64>; 12] = [None; 12];
    let mut cumulative = 0.0;
    let mut prev: Option<&Reading> = None;
    for reading in &sorted {
        cumulative += Delta::between(reading, prev).total;
        slots[season_month_index(reading.date)] = Some(cumulative);
        prev = Some(reading);
    }
    for i in 1..slots.len() {
        if slots[i].is_none() && slots[i - 1].is_some() {
            slots[i] = slots[i - 1];
        }
    }
    slots
}

/// Weekly temperature and consumption buckets for the climate view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRollup {
    /// Bucket labels, the first day of each week as "DD Mon".
    pub labels: Vec<String>,
    /// Mean of the non-missing temperatures in each bucket.
    pub temps: Vec<Option<f64>>,
    /// Sum of the daily estimates in each bucket; `None` where no estimate
    /// falls inside the bucket.
    pub consumption: Vec<Option<f64>>,
}

/// Buckets the temperature axis into 7-day windows, averaging the
/// non-missing samples and summing the daily estimates falling into each
/// window. `cutoff` stops bucket generation at real data for the season
/// still in progress, so the series never shows projected weeks.
pub fn weekly_rollup(
    series: &TemperatureSeries,
    estimates: &[DailyEstimate],
    cutoff: Option<NaiveDate>,
) -> WeeklyRollup {
    let mut rollup = WeeklyRollup {
        labels: Vec::new(),
        temps: Vec::new(),
        consumption: Vec::new(),
    };
    let days = series.days();
    let means = series.means();

    let mut i = 0;
    while i < days.len() {
        let week_start = days[i];
        if let Some(cutoff) = cutoff {
            if week_start > cutoff {
                break;
            }
        }
        rollup.labels.push(week_start.format("%d %b").to_string());

        let mut temp_sum = 0.0;
        let mut temp_count = 0u32;
        let mut consumed = 0.0;
        let mut has_consumption = false;
        for j in i..(i + WEEK_DAYS).min(days.len()) {
            let day = days[j];
            if let Some(cutoff) = cutoff {
                if day > cutoff {
                    break;
                }
            }
            if let Some(temp) = means[j] {
                temp_sum += temp;
                temp_count += 1;
            }
            for estimate in estimates.iter().filter(|e| e.date == day) {
                consumed += estimate.value;
                has_consumption = true;
            }
        }
        rollup
            .temps
            .push((temp_count > 0).then(|| temp_sum / temp_count as f64));
        rollup.consumption.push(has_consumption.then_some(consumed));
        i += WEEK_DAYS;
    }
    rollup
}

/// Average daily rate between each reading and its predecessor. The first
/// reading has no predecessor and contributes a sentinel zero. Input must
/// be sorted by date.
pub fn daily_average_series(readings: &[Reading]) -> Vec<f64> {
    let mut out = Vec::with_capacity(readings.len());
    let mut prev: Option<&Reading> = None;
    for reading in readings {
        let value = match prev {
            None => 0.0,
            Some(previous) => {
                let days = (reading.date - previous.date).num_days().max(1);
                Delta::between(reading, Some(previous)).total / days as f64
            }
        };
        out.push(value);
        prev = Some(reading);
    }
    out
}

/// Percent change of each interval's total consumption against the
/// previous interval; zero for the first reading and whenever the previous
/// interval consumed nothing. Input must be sorted by date.
pub fn variation_series(readings: &[Reading]) -> Vec<f64> {
    let mut out = Vec::with_capacity(readings.len());
    let mut prev: Option<&Reading> = None;
    let mut prev_total: Option<f64> = None;
    for reading in readings {
        let total = Delta::between(reading, prev).total;
        let value = match prev_total {
            Some(p) if p != 0.0 => (total - p) / p * 100.0,
            _ => 0.0,
        };
        out.push(value);
        prev_total = Some(total);
        prev = Some(reading);
    }
    out
}

/// Per-reading consumption for one room, sentinel zero first. Input must
/// be sorted by date.
pub fn room_series(readings: &[Reading], room: Room) -> Vec<f64> {
    let mut out = Vec::with_capacity(readings.len());
    let mut prev: Option<&Reading> = None;
    for reading in readings {
        out.push(Delta::between(reading, prev).room(room));
        prev = Some(reading);
    }
    out
}
