//! Daily interpolation between sparse readings.
//!
//! Readings arrive weeks apart; this module spreads each interval's total
//! consumption across the calendar days between them, either uniformly or
//! proportionally to a cooling-demand proxy when daily mean temperatures
//! are available.

use chrono::NaiveDate;
use hca_core::consumption::Delta;
use hca_core::heating_period::HeatingPeriodSet;
use hca_core::reading::Reading;
use hca_core::temperature::TemperatureSeries;
use itertools::Itertools;
use serde::Serialize;

/// Substitute mean temperature for days with no usable archive sample.
pub const FALLBACK_TEMP: f64 = 10.0;

/// Temperature above which a day stops drawing extra heating demand.
const COMFORT_TEMP: f64 = 20.0;

/// Floor keeping every day's weight positive, so even an all-warm interval
/// normalizes cleanly.
const MIN_WEIGHT: f64 = 0.1;

/// How far to look around a missing day for a replacement sample.
const NEAREST_SAMPLE_DAYS: i64 = 3;

/// A derived per-day consumption value. Never persisted; recomputed from
/// the readings on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEstimate {
    pub date: NaiveDate,
    pub value: f64,
    pub temperature: Option<f64>,
}

/// Linear proxy for heating demand: colder days weigh more. Isolated here
/// so the weighting can change without touching interpolation control flow.
pub fn heating_demand(temp: f64) -> f64 {
    (COMFORT_TEMP - temp).max(MIN_WEIGHT)
}

/// Distributes the consumption between two chronologically ordered readings
/// across the days in `(prev.date, curr.date]`, then keeps only the days
/// the heating was on.
///
/// With a temperature series and a positive total, each day's share follows
/// its [`heating_demand`] weight normalized over the whole interval;
/// otherwise every day gets the uniform rate. The proportions are computed
/// over the full interval before the heating filter runs, so the divisor
/// never shrinks to the filtered subset; consumption attributed to
/// non-heating days is deliberately dropped from the per-day view.
///
/// An interval of zero or negative length contributes nothing.
pub fn interpolate_daily(
    prev: &Reading,
    curr: &Reading,
    temps: Option<&TemperatureSeries>,
    periods: &HeatingPeriodSet,
    today: NaiveDate,
) -> Vec<DailyEstimate> {
    let days = (curr.date - prev.date).num_days();
    if days <= 0 {
        return Vec::new();
    }
    let delta = Delta::between(curr, Some(prev));
    let interval: Vec<NaiveDate> = prev.date.iter_days().skip(1).take(days as usize).collect();

    let estimates: Vec<DailyEstimate> = match temps {
        Some(series) if delta.total > 0.0 => {
            let day_temps: Vec<f64> = interval
                .iter()
                .map(|day| {
                    series
                        .nearest_within(*day, NEAREST_SAMPLE_DAYS)
                        .unwrap_or(FALLBACK_TEMP)
                })
                .collect();
            let weights: Vec<f64> = day_temps.iter().map(|t| heating_demand(*t)).collect();
            let total_weight: f64 = weights.iter().sum();
            interval
                .iter()
                .zip(day_temps)
                .zip(weights)
                .map(|((date, temp), weight)| DailyEstimate {
                    date: *date,
                    value: delta.total * (weight / total_weight),
                    temperature: Some(temp),
                })
                .collect()
        }
        _ => {
            let rate = delta.total / days as f64;
            interval
                .iter()
                .map(|date| DailyEstimate {
                    date: *date,
                    value: rate,
                    temperature: temps.and_then(|series| series.temperature_on(*date)),
                })
                .collect()
        }
    };

    estimates
        .into_iter()
        .filter(|estimate| periods.is_heating_day(estimate.date, today))
        .collect()
}

/// Daily estimates for a whole season: every chronologically adjacent pair
/// of readings contributes its interval.
pub fn season_estimates(
    readings: &[Reading],
    temps: Option<&TemperatureSeries>,
    periods: &HeatingPeriodSet,
    today: NaiveDate,
) -> Vec<DailyEstimate> {
    let mut sorted = readings.to_vec();
    sorted.sort();
    sorted
        .iter()
        .tuple_windows()
        .flat_map(|(prev, curr)| interpolate_daily(prev, curr, temps, periods, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{heating_demand, interpolate_daily, season_estimates, FALLBACK_TEMP};
    use chrono::NaiveDate;
    use hca_core::heating_period::{HeatingPeriod, HeatingPeriodSet};
    use hca_core::reading::{Reading, Room};
    use hca_core::temperature::TemperatureSeries;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading(on: NaiveDate, kitchen: f64) -> Reading {
        let mut rooms = BTreeMap::new();
        rooms.insert(Room::Kitchen, kitchen);
        Reading::new(on, rooms)
    }

    fn period(start: NaiveDate, end: NaiveDate) -> HeatingPeriodSet {
        let mut set = HeatingPeriodSet::new();
        set.add(HeatingPeriod::new(start, Some(end)).unwrap());
        set
    }

    fn always_on() -> HeatingPeriodSet {
        period(date(2000, 1, 1), date(2099, 1, 1))
    }

    const TODAY: (i32, u32, u32) = (2025, 6, 30);

    fn today() -> NaiveDate {
        date(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn test_linear_mode_uses_the_full_interval_divisor() {
        // 30 units over the 30 days of November, heating on Nov 5-25 only:
        // every surviving day keeps the full-interval rate of 1.0
        let prev = reading(date(2024, 11, 1), 100.0);
        let curr = reading(date(2024, 12, 1), 130.0);
        let periods = period(date(2024, 11, 5), date(2024, 11, 25));

        let estimates = interpolate_daily(&prev, &curr, None, &periods, today());
        assert_eq!(estimates.len(), 21);
        assert_eq!(estimates.first().unwrap().date, date(2024, 11, 5));
        assert_eq!(estimates.last().unwrap().date, date(2024, 11, 25));
        for estimate in &estimates {
            assert!((estimate.value - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identical_dates_contribute_nothing() {
        let prev = reading(date(2024, 11, 1), 100.0);
        let curr = reading(date(2024, 11, 1), 130.0);
        let estimates = interpolate_daily(&prev, &curr, None, &always_on(), today());
        assert!(estimates.is_empty());
    }

    #[test]
    fn test_weighted_mode_sums_to_the_total_when_always_heating() {
        let prev = reading(date(2024, 11, 1), 100.0);
        let curr = reading(date(2024, 11, 5), 140.0);
        let series = TemperatureSeries::new(
            vec![
                date(2024, 11, 2),
                date(2024, 11, 3),
                date(2024, 11, 4),
                date(2024, 11, 5),
            ],
            vec![Some(2.0), Some(8.0), Some(14.0), Some(5.0)],
        )
        .unwrap();

        let estimates = interpolate_daily(&prev, &curr, Some(&series), &always_on(), today());
        assert_eq!(estimates.len(), 4);
        let total: f64 = estimates.iter().map(|e| e.value).sum();
        assert!((total - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_colder_days_draw_at_least_as_much_as_warmer_days() {
        let prev = reading(date(2024, 11, 1), 100.0);
        let curr = reading(date(2024, 11, 4), 130.0);
        let series = TemperatureSeries::new(
            vec![date(2024, 11, 2), date(2024, 11, 3), date(2024, 11, 4)],
            vec![Some(-1.0), Some(9.0), Some(18.0)],
        )
        .unwrap();

        let estimates = interpolate_daily(&prev, &curr, Some(&series), &always_on(), today());
        assert_eq!(estimates.len(), 3);
        assert!(estimates[0].value >= estimates[1].value);
        assert!(estimates[1].value >= estimates[2].value);
        for estimate in &estimates {
            assert!(estimate.value >= 0.0);
        }
    }

    #[test]
    fn test_missing_samples_take_the_fallback() {
        let prev = reading(date(2024, 11, 1), 100.0);
        let curr = reading(date(2024, 11, 3), 120.0);
        // far away from the interval, so even the nearest-sample search misses
        let series = TemperatureSeries::new(vec![date(2025, 2, 1)], vec![Some(0.0)]).unwrap();

        let estimates = interpolate_daily(&prev, &curr, Some(&series), &always_on(), today());
        assert_eq!(estimates.len(), 2);
        for estimate in &estimates {
            assert_eq!(estimate.temperature, Some(FALLBACK_TEMP));
            assert!((estimate.value - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_meter_rollback_falls_back_to_zero_rate() {
        // cumulative value dropped, so the clamped delta is zero and the
        // temperature series is ignored
        let prev = reading(date(2024, 11, 1), 100.0);
        let curr = reading(date(2024, 11, 4), 40.0);
        let series =
            TemperatureSeries::new(vec![date(2024, 11, 2)], vec![Some(0.0)]).unwrap();

        let estimates = interpolate_daily(&prev, &curr, Some(&series), &always_on(), today());
        assert_eq!(estimates.len(), 3);
        for estimate in &estimates {
            assert_eq!(estimate.value, 0.0);
        }
    }

    #[test]
    fn test_filtered_sum_never_exceeds_the_total() {
        let prev = reading(date(2024, 11, 1), 100.0);
        let curr = reading(date(2024, 12, 1), 130.0);
        let periods = period(date(2024, 11, 5), date(2024, 11, 25));
        let series = TemperatureSeries::new(
            (1..=30)
                .map(|d| date(2024, 11, d))
                .collect::<Vec<NaiveDate>>(),
            (1..=30).map(|d| Some(d as f64 / 2.0)).collect(),
        )
        .unwrap();

        let estimates = interpolate_daily(&prev, &curr, Some(&series), &periods, today());
        let total: f64 = estimates.iter().map(|e| e.value).sum();
        assert!(total <= 30.0 + 1e-9);
        assert!(total > 0.0);
    }

    #[test]
    fn test_season_estimates_chains_adjacent_pairs() {
        let readings = vec![
            reading(date(2024, 11, 1), 100.0),
            reading(date(2024, 11, 11), 120.0),
            reading(date(2024, 11, 21), 150.0),
        ];
        let estimates = season_estimates(&readings, None, &always_on(), today());
        assert_eq!(estimates.len(), 20);
        // first interval rate 2.0/day, second 3.0/day
        assert!((estimates[0].value - 2.0).abs() < 1e-9);
        assert!((estimates[19].value - 3.0).abs() < 1e-9);
        let total: f64 = estimates.iter().map(|e| e.value).sum();
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_heating_demand_floor() {
        assert_eq!(heating_demand(25.0), 0.1);
        assert_eq!(heating_demand(20.0), 0.1);
        assert!((heating_demand(0.0) - 20.0).abs() < 1e-9);
        assert!((heating_demand(-5.0) - 25.0).abs() < 1e-9);
    }
}
