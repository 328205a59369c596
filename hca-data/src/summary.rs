use chrono::NaiveDate;
use hca_core::heating_period::HeatingPeriodSet;
use hca_core::reading::Reading;
use hca_core::season::SeasonLabel;
use serde::Serialize;

/// Headline numbers for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: SeasonLabel,
    pub readings: usize,
    /// Spread between the season's first and last cumulative totals,
    /// clamped at zero in case meters were replaced mid-season.
    pub consumption: f64,
    /// Distinct days the heating was on during the season.
    pub heating_days: i64,
    /// Consumption per heating day, when both are known.
    pub daily_mean: Option<f64>,
}

impl SeasonSummary {
    pub fn for_season(
        season: SeasonLabel,
        readings: &[Reading],
        periods: &HeatingPeriodSet,
        today: NaiveDate,
    ) -> SeasonSummary {
        let mut season_readings: Vec<&Reading> = readings
            .iter()
            .filter(|r| r.effective_season() == season)
            .collect();
        season_readings.sort();

        let consumption = match (season_readings.first(), season_readings.last()) {
            (Some(first), Some(last)) if season_readings.len() >= 2 => {
                (last.total() - first.total()).max(0.0)
            }
            _ => 0.0,
        };
        let heating_days = periods.heating_days_in_season(season, today);
        let daily_mean = (heating_days > 0 && season_readings.len() >= 2)
            .then(|| consumption / heating_days as f64);

        SeasonSummary {
            season,
            readings: season_readings.len(),
            consumption,
            heating_days,
            daily_mean,
        }
    }
}
