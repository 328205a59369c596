//! Text reports over the readings log: season summaries, the per-season
//! detail table and the monthly cumulative series.

use hca_core::reading::{Reading, Room};
use hca_core::season::{SeasonLabel, SEASON_MONTH_LABELS};
use hca_data::series::monthly_cumulative;
use hca_data::summary::SeasonSummary;
use hca_utils::dates::format_date;
use log::info;

/// List every observed season with its headline numbers.
pub fn run_seasons(readings_csv: &str, periods_csv: Option<&str>) -> anyhow::Result<()> {
    let log = crate::load_readings(readings_csv)?;
    let periods = crate::load_periods(periods_csv)?;
    let today = crate::today();
    let snapshot = log.sorted();

    info!("{} readings across {} seasons", log.len(), log.seasons().len());

    println!("season  readings  consumption  heating days  per day");
    for season in log.seasons() {
        let summary = SeasonSummary::for_season(season, &snapshot, &periods, today);
        let per_day = summary
            .daily_mean
            .map(|m| format!("{m:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}   {:>8}  {:>11.1}  {:>12}  {:>7}",
            summary.season, summary.readings, summary.consumption, summary.heating_days, per_day
        );
    }
    Ok(())
}

/// Per-reading consumption table for one season: date, interval length,
/// per-room deltas, total and daily mean.
pub fn run_detail(readings_csv: &str, season: &str) -> anyhow::Result<()> {
    let season: SeasonLabel = season.parse()?;
    let log = crate::load_readings(readings_csv)?;
    let readings = log.for_season(season);
    if readings.is_empty() {
        println!("no readings for season {season}");
        return Ok(());
    }

    let header = Room::ALL
        .iter()
        .map(|room| room.column_name().to_string())
        .collect::<Vec<_>>()
        .join("  ");
    println!("date        days  {header}  total  per day");

    let mut prev: Option<&Reading> = None;
    let mut total_days = 0i64;
    let mut total_consumed = 0.0;
    for reading in &readings {
        let delta = hca_core::consumption::Delta::between(reading, prev);
        let days = prev.map(|p| (reading.date - p.date).num_days()).unwrap_or(0);
        let per_day = if days > 0 {
            format!("{:.2}", delta.total / days as f64)
        } else {
            "-".to_string()
        };
        let rooms = Room::ALL
            .iter()
            .map(|room| format!("{:>7.1}", delta.room(*room)))
            .collect::<Vec<_>>()
            .join("  ");
        println!(
            "{}  {:>4}  {}  {:>5.1}  {:>7}",
            format_date(&reading.date),
            days,
            rooms,
            delta.total,
            per_day
        );
        total_days += days;
        total_consumed += delta.total;
        prev = Some(reading);
    }

    let mean = if total_days > 0 {
        format!("{:.2}", total_consumed / total_days as f64)
    } else {
        "-".to_string()
    };
    println!("total       {total_days:>4}  consumption {total_consumed:.1}  per day {mean}");
    Ok(())
}

/// The 12-slot season-aligned cumulative series, one line per season.
pub fn run_monthly(readings_csv: &str, season: Option<&str>) -> anyhow::Result<()> {
    let log = crate::load_readings(readings_csv)?;
    let selected: Vec<SeasonLabel> = match season {
        Some(label) => vec![label.parse()?],
        None => log.seasons(),
    };

    println!("season  {}", SEASON_MONTH_LABELS.join("    "));
    for season in selected {
        let slots = monthly_cumulative(&log.for_season(season));
        let cells = slots
            .iter()
            .map(|slot| match slot {
                Some(value) => format!("{value:>6.1}"),
                None => format!("{:>6}", "-"),
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("{season}  {cells}");
    }
    Ok(())
}
