//! Daily estimation and climate rollup commands. The temperature archive
//! is the only network collaborator; every failure there downgrades the
//! output to linear estimates instead of aborting.

use hca_core::season::SeasonLabel;
use hca_core::temperature::{Location, MeteoClient, TemperatureSeries};
use hca_data::interpolation::season_estimates;
use hca_data::series::weekly_rollup;
use hca_utils::dates::format_date;
use log::info;

/// Print per-day consumption estimates for one season.
pub async fn run_estimate(
    readings_csv: &str,
    season: &str,
    periods_csv: Option<&str>,
    weighted: bool,
    location: Location,
) -> anyhow::Result<()> {
    let season: SeasonLabel = season.parse()?;
    let log = crate::load_readings(readings_csv)?;
    let readings = log.for_season(season);
    if readings.len() < 2 {
        println!("need at least two readings in season {season} to estimate");
        return Ok(());
    }
    let periods = crate::load_periods(periods_csv)?;
    let today = crate::today();

    let temps = if weighted {
        fetch_season(season, location).await
    } else {
        None
    };
    match &temps {
        Some(_) => info!("temperature-weighted estimates for season {season}"),
        None => info!("linear estimates for season {season}"),
    }

    let estimates = season_estimates(&readings, temps.as_ref(), &periods, today);
    if estimates.is_empty() {
        println!("no heating days between the readings of season {season}");
        return Ok(());
    }

    for estimate in &estimates {
        let temp = estimate
            .temperature
            .map(|t| format!("  {t:>5.1} C"))
            .unwrap_or_default();
        println!(
            "{}  {:>6.2}{temp}",
            format_date(&estimate.date),
            estimate.value
        );
    }

    let total: f64 = estimates.iter().map(|e| e.value).sum();
    let mean = total / estimates.len() as f64;
    let peak = estimates
        .iter()
        .max_by(|a, b| a.value.total_cmp(&b.value))
        .unwrap();
    println!(
        "{} heating days, total {total:.1}, mean {mean:.2}, peak {:.2} on {}",
        estimates.len(),
        peak.value,
        format_date(&peak.date)
    );
    Ok(())
}

/// Print the weekly temperature and consumption rollup for one season.
pub async fn run_climate(
    readings_csv: &str,
    season: &str,
    periods_csv: Option<&str>,
    location: Location,
) -> anyhow::Result<()> {
    let season: SeasonLabel = season.parse()?;
    let log = crate::load_readings(readings_csv)?;
    let readings = log.for_season(season);
    let periods = crate::load_periods(periods_csv)?;
    let today = crate::today();

    let Some(temps) = fetch_season(season, location).await else {
        println!("no temperature data available for season {season}");
        return Ok(());
    };

    let estimates = season_estimates(&readings, Some(&temps), &periods, today);
    // the running season stops at today; finished seasons keep their full axis
    let cutoff = (season == SeasonLabel::of_date(today)).then_some(today);
    let rollup = weekly_rollup(&temps, &estimates, cutoff);

    println!("week of  mean temp  consumption");
    for ((label, temp), consumed) in rollup
        .labels
        .iter()
        .zip(rollup.temps.iter().copied())
        .zip(rollup.consumption.iter().copied())
    {
        let temp = temp
            .map(|t| format!("{t:>6.1} C"))
            .unwrap_or_else(|| format!("{:>8}", "-"));
        let consumed = consumed
            .map(|c| format!("{c:>8.1}"))
            .unwrap_or_else(|| format!("{:>8}", "-"));
        println!("{label}   {temp}  {consumed}");
    }
    Ok(())
}

/// One cached fetch per season; any failure resolves to `None` and the
/// caller proceeds in linear mode.
async fn fetch_season(season: SeasonLabel, location: Location) -> Option<TemperatureSeries> {
    let mut client = match MeteoClient::new(location) {
        Ok(client) => client,
        Err(e) => {
            info!("could not build archive client: {e}");
            return None;
        }
    };
    client.season_temperatures(season).await.cloned()
}
