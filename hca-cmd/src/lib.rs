//! Command implementations for the HCA CLI.
//!
//! Each subcommand loads readings (and optionally heating periods) from
//! CSV files and prints one of the engine's series as a text table.

use clap::Subcommand;
use hca_core::heating_period::HeatingPeriodSet;
use hca_core::store::ReadingLog;
use hca_core::temperature::Location;

pub mod estimate;
pub mod report;

#[derive(Subcommand)]
pub enum Command {
    /// List heating seasons found in the readings with summary numbers
    Seasons {
        /// Path to the readings CSV
        #[arg(short, long)]
        readings_csv: String,

        /// Path to the heating periods CSV (start,end rows)
        #[arg(short, long)]
        periods_csv: Option<String>,
    },

    /// Per-reading consumption table for one season
    Detail {
        /// Path to the readings CSV
        #[arg(short, long)]
        readings_csv: String,

        /// Season label, e.g. 24/25
        #[arg(short, long)]
        season: String,
    },

    /// Season-aligned monthly cumulative consumption
    Monthly {
        /// Path to the readings CSV
        #[arg(short, long)]
        readings_csv: String,

        /// Restrict to one season label; all observed seasons otherwise
        #[arg(short, long)]
        season: Option<String>,
    },

    /// Daily consumption estimates for one season
    Estimate {
        /// Path to the readings CSV
        #[arg(short, long)]
        readings_csv: String,

        /// Season label, e.g. 24/25
        #[arg(short, long)]
        season: String,

        /// Path to the heating periods CSV (start,end rows)
        #[arg(short, long)]
        periods_csv: Option<String>,

        /// Weight days by archive temperatures instead of a uniform rate
        #[arg(long)]
        weighted: bool,

        /// Latitude for the temperature archive query
        #[arg(long)]
        lat: Option<f64>,

        /// Longitude for the temperature archive query
        #[arg(long)]
        lng: Option<f64>,
    },

    /// Weekly temperature and consumption rollup for one season
    Climate {
        /// Path to the readings CSV
        #[arg(short, long)]
        readings_csv: String,

        /// Season label, e.g. 24/25
        #[arg(short, long)]
        season: String,

        /// Path to the heating periods CSV (start,end rows)
        #[arg(short, long)]
        periods_csv: Option<String>,

        /// Latitude for the temperature archive query
        #[arg(long)]
        lat: Option<f64>,

        /// Longitude for the temperature archive query
        #[arg(long)]
        lng: Option<f64>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Seasons {
            readings_csv,
            periods_csv,
        } => report::run_seasons(&readings_csv, periods_csv.as_deref()),
        Command::Detail {
            readings_csv,
            season,
        } => report::run_detail(&readings_csv, &season),
        Command::Monthly {
            readings_csv,
            season,
        } => report::run_monthly(&readings_csv, season.as_deref()),
        Command::Estimate {
            readings_csv,
            season,
            periods_csv,
            weighted,
            lat,
            lng,
        } => {
            estimate::run_estimate(
                &readings_csv,
                &season,
                periods_csv.as_deref(),
                weighted,
                location(lat, lng),
            )
            .await
        }
        Command::Climate {
            readings_csv,
            season,
            periods_csv,
            lat,
            lng,
        } => {
            estimate::run_climate(
                &readings_csv,
                &season,
                periods_csv.as_deref(),
                location(lat, lng),
            )
            .await
        }
    }
}

fn location(lat: Option<f64>, lng: Option<f64>) -> Location {
    let mut location = Location::default();
    if let Some(lat) = lat {
        location.latitude = lat;
    }
    if let Some(lng) = lng {
        location.longitude = lng;
    }
    location
}

/// Load a readings CSV into a log, enforcing date uniqueness.
pub(crate) fn load_readings(path: &str) -> anyhow::Result<ReadingLog> {
    let data = std::fs::read_to_string(path)?;
    let readings = hca_core::reading::readings_from_csv(&data)?;
    Ok(ReadingLog::from_readings(readings)?)
}

/// Load the heating periods CSV, or an empty registry when none is given.
pub(crate) fn load_periods(path: Option<&str>) -> anyhow::Result<HeatingPeriodSet> {
    match path {
        Some(path) => {
            let data = std::fs::read_to_string(path)?;
            Ok(HeatingPeriodSet::from_csv(&data)?)
        }
        None => Ok(HeatingPeriodSet::new()),
    }
}

pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().naive_local().date()
}
