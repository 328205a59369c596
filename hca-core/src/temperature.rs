use crate::error::HcaError;
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

#[cfg(feature = "api")]
use crate::season::SeasonLabel;
#[cfg(feature = "api")]
use log::info;
#[cfg(feature = "api")]
use reqwest::Client;
#[cfg(feature = "api")]
use std::collections::HashMap;
#[cfg(feature = "api")]
use std::time::Duration;

/// Date format used by the Open-Meteo archive API: "YYYY-MM-DD"
pub const METEO_DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(feature = "api")]
const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Daily mean temperatures for one heating season, kept as the two
/// parallel arrays the archive delivers. A `None` entry means the archive
/// has no sample for that day; consumers substitute a fallback instead of
/// failing.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSeries {
    time: Vec<NaiveDate>,
    mean: Vec<Option<f64>>,
}

impl TemperatureSeries {
    /// The arrays must be parallel.
    pub fn new(time: Vec<NaiveDate>, mean: Vec<Option<f64>>) -> Result<TemperatureSeries, HcaError> {
        if time.len() != mean.len() {
            return Err(HcaError::MalformedSeries(format!(
                "{} dates against {} samples",
                time.len(),
                mean.len()
            )));
        }
        Ok(TemperatureSeries { time, mean })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.time
    }

    pub fn means(&self) -> &[Option<f64>] {
        &self.mean
    }

    /// Mean temperature recorded for exactly `date`.
    pub fn temperature_on(&self, date: NaiveDate) -> Option<f64> {
        self.time
            .iter()
            .position(|d| *d == date)
            .and_then(|i| self.mean[i])
    }

    /// The closest non-missing sample within `max_offset` days of `date`,
    /// preferring the earlier day at equal distance.
    pub fn nearest_within(&self, date: NaiveDate, max_offset: i64) -> Option<f64> {
        if let Some(temp) = self.temperature_on(date) {
            return Some(temp);
        }
        for offset in 1..=max_offset {
            let step = TimeDelta::try_days(offset).unwrap();
            if let Some(temp) = self.temperature_on(date - step) {
                return Some(temp);
            }
            if let Some(temp) = self.temperature_on(date + step) {
                return Some(temp);
            }
        }
        None
    }

    /// Parse an archive API response body. `null` temperature entries are
    /// carried through as missing days.
    pub fn from_archive_json(body: &str) -> Result<TemperatureSeries, HcaError> {
        let response: ArchiveResponse = serde_json::from_str(body)
            .map_err(|e| HcaError::MalformedSeries(e.to_string()))?;
        response.daily.try_into()
    }
}

/// Wire shape of the archive API response.
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_mean: Vec<Option<f64>>,
}

impl TryFrom<DailyBlock> for TemperatureSeries {
    type Error = HcaError;

    fn try_from(block: DailyBlock) -> Result<Self, Self::Error> {
        let time = block
            .time
            .iter()
            .map(|s| {
                NaiveDate::parse_from_str(s, METEO_DATE_FORMAT)
                    .map_err(|_| HcaError::MalformedSeries(format!("bad date {s}")))
            })
            .collect::<Result<Vec<NaiveDate>, HcaError>>()?;
        TemperatureSeries::new(time, block.temperature_2m_mean)
    }
}

/// Geographic point the temperature archive is queried for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Location {
    fn default() -> Location {
        Location {
            latitude: 45.5962,
            longitude: 8.9167,
        }
    }
}

/// Open-Meteo archive client with a per-season cache. Each season is
/// fetched at most once per process lifetime; a failed fetch is cached as
/// absence, so consumers fall back to linear estimates without retry
/// storms.
#[cfg(feature = "api")]
pub struct MeteoClient {
    http: Client,
    location: Location,
    cache: HashMap<SeasonLabel, Option<TemperatureSeries>>,
}

#[cfg(feature = "api")]
impl MeteoClient {
    pub fn new(location: Location) -> Result<MeteoClient, HcaError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(MeteoClient {
            http,
            location,
            cache: HashMap::new(),
        })
    }

    /// Daily mean temperatures for `season`, from cache when available.
    /// Returns `None` when the archive is unreachable or the payload is
    /// malformed; the failure downgrades only this season.
    pub async fn season_temperatures(
        &mut self,
        season: SeasonLabel,
    ) -> Option<&TemperatureSeries> {
        if !self.cache.contains_key(&season) {
            let fetched = self.fetch(season).await;
            if let Err(e) = &fetched {
                info!("temperature fetch for season {season} failed: {e}; using linear estimates");
            }
            self.cache.insert(season, fetched.ok());
        }
        self.cache.get(&season).and_then(|cached| cached.as_ref())
    }

    async fn fetch(&self, season: SeasonLabel) -> Result<TemperatureSeries, HcaError> {
        let (start, end) = season.date_range();
        let url = format!(
            "{ARCHIVE_URL}?latitude={}&longitude={}&start_date={}&end_date={}&daily=temperature_2m_mean&timezone=Europe/Rome",
            self.location.latitude,
            self.location.longitude,
            start.format(METEO_DATE_FORMAT),
            end.format(METEO_DATE_FORMAT),
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(HcaError::MalformedSeries(format!(
                "archive API returned {}",
                response.status()
            )));
        }
        let body = response.text().await?;
        TemperatureSeries::from_archive_json(&body)
    }
}
