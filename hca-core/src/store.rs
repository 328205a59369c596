use crate::error::HcaError;
use crate::reading::Reading;
use crate::season::SeasonLabel;
use std::collections::{BTreeMap, BTreeSet};

/// Ordered-insertion collection of readings, the single source of truth:
/// every derived series is recomputed on demand from a snapshot of this
/// log, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ReadingLog {
    readings: Vec<Reading>,
}

impl ReadingLog {
    pub fn new() -> ReadingLog {
        ReadingLog::default()
    }

    /// Builds a log from existing readings, enforcing date uniqueness.
    pub fn from_readings(readings: Vec<Reading>) -> Result<ReadingLog, HcaError> {
        let mut log = ReadingLog::new();
        for reading in readings {
            log.append(reading)?;
        }
        Ok(log)
    }

    /// Appends a reading; the date is the unique key within the log.
    pub fn append(&mut self, reading: Reading) -> Result<(), HcaError> {
        if self.readings.iter().any(|r| r.date == reading.date) {
            return Err(HcaError::DuplicateReading(reading.date));
        }
        self.readings.push(reading);
        Ok(())
    }

    /// Removes the reading at `index` in insertion order.
    pub fn remove(&mut self, index: usize) -> Option<Reading> {
        (index < self.readings.len()).then(|| self.readings.remove(index))
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Snapshot sorted by date. Computation passes run over the snapshot,
    /// so an append or delete landing mid-pass never shifts their data.
    pub fn sorted(&self) -> Vec<Reading> {
        let mut snapshot = self.readings.clone();
        snapshot.sort();
        snapshot
    }

    /// Distinct season labels observed across the log, ascending. This set
    /// drives every season selector downstream.
    pub fn seasons(&self) -> Vec<SeasonLabel> {
        let set: BTreeSet<SeasonLabel> = self
            .readings
            .iter()
            .map(|r| r.effective_season())
            .collect();
        set.into_iter().collect()
    }

    /// The sorted snapshot partitioned by effective season.
    pub fn by_season(&self) -> BTreeMap<SeasonLabel, Vec<Reading>> {
        let mut partitions: BTreeMap<SeasonLabel, Vec<Reading>> = BTreeMap::new();
        for reading in self.sorted() {
            partitions
                .entry(reading.effective_season())
                .or_default()
                .push(reading);
        }
        partitions
    }

    /// One season's readings, sorted by date.
    pub fn for_season(&self, season: SeasonLabel) -> Vec<Reading> {
        let mut readings: Vec<Reading> = self
            .readings
            .iter()
            .filter(|r| r.effective_season() == season)
            .cloned()
            .collect();
        readings.sort();
        readings
    }
}
