//! Read-only JSON snapshots loaded once at start-up.

use crate::error::{Result, TaggerError};
use crate::population::{Population, PopulationRecord, UniverseCounts};
use crate::records::{Record, RecordSet};
use rand::Rng;
use serde::de::DeserializeOwned;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let snapshot_error = |message: String| TaggerError::Snapshot {
        path: path.display().to_string(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| snapshot_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| snapshot_error(e.to_string()))
}

/// Labelled records, as an array of [`Record`].
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let records: Vec<Record> = read_json(path)?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(RecordSet::new(records))
}

/// Population snapshot, randomly capped to `cap` records.
pub fn load_population<R: Rng + ?Sized>(
    path: &Path,
    cap: usize,
    rng: &mut R,
) -> Result<Population> {
    let records: Vec<PopulationRecord> = read_json(path)?;
    let total = records.len();
    let population = Population::capped(records, cap, rng);
    log::info!(
        "Loaded {} of {} population records from {}",
        population.len(),
        total,
        path.display()
    );
    Ok(population)
}

/// Universe size per band, as an object keyed by band name.
pub fn load_universe(path: &Path) -> Result<UniverseCounts> {
    read_json(path)
}
