//! Scale a pattern's match rate in the working sample up to the universe.
//!
//! For every income band the share of sampled records that the pattern
//! selects is multiplied by the band's universe count. The Total row is built
//! from summed counts, not from an average of the band percentages.
//!
//! Only a bounded sample of the matched records is returned for display. The
//! sample never feeds the arithmetic, which always uses full counts.

use crate::classify::{Matcher, PatternPair};
use crate::error::Result;
use crate::population::{BucketCounts, IncomeBand, Population, UniverseCounts};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SAMPLE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Band(IncomeBand),
    Total,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Band(band) => fmt::Display::fmt(band, f),
            Bucket::Total => f.write_str("Total"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolationRow {
    pub bucket: Bucket,
    /// Matched records in this bucket of the working sample.
    pub selected: u64,
    /// All records in this bucket of the working sample.
    pub population: u64,
    /// Records in this bucket across the full universe, when known.
    pub universe: Option<u64>,
    pub percentage: Option<f64>,
    pub estimated_total: Option<f64>,
}

impl ExtrapolationRow {
    fn new(bucket: Bucket, selected: u64, population: u64, universe: Option<u64>) -> Self {
        let percentage = if population == 0 {
            None
        } else {
            Some(selected as f64 / population as f64)
        };
        let estimated_total = percentage.zip(universe).map(|(p, u)| p * u as f64);

        Self {
            bucket,
            selected,
            population,
            universe,
            percentage,
            estimated_total,
        }
    }
}

/// One row per band, in band order, followed by the Total row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolationTable {
    pub rows: Vec<ExtrapolationRow>,
}

impl ExtrapolationTable {
    pub fn build(
        selected: &BucketCounts,
        population: &BucketCounts,
        universe: &UniverseCounts,
    ) -> Self {
        let mut rows: Vec<ExtrapolationRow> = IncomeBand::ALL
            .into_iter()
            .filter(|band| population.contains(*band) || universe.get(*band).is_some())
            .map(|band| {
                ExtrapolationRow::new(
                    Bucket::Band(band),
                    selected.get(band),
                    population.get(band),
                    universe.get(band),
                )
            })
            .collect();

        rows.push(ExtrapolationRow::new(
            Bucket::Total,
            selected.total(),
            population.total(),
            universe.total(),
        ));

        Self { rows }
    }

    pub fn total(&self) -> Option<&ExtrapolationRow> {
        self.rows.iter().find(|row| row.bucket == Bucket::Total)
    }

    pub fn band(&self, band: IncomeBand) -> Option<&ExtrapolationRow> {
        self.rows.iter().find(|row| row.bucket == Bucket::Band(band))
    }

    pub fn bands(&self) -> impl Iterator<Item = &ExtrapolationRow> {
        self.rows.iter().filter(|row| row.bucket != Bucket::Total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrapolation {
    /// Number of working-sample records the pattern selected.
    pub matched: usize,
    /// Indices into the population of the records chosen for display.
    pub sample: Vec<usize>,
    pub table: ExtrapolationTable,
}

#[derive(Debug, Clone)]
pub struct Extrapolator {
    pub sample_size: usize,
}

impl Default for Extrapolator {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Extrapolator {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    pub fn extrapolate<R: Rng + ?Sized>(
        &self,
        matcher: &Matcher,
        pair: &PatternPair,
        population: &Population,
        universe: &UniverseCounts,
        rng: &mut R,
    ) -> Result<Extrapolation> {
        let selected = matcher.select(population.corpus().iter(), pair)?;

        let matched: Vec<usize> = selected
            .iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .map(|(i, _)| i)
            .collect();

        let selected_counts =
            BucketCounts::from_bands(matched.iter().map(|&i| population.records()[i].band()));
        let table = ExtrapolationTable::build(&selected_counts, population.counts(), universe);

        log::debug!(
            "Pattern matched {} of {} population records",
            matched.len(),
            population.len()
        );

        Ok(Extrapolation {
            matched: matched.len(),
            sample: sample_indices(&matched, self.sample_size, rng),
            table,
        })
    }
}

/// Everything when it fits, otherwise a uniform sample of exactly `size`,
/// kept in the original order.
pub fn sample_indices<R: Rng + ?Sized>(indices: &[usize], size: usize, rng: &mut R) -> Vec<usize> {
    if indices.len() <= size {
        return indices.to_vec();
    }

    let mut picked = rand::seq::index::sample(rng, indices.len(), size).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| indices[i]).collect()
}
