//! The unlabelled population that patterns are extrapolated to.

pub mod bands;
pub mod extrapolate;

pub use bands::IncomeBand;
pub use extrapolate::{Bucket, Extrapolation, ExtrapolationRow, ExtrapolationTable, Extrapolator};

use crate::corpus::{Corpus, CorpusSource};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default size of the working sample drawn from the population snapshot.
pub const DEFAULT_POPULATION_CAP: usize = 10_000;

/// An unlabelled record. Activities were already back-filled from objects
/// when the snapshot was produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopulationRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub activities: Option<String>,
    #[serde(default)]
    pub income: Option<f64>,
    #[serde(default)]
    pub income_band: Option<IncomeBand>,
}

impl PopulationRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            activities: None,
            income: None,
            income_band: None,
        }
    }

    pub fn with_activities(mut self, activities: impl Into<String>) -> Self {
        self.activities = Some(activities.into());
        self
    }

    pub fn with_band(mut self, band: IncomeBand) -> Self {
        self.income_band = Some(band);
        self
    }

    pub fn with_income(mut self, income: f64) -> Self {
        self.income = Some(income);
        self
    }

    /// Explicit band if present, otherwise derived from income.
    pub fn band(&self) -> Option<IncomeBand> {
        self.income_band
            .or_else(|| self.income.and_then(IncomeBand::from_income))
    }
}

impl CorpusSource for PopulationRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn activities(&self) -> Option<&str> {
        self.activities.as_deref()
    }
}

/// Record counts per income band. Records without a band are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketCounts(BTreeMap<IncomeBand, u64>);

impl BucketCounts {
    pub fn from_bands<I>(bands: I) -> Self
    where
        I: IntoIterator<Item = Option<IncomeBand>>,
    {
        let mut counts = BTreeMap::new();
        for band in bands.into_iter().flatten() {
            *counts.entry(band).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn get(&self, band: IncomeBand) -> u64 {
        self.0.get(&band).copied().unwrap_or(0)
    }

    pub fn contains(&self, band: IncomeBand) -> bool {
        self.0.contains_key(&band)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn bands(&self) -> impl Iterator<Item = IncomeBand> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(IncomeBand, u64)> for BucketCounts {
    fn from_iter<T: IntoIterator<Item = (IncomeBand, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Precomputed size of every band across the full universe of records.
///
/// Kept apart from the working sample's own counts: the sample provides the
/// denominator of the match proportion, the universe provides the figure the
/// proportion is scaled up to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniverseCounts(pub BucketCounts);

impl UniverseCounts {
    pub fn get(&self, band: IncomeBand) -> Option<u64> {
        self.0.contains(band).then(|| self.0.get(band))
    }

    pub fn total(&self) -> Option<u64> {
        (self.0.bands().next().is_some()).then(|| self.0.total())
    }
}

impl FromIterator<(IncomeBand, u64)> for UniverseCounts {
    fn from_iter<T: IntoIterator<Item = (IncomeBand, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The working sample of the population, with corpus text and band counts
/// computed once at load.
#[derive(Debug, Clone, Default)]
pub struct Population {
    records: Vec<PopulationRecord>,
    corpus: Corpus,
    counts: BucketCounts,
}

impl Population {
    pub fn new(records: Vec<PopulationRecord>) -> Self {
        let corpus = Corpus::build(&records);
        let counts = BucketCounts::from_bands(records.iter().map(PopulationRecord::band));
        Self {
            records,
            corpus,
            counts,
        }
    }

    /// Keep at most `cap` records, chosen uniformly at random, in snapshot order.
    pub fn capped<R: Rng + ?Sized>(
        records: Vec<PopulationRecord>,
        cap: usize,
        rng: &mut R,
    ) -> Self {
        if records.len() <= cap {
            return Self::new(records);
        }

        let mut keep = rand::seq::index::sample(rng, records.len(), cap).into_vec();
        keep.sort_unstable();

        let mut keep = keep.into_iter().peekable();
        let sampled = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| {
                if keep.peek() == Some(&i) {
                    keep.next();
                    Some(record)
                } else {
                    None
                }
            })
            .collect();

        Self::new(sampled)
    }

    pub fn records(&self) -> &[PopulationRecord] {
        &self.records
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn counts(&self) -> &BucketCounts {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_band_prefers_explicit_value() {
        let record = PopulationRecord::new("1", "A")
            .with_income(5_000.0)
            .with_band(IncomeBand::Over10m);
        assert_eq!(record.band(), Some(IncomeBand::Over10m));

        let record = PopulationRecord::new("2", "B").with_income(50_000.0);
        assert_eq!(record.band(), Some(IncomeBand::UpTo100k));

        assert_eq!(PopulationRecord::new("3", "C").band(), None);
    }

    #[test]
    fn test_population_counts_by_band() {
        let population = Population::new(vec![
            PopulationRecord::new("1", "A").with_band(IncomeBand::UpTo10k),
            PopulationRecord::new("2", "B").with_band(IncomeBand::UpTo10k),
            PopulationRecord::new("3", "C").with_band(IncomeBand::UpTo1m),
            PopulationRecord::new("4", "D"),
        ]);
        assert_eq!(population.counts().get(IncomeBand::UpTo10k), 2);
        assert_eq!(population.counts().get(IncomeBand::UpTo1m), 1);
        assert_eq!(population.counts().get(IncomeBand::Over10m), 0);
        assert_eq!(population.counts().total(), 3);
    }

    #[test]
    fn test_capped_population_keeps_order() {
        let records: Vec<_> = (0..50)
            .map(|i| PopulationRecord::new(i.to_string(), format!("Charity {}", i)))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);
        let population = Population::capped(records, 10, &mut rng);

        assert_eq!(population.len(), 10);
        assert_eq!(population.corpus().len(), 10);
        let ids: Vec<usize> = population
            .records()
            .iter()
            .map(|r| r.id.parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_universe_counts_from_json() {
        let universe: UniverseCounts =
            serde_json::from_str(r#"{"up_to_10k": 1000, "over_10m": 20}"#).unwrap();
        assert_eq!(universe.get(IncomeBand::UpTo10k), Some(1000));
        assert_eq!(universe.get(IncomeBand::UpTo1m), None);
        assert_eq!(universe.total(), Some(1020));
        assert_eq!(UniverseCounts::default().total(), None);
    }
}
