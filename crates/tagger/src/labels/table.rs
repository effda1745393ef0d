//! The working table: one scored row per label of a scheme.
//!
//! The table is plain session state. Callers hand it to every operation that
//! changes it; there is no internal locking, so concurrent writers must be
//! serialised by the caller.

use crate::classify::{evaluate, median_defined, Matcher, MetricsSummary, PatternPair};
use crate::error::{Result, TaggerError};
use crate::labels::definition::{LabelDefinition, Metric};
use crate::labels::store::LabelSourceEntry;
use crate::labels::LabelScheme;
use crate::records::RecordSet;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkingTable {
    scheme: LabelScheme,
    rows: Vec<LabelDefinition>,
}

impl WorkingTable {
    /// Join store entries with observed frequencies and score every label
    /// that already has a pattern.
    ///
    /// Entries marked not-used are dropped. A stored pattern that no longer
    /// compiles is logged and left unscored.
    pub fn initialize(
        scheme: LabelScheme,
        entries: Vec<LabelSourceEntry>,
        records: &RecordSet,
        matcher: &Matcher,
    ) -> Self {
        let relevance = scheme.relevance();
        let frequencies = relevance.frequencies(records.records());

        let mut rows: Vec<LabelDefinition> = entries
            .iter()
            .filter(|entry| !entry.not_used)
            .map(|entry| {
                let frequency = frequencies.get(&entry.label).copied().unwrap_or(0);
                LabelDefinition::from_entry(entry, scheme, frequency)
            })
            .collect();

        let mut scored = 0;
        for row in rows.iter_mut() {
            let Some(pair) = row.pattern_pair() else {
                continue;
            };
            match evaluate(matcher, records, relevance, &row.label, &pair) {
                Ok(evaluation) => {
                    row.apply(&pair, &evaluation.summary);
                    scored += 1;
                }
                Err(e) => log::warn!("Skipping stored pattern for '{}': {}", row.label, e),
            }
        }

        rows.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        log::info!(
            "Initialised {} {} labels ({} scored)",
            rows.len(),
            scheme.as_str(),
            scored
        );

        Self { scheme, rows }
    }

    pub fn from_rows(scheme: LabelScheme, rows: Vec<LabelDefinition>) -> Self {
        Self { scheme, rows }
    }

    pub fn scheme(&self) -> LabelScheme {
        self.scheme
    }

    pub fn rows(&self) -> &[LabelDefinition] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look a row up by label value, falling back to its slug.
    pub fn get(&self, key: &str) -> Option<&LabelDefinition> {
        self.position(key).map(|i| &self.rows[i])
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.label == key)
            .or_else(|| self.rows.iter().position(|row| row.slug == key))
    }

    /// Write an evaluated pattern pair and its metrics into the row.
    pub fn apply(
        &mut self,
        key: &str,
        pair: &PatternPair,
        summary: &MetricsSummary,
    ) -> Result<&LabelDefinition> {
        let index = self
            .position(key)
            .ok_or_else(|| TaggerError::MissingLabel(key.to_string()))?;
        let row = &mut self.rows[index];
        row.apply(pair, summary);
        Ok(row)
    }

    /// Filtered, sorted view over the committed rows.
    pub fn view(&self, options: &ViewOptions) -> Vec<&LabelDefinition> {
        let needle = options
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let mut rows: Vec<&LabelDefinition> = self
            .rows
            .iter()
            .filter(|row| match options.patterns {
                PatternFilter::All => true,
                PatternFilter::With => row.has_pattern(),
                PatternFilter::Without => !row.has_pattern(),
            })
            .filter(|row| match &needle {
                Some(needle) => {
                    row.label.to_lowercase().contains(needle)
                        || row.name.to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| compare(a, b, options.sort, options.order));
        rows
    }

    pub fn stats(&self) -> TableStats {
        let with_pattern = self.rows.iter().filter(|row| row.has_pattern()).count();
        TableStats {
            total: self.rows.len(),
            with_pattern,
            without_pattern: self.rows.len() - with_pattern,
            median_f1: median_defined(self.rows.iter().map(|r| r.f1score)),
            median_precision: median_defined(self.rows.iter().map(|r| r.precision)),
            median_recall: median_defined(self.rows.iter().map(|r| r.recall)),
        }
    }
}

fn compare(a: &LabelDefinition, b: &LabelDefinition, key: SortKey, order: SortOrder) -> Ordering {
    let directed = |ordering: Ordering| match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    };

    match key {
        SortKey::Frequency => directed(a.frequency.cmp(&b.frequency)),
        SortKey::Name => directed(a.label.to_lowercase().cmp(&b.label.to_lowercase())),
        SortKey::Metric(metric) => match (a.metric(metric), b.metric(metric)) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y)),
            // Undefined values go last whichever way the table is sorted.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Frequency,
    Name,
    Metric(Metric),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFilter {
    All,
    With,
    Without,
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub filter: Option<String>,
    pub patterns: PatternFilter,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            filter: None,
            patterns: PatternFilter::All,
            sort: SortKey::Frequency,
            order: SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableStats {
    pub total: usize,
    pub with_pattern: usize,
    pub without_pattern: usize,
    pub median_f1: Option<f64>,
    pub median_precision: Option<f64>,
    pub median_recall: Option<f64>,
}
