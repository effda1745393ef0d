use crate::classify::{is_placeholder, MetricsSummary, PatternPair};
use crate::labels::store::LabelSourceEntry;
use crate::labels::{slugify, LabelScheme};
use serde::{Deserialize, Serialize};

/// One row of the working table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDefinition {
    /// Identifier of the row in the label store.
    pub id: String,
    /// Label value as it appears on records.
    pub label: String,
    /// Human-readable name.
    pub name: String,
    pub slug: String,
    pub frequency: u64,
    pub include_pattern: Option<String>,
    pub exclude_pattern: Option<String>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1score: Option<f64>,
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Precision,
    Recall,
    F1,
    Accuracy,
}

impl LabelDefinition {
    pub fn from_entry(entry: &LabelSourceEntry, scheme: LabelScheme, frequency: u64) -> Self {
        Self {
            id: entry.id.clone(),
            label: entry.label.clone(),
            name: display_name(entry, scheme),
            slug: slugify(&entry.label),
            frequency,
            include_pattern: entry.include_pattern.clone().filter(|p| !is_placeholder(p)),
            exclude_pattern: entry.exclude_pattern.clone().filter(|p| !p.trim().is_empty()),
            precision: None,
            recall: None,
            f1score: None,
            accuracy: None,
        }
    }

    /// The stored pattern pair, if an include pattern has been written.
    pub fn pattern_pair(&self) -> Option<PatternPair> {
        let include = self.include_pattern.as_deref().filter(|p| !is_placeholder(p))?;
        Some(PatternPair::from_parts(include, self.exclude_pattern.clone()))
    }

    pub fn has_pattern(&self) -> bool {
        self.pattern_pair().is_some()
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1 => self.f1score,
            Metric::Accuracy => self.accuracy,
        }
    }

    /// Record a successful evaluation on this row.
    pub fn apply(&mut self, pair: &PatternPair, summary: &MetricsSummary) {
        self.include_pattern = Some(pair.include.clone());
        self.exclude_pattern = pair.exclude().map(str::to_string);
        self.precision = summary.precision;
        self.recall = summary.recall;
        self.f1score = summary.f1score;
        self.accuracy = summary.accuracy;
    }
}

/// Tags read "Category - Subcategory - Tag", skipping parts that repeat the
/// tag; classification codes read "Code: Title".
fn display_name(entry: &LabelSourceEntry, scheme: LabelScheme) -> String {
    match scheme {
        LabelScheme::Tags => {
            let Some(category) = entry.category.as_deref().filter(|c| !c.is_empty()) else {
                return entry.label.clone();
            };
            let tag = entry.label.to_lowercase();
            let mut parts = vec![category];
            if let Some(sub) = entry.subcategory.as_deref().filter(|s| !s.is_empty()) {
                if sub.to_lowercase() != tag {
                    parts.push(sub);
                }
            }
            if category.to_lowercase() != tag {
                parts.push(&entry.label);
            }
            parts.join(" - ")
        }
        LabelScheme::Icnptso => match entry.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("{}: {}", entry.label, title),
            None => entry.label.clone(),
        },
    }
}
