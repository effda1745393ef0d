use crate::records::Record;
use std::collections::HashMap;

/// Ground-truth predicate: does a record carry the target label?
///
/// Chosen once per label scheme. Missing label fields are never relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    /// The record's tag set contains the label.
    LabelSet,
    /// The record's single classification field equals the label.
    Category,
}

impl Relevance {
    pub fn is_relevant(&self, record: &Record, label: &str) -> bool {
        match self {
            Relevance::LabelSet => record.tags().iter().any(|tag| tag == label),
            Relevance::Category => record.icnptso.as_deref() == Some(label),
        }
    }

    pub fn relevant(&self, records: &[Record], label: &str) -> Vec<bool> {
        records
            .iter()
            .map(|record| self.is_relevant(record, label))
            .collect()
    }

    /// Labels a record carries under this predicate.
    pub fn labels_of<'a>(&self, record: &'a Record) -> Vec<&'a str> {
        match self {
            Relevance::LabelSet => {
                let mut labels: Vec<&str> = record.tags().iter().map(String::as_str).collect();
                labels.sort_unstable();
                labels.dedup();
                labels
            }
            Relevance::Category => record.icnptso.as_deref().into_iter().collect(),
        }
    }

    /// How many records carry each label.
    pub fn frequencies(&self, records: &[Record]) -> HashMap<String, u64> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for record in records {
            for label in self.labels_of(record) {
                *counts.entry(label.to_string()).or_default() += 1;
            }
        }
        counts
    }
}
