//! The external label store: where label definitions and their persisted
//! patterns come from, and where committed patterns are pushed back to.

use crate::classify::PatternPair;
use crate::error::{Result, TaggerError};
use crate::labels::LabelScheme;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A label definition as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSourceEntry {
    pub id: String,
    #[serde(alias = "Name", alias = "Code", alias = "tag")]
    pub label: String,
    #[serde(default, alias = "Title")]
    pub title: Option<String>,
    #[serde(default, alias = "Category")]
    pub category: Option<String>,
    #[serde(default, alias = "Subcategory")]
    pub subcategory: Option<String>,
    #[serde(default, alias = "Not used")]
    pub not_used: bool,
    #[serde(default, alias = "Regular expression")]
    pub include_pattern: Option<String>,
    #[serde(default, alias = "Exclude regular expression")]
    pub exclude_pattern: Option<String>,
}

impl LabelSourceEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            title: None,
            category: None,
            subcategory: None,
            not_used: false,
            include_pattern: None,
            exclude_pattern: None,
        }
    }

    pub fn with_patterns(mut self, include: &str, exclude: Option<&str>) -> Self {
        self.include_pattern = Some(include.to_string());
        self.exclude_pattern = exclude.map(str::to_string);
        self
    }
}

/// Column names for the pattern pair, preferred name first.
const INCLUDE_COLUMNS: [&str; 2] = ["Regular expression", "include_pattern"];
const EXCLUDE_COLUMNS: [&str; 2] = ["Exclude regular expression", "exclude_pattern"];

pub trait LabelStore {
    fn fetch(&self, scheme: LabelScheme) -> Result<Vec<LabelSourceEntry>>;
    fn update(&mut self, scheme: LabelScheme, id: &str, pair: &PatternPair) -> Result<()>;
}

/// One JSON array of [`LabelSourceEntry`] per scheme.
#[derive(Debug, Clone, Default)]
pub struct JsonLabelStore {
    paths: HashMap<LabelScheme, PathBuf>,
}

impl JsonLabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path<P: Into<PathBuf>>(mut self, scheme: LabelScheme, path: P) -> Self {
        self.paths.insert(scheme, path.into());
        self
    }

    fn path(&self, scheme: LabelScheme) -> Result<&Path> {
        self.paths
            .get(&scheme)
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                TaggerError::Config(format!("No label store configured for {}", scheme.as_str()))
            })
    }

    fn read(path: &Path) -> Result<Vec<LabelSourceEntry>> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| TaggerError::Snapshot {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl LabelStore for JsonLabelStore {
    fn fetch(&self, scheme: LabelScheme) -> Result<Vec<LabelSourceEntry>> {
        Self::read(self.path(scheme)?)
    }

    /// Rewrites only the pattern columns of the matching entry. Every other
    /// column, known or not, is written back as read.
    fn update(&mut self, scheme: LabelScheme, id: &str, pair: &PatternPair) -> Result<()> {
        let path = self.path(scheme)?.to_path_buf();
        let upstream = |message: String| TaggerError::UpstreamWrite {
            id: id.to_string(),
            message,
        };

        let content = std::fs::read_to_string(&path).map_err(|e| upstream(e.to_string()))?;
        let mut entries: Vec<Map<String, Value>> =
            serde_json::from_str(&content).map_err(|e| upstream(e.to_string()))?;
        let entry = entries
            .iter_mut()
            .find(|e| e.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| upstream("no such record".to_string()))?;
        set_column(entry, &INCLUDE_COLUMNS, Some(&pair.include));
        set_column(entry, &EXCLUDE_COLUMNS, pair.exclude());

        let json = serde_json::to_string_pretty(&entries).map_err(|e| upstream(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| upstream(e.to_string()))?;
        Ok(())
    }
}

/// Write `value` under whichever of `columns` the entry already uses.
fn set_column(entry: &mut Map<String, Value>, columns: &[&str], value: Option<&str>) {
    let existing = columns.iter().find(|c| entry.contains_key(**c)).copied();
    match (existing, value) {
        (Some(key), value) => {
            let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
            entry.insert(key.to_string(), value);
        }
        (None, Some(value)) => {
            entry.insert(columns[0].to_string(), Value::String(value.to_string()));
        }
        (None, None) => {}
    }
}

/// In-process store, handy when no store file is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryLabelStore {
    entries: HashMap<LabelScheme, Vec<LabelSourceEntry>>,
    /// Every successful update, in order.
    pub updates: Vec<(LabelScheme, String, PatternPair)>,
    /// When set, every update fails.
    pub fail_updates: bool,
}

impl MemoryLabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, scheme: LabelScheme, entries: Vec<LabelSourceEntry>) -> Self {
        self.entries.insert(scheme, entries);
        self
    }

    pub fn entries(&self, scheme: LabelScheme) -> &[LabelSourceEntry] {
        self.entries.get(&scheme).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl LabelStore for MemoryLabelStore {
    fn fetch(&self, scheme: LabelScheme) -> Result<Vec<LabelSourceEntry>> {
        Ok(self.entries(scheme).to_vec())
    }

    fn update(&mut self, scheme: LabelScheme, id: &str, pair: &PatternPair) -> Result<()> {
        if self.fail_updates {
            return Err(TaggerError::UpstreamWrite {
                id: id.to_string(),
                message: "store unavailable".to_string(),
            });
        }

        let entry = self
            .entries
            .get_mut(&scheme)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
            .ok_or_else(|| TaggerError::UpstreamWrite {
                id: id.to_string(),
                message: "no such record".to_string(),
            })?;
        entry.include_pattern = Some(pair.include.clone());
        entry.exclude_pattern = pair.exclude().map(str::to_string);

        self.updates.push((scheme, id.to_string(), pair.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "rec1", "Name": "Food", "Category": "Poverty"},
                {"id": "rec2", "Name": "Old", "Not used": true}
            ]"#,
        )
        .unwrap();

        let mut store = JsonLabelStore::new().with_path(LabelScheme::Tags, &path);
        let entries = store.fetch(LabelScheme::Tags).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Food");
        assert_eq!(entries[0].category.as_deref(), Some("Poverty"));
        assert!(entries[1].not_used);

        store
            .update(LabelScheme::Tags, "rec1", &PatternPair::new("food").with_exclude("dog"))
            .unwrap();
        let entries = store.fetch(LabelScheme::Tags).unwrap();
        assert_eq!(entries[0].include_pattern.as_deref(), Some("food"));
        assert_eq!(entries[0].exclude_pattern.as_deref(), Some("dog"));
    }

    #[test]
    fn test_json_store_update_keeps_other_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "rec1", "Name": "Food", "Description": "keep me",
                 "Exclude regular expression": "cat"},
                {"id": "rec2", "Name": "Music", "Owner": "sam", "include_pattern": "choir"}
            ]"#,
        )
        .unwrap();

        let mut store = JsonLabelStore::new().with_path(LabelScheme::Tags, &path);
        store
            .update(LabelScheme::Tags, "rec1", &PatternPair::new("food"))
            .unwrap();
        store
            .update(LabelScheme::Tags, "rec2", &PatternPair::new("band").with_exclude("brass"))
            .unwrap();

        let written: Vec<Map<String, Value>> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["Name"], "Food");
        assert_eq!(written[0]["Description"], "keep me");
        assert_eq!(written[0]["Regular expression"], "food");
        assert_eq!(written[0]["Exclude regular expression"], Value::Null);
        assert!(!written[0].contains_key("label"));
        assert!(!written[0].contains_key("include_pattern"));

        assert_eq!(written[1]["Owner"], "sam");
        assert_eq!(written[1]["include_pattern"], "band");
        assert_eq!(written[1]["Exclude regular expression"], "brass");
        assert!(!written[1].contains_key("Regular expression"));

        let entries = store.fetch(LabelScheme::Tags).unwrap();
        assert_eq!(entries[0].include_pattern.as_deref(), Some("food"));
        assert_eq!(entries[0].exclude_pattern, None);
        assert_eq!(entries[1].exclude_pattern.as_deref(), Some("brass"));
    }

    #[test]
    fn test_json_store_unknown_id_is_upstream_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.json");
        std::fs::write(&path, r#"[{"id": "rec1", "Code": "A11"}]"#).unwrap();

        let mut store = JsonLabelStore::new().with_path(LabelScheme::Icnptso, &path);
        let err = store
            .update(LabelScheme::Icnptso, "missing", &PatternPair::new("art"))
            .unwrap_err();
        assert!(matches!(err, TaggerError::UpstreamWrite { .. }));
    }

    #[test]
    fn test_unconfigured_scheme_is_config_error() {
        let store = JsonLabelStore::new();
        assert!(matches!(
            store.fetch(LabelScheme::Tags).unwrap_err(),
            TaggerError::Config(_)
        ));
    }
}
