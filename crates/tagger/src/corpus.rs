//! Searchable text derived from a record's free-text fields.
//!
//! Every record contributes one string: its name followed by its activities,
//! falling back to its objects when activities are missing or blank. The text
//! is built once per record set and shared by every pattern evaluated against
//! it.

use std::ops::Index;

/// Separator placed between the name and the body text.
pub const CORPUS_SEPARATOR: &str = " ";

/// Anything that can contribute corpus text.
pub trait CorpusSource {
    fn name(&self) -> &str;
    fn activities(&self) -> Option<&str>;

    /// Fallback body used only when `activities` is absent or blank.
    fn objects(&self) -> Option<&str> {
        None
    }

    fn corpus_text(&self) -> String {
        corpus_text(self.name(), self.activities(), self.objects())
    }
}

/// Build the corpus string for a single record.
pub fn corpus_text(name: &str, activities: Option<&str>, objects: Option<&str>) -> String {
    let body = non_empty(activities).or_else(|| non_empty(objects));

    match body {
        Some(body) if name.is_empty() => body.to_string(),
        Some(body) => format!("{}{}{}", name, CORPUS_SEPARATOR, body),
        None => name.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Corpus text for a whole record set, index-aligned with the records.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    texts: Vec<String>,
}

impl Corpus {
    pub fn build<T: CorpusSource>(records: &[T]) -> Self {
        Self {
            texts: records.iter().map(CorpusSource::corpus_text).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }
}

impl Index<usize> for Corpus {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.texts[index]
    }
}

impl From<Vec<String>> for Corpus {
    fn from(texts: Vec<String>) -> Self {
        Self { texts }
    }
}
