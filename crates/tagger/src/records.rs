use crate::corpus::{Corpus, CorpusSource};
use serde::{Deserialize, Serialize};

/// A manually labelled training record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub activities: Option<String>,
    #[serde(default)]
    pub objects: Option<String>,
    /// Set-valued labels from the tag scheme. `null` and absent mean no tags.
    #[serde(default, rename = "Tags", alias = "tags")]
    pub tags: Option<Vec<String>>,
    /// Single classification code, when the scheme is mutually exclusive.
    #[serde(default)]
    pub icnptso: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            activities: None,
            objects: None,
            tags: None,
            icnptso: None,
        }
    }

    pub fn with_activities(mut self, activities: impl Into<String>) -> Self {
        self.activities = Some(activities.into());
        self
    }

    pub fn with_objects(mut self, objects: impl Into<String>) -> Self {
        self.objects = Some(objects.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_icnptso(mut self, code: impl Into<String>) -> Self {
        self.icnptso = Some(code.into());
        self
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

impl CorpusSource for Record {
    fn name(&self) -> &str {
        &self.name
    }

    fn activities(&self) -> Option<&str> {
        self.activities.as_deref()
    }

    fn objects(&self) -> Option<&str> {
        self.objects.as_deref()
    }
}

/// The labelled records of one session with their corpus text cached.
///
/// Immutable once built: every evaluation reads the same corpus.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<Record>,
    corpus: Corpus,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        let corpus = Corpus::build(&records);
        Self { records, corpus }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }
}
