pub mod definition;
pub mod store;
pub mod table;

pub use definition::{LabelDefinition, Metric};
pub use store::{JsonLabelStore, LabelSourceEntry, LabelStore, MemoryLabelStore};
pub use table::{PatternFilter, SortKey, SortOrder, TableStats, ViewOptions, WorkingTable};

use crate::classify::Relevance;
use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};

/// The two independent labelling schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelScheme {
    /// Hierarchical tags; a record carries any number of them.
    Tags,
    /// Flat classification codes; a record carries at most one.
    Icnptso,
}

impl LabelScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelScheme::Tags => "tags",
            LabelScheme::Icnptso => "icnptso",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "tags" => Ok(LabelScheme::Tags),
            "icnptso" => Ok(LabelScheme::Icnptso),
            _ => Err(TaggerError::Config(format!("Invalid label scheme: {}", s))),
        }
    }

    pub fn relevance(&self) -> Relevance {
        match self {
            LabelScheme::Tags => Relevance::LabelSet,
            LabelScheme::Icnptso => Relevance::Category,
        }
    }
}

/// URL-safe form of a label name: lowercase alphanumerics joined by hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c != '\'' {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Food & Nutrition"), "food-nutrition");
        assert_eq!(slugify("  Children's Services "), "childrens-services");
        assert_eq!(slugify("A.1.2"), "a-1-2");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_scheme_round_trip() {
        for scheme in [LabelScheme::Tags, LabelScheme::Icnptso] {
            assert_eq!(LabelScheme::from_str(scheme.as_str()).unwrap(), scheme);
        }
        assert!(LabelScheme::from_str("colours").is_err());
    }

    #[test]
    fn test_scheme_relevance() {
        assert_eq!(LabelScheme::Tags.relevance(), Relevance::LabelSet);
        assert_eq!(LabelScheme::Icnptso.relevance(), Relevance::Category);
    }
}
