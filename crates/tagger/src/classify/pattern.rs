//! Pattern compilation behind a narrow trait so the regex engine can be swapped.
//!
//! The default compiler uses the `regex` crate, which guarantees linear-time
//! matching. Oversized patterns are rejected at compile time through a length
//! cap and the engine's compiled-size limits, so a pathological expression is
//! reported as an invalid pattern instead of stalling an evaluation.

use crate::error::{Result, TaggerError};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Placeholder shown before a pattern has been written. Never pushed upstream.
pub const DEFAULT_PATTERN: &str = r"\b()\b";

pub const MAX_PATTERN_LEN: usize = 4096;
pub const DEFAULT_SIZE_LIMIT: usize = 2 * (1 << 20);
pub const DEFAULT_DFA_SIZE_LIMIT: usize = 4 * (1 << 20);

/// A compiled expression that can be run against corpus text.
pub trait CompiledPattern: Send + Sync {
    fn is_match(&self, text: &str) -> bool;

    /// Byte ranges of every non-overlapping match, in order.
    fn find_ranges(&self, text: &str) -> Vec<Range<usize>>;
}

/// Turns pattern source into a [`CompiledPattern`].
///
/// Implementations must match case-insensitively and anywhere in the text.
pub trait PatternCompiler: Send + Sync {
    fn compile(&self, pattern: &str) -> Result<Box<dyn CompiledPattern>>;
}

impl CompiledPattern for Regex {
    fn is_match(&self, text: &str) -> bool {
        Regex::is_match(self, text)
    }

    fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        self.find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| m.range())
            .collect()
    }
}

/// Default compiler backed by the `regex` crate.
#[derive(Debug, Clone)]
pub struct RegexCompiler {
    pub max_pattern_len: usize,
    pub size_limit: usize,
    pub dfa_size_limit: usize,
}

impl Default for RegexCompiler {
    fn default() -> Self {
        Self {
            max_pattern_len: MAX_PATTERN_LEN,
            size_limit: DEFAULT_SIZE_LIMIT,
            dfa_size_limit: DEFAULT_DFA_SIZE_LIMIT,
        }
    }
}

impl PatternCompiler for RegexCompiler {
    fn compile(&self, pattern: &str) -> Result<Box<dyn CompiledPattern>> {
        if pattern.len() > self.max_pattern_len {
            return Err(TaggerError::invalid_pattern(
                pattern,
                format!(
                    "pattern is {} bytes, the limit is {}",
                    pattern.len(),
                    self.max_pattern_len
                ),
            ));
        }

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(self.size_limit)
            .dfa_size_limit(self.dfa_size_limit)
            .build()
            .map_err(|e| TaggerError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Box::new(regex))
    }
}

/// Include expression plus optional exclude expression for one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPair {
    pub include: String,
    #[serde(default)]
    pub exclude: Option<String>,
}

impl PatternPair {
    pub fn new(include: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            exclude: None,
        }
    }

    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    /// Build from optional parts, treating a blank exclude as absent.
    pub fn from_parts(include: impl Into<String>, exclude: Option<String>) -> Self {
        Self {
            include: include.into(),
            exclude: exclude.filter(|e| !e.trim().is_empty()),
        }
    }

    /// The exclude pattern, if one is actually set.
    pub fn exclude(&self) -> Option<&str> {
        self.exclude.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// True when the include side is still the empty-state placeholder.
    pub fn is_placeholder(&self) -> bool {
        is_placeholder(&self.include)
    }
}

pub fn is_placeholder(pattern: &str) -> bool {
    pattern.trim().is_empty() || pattern == DEFAULT_PATTERN
}
