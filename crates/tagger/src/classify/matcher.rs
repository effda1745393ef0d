use crate::classify::pattern::{CompiledPattern, PatternCompiler, PatternPair, RegexCompiler};
use crate::error::Result;
use std::ops::Range;

/// Runs include/exclude pattern pairs over corpus text.
pub struct Matcher {
    compiler: Box<dyn PatternCompiler>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(RegexCompiler::default())
    }
}

impl Matcher {
    pub fn new<C: PatternCompiler + 'static>(compiler: C) -> Self {
        Self {
            compiler: Box::new(compiler),
        }
    }

    /// Compile both sides of a pair. Either side failing is an invalid pattern.
    pub fn compile(&self, pair: &PatternPair) -> Result<CompiledPair> {
        let include = self.compiler.compile(&pair.include)?;
        let exclude = match pair.exclude() {
            Some(exclude) => Some(self.compiler.compile(exclude)?),
            None => None,
        };
        Ok(CompiledPair { include, exclude })
    }

    /// One boolean per text: included and not excluded.
    pub fn select<'a, I>(&self, texts: I, pair: &PatternPair) -> Result<Vec<bool>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let compiled = self.compile(pair)?;
        Ok(compiled.select(texts))
    }
}

/// A compiled pattern pair, reusable across record sets.
pub struct CompiledPair {
    include: Box<dyn CompiledPattern>,
    exclude: Option<Box<dyn CompiledPattern>>,
}

impl CompiledPair {
    pub fn is_selected(&self, text: &str) -> bool {
        self.include.is_match(text)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.is_match(text))
    }

    pub fn select<'a, I>(&self, texts: I) -> Vec<bool>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|text| self.is_selected(text)).collect()
    }

    /// Ranges of `text` matched by the include pattern, for display emphasis.
    pub fn highlight(&self, text: &str) -> Vec<Range<usize>> {
        self.include.find_ranges(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaggerError;

    fn select(texts: &[&str], pair: &PatternPair) -> Vec<bool> {
        Matcher::default()
            .select(texts.iter().copied(), pair)
            .unwrap()
    }

    #[test]
    fn test_case_insensitive_selection() {
        let texts = ["Food Bank", "Choir"];
        assert_eq!(select(&texts, &PatternPair::new("food")), vec![true, false]);
        assert_eq!(select(&texts, &PatternPair::new("FOOD")), vec![true, false]);
    }

    #[test]
    fn test_matches_anywhere_in_text() {
        let texts = ["The Village Food Bank Trust"];
        assert_eq!(select(&texts, &PatternPair::new("bank")), vec![true]);
    }

    #[test]
    fn test_exclusion_overrides_inclusion() {
        let texts = ["Food Bank", "Blood Bank", "Food hall"];
        let pair = PatternPair::new("bank").with_exclude("blood");
        assert_eq!(select(&texts, &pair), vec![true, false, false]);
    }

    #[test]
    fn test_invalid_exclude_is_invalid_pattern() {
        let pair = PatternPair::new("food").with_exclude("[");
        let err = Matcher::default().select(["Food"], &pair).unwrap_err();
        assert!(matches!(err, TaggerError::InvalidPattern { ref pattern, .. } if pattern == "["));
    }

    #[test]
    fn test_highlight_ranges() {
        let compiled = Matcher::default()
            .compile(&PatternPair::new("food"))
            .unwrap();
        assert_eq!(compiled.highlight("Food for FOOD banks"), vec![0..4, 9..13]);
    }

    #[test]
    fn test_custom_compiler_is_used() {
        struct Literal(String);
        impl CompiledPattern for Literal {
            fn is_match(&self, text: &str) -> bool {
                text.to_lowercase().contains(&self.0)
            }
            fn find_ranges(&self, _text: &str) -> Vec<Range<usize>> {
                Vec::new()
            }
        }
        struct LiteralCompiler;
        impl PatternCompiler for LiteralCompiler {
            fn compile(&self, pattern: &str) -> Result<Box<dyn CompiledPattern>> {
                Ok(Box::new(Literal(pattern.to_lowercase())))
            }
        }

        let matcher = Matcher::new(LiteralCompiler);
        let selected = matcher
            .select(["a (b", "c"], &PatternPair::new("("))
            .unwrap();
        assert_eq!(selected, vec![true, false]);
    }
}
