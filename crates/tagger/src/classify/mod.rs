pub mod evaluate;
pub mod matcher;
pub mod metrics;
pub mod partition;
pub mod pattern;
pub mod relevance;

pub use evaluate::{evaluate, Evaluation};
pub use matcher::{CompiledPair, Matcher};
pub use metrics::{median_defined, MetricsSummary};
pub use partition::{ConfusionCounts, Outcome, Partition};
pub use pattern::{
    is_placeholder, CompiledPattern, PatternCompiler, PatternPair, RegexCompiler, DEFAULT_PATTERN,
};
pub use relevance::Relevance;
