pub mod classify;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod labels;
pub mod population;
pub mod records;
pub mod session;
pub mod snapshot;

pub use classify::{
    evaluate, CompiledPair, ConfusionCounts, Evaluation, Matcher, MetricsSummary, Outcome,
    Partition, PatternCompiler, PatternPair, RegexCompiler, Relevance, DEFAULT_PATTERN,
};
pub use config::Config;
pub use corpus::{corpus_text, Corpus, CorpusSource};
pub use db::{CommitLog, CommitLogEntry, SqliteDatabase, UpstreamStatus};
pub use error::{Result, TaggerError};
pub use labels::{
    JsonLabelStore, LabelDefinition, LabelScheme, LabelSourceEntry, LabelStore,
    MemoryLabelStore, Metric, PatternFilter, SortKey, SortOrder, TableStats, ViewOptions,
    WorkingTable,
};
pub use population::{
    Bucket, Extrapolation, ExtrapolationRow, ExtrapolationTable, Extrapolator, IncomeBand,
    Population, PopulationRecord, UniverseCounts,
};
pub use records::{Record, RecordSet};
pub use session::{
    Commit, EvaluationMode, EvaluationRequest, EvaluationResponse, OutcomeRows, Session,
    SessionOptions,
};
