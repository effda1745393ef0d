//! One analyst session: the loaded snapshots, the label store, and the
//! evaluate-then-commit loop over a working table.

use crate::classify::{evaluate, Evaluation, Matcher, MetricsSummary, Outcome, PatternPair};
use crate::db::{snapshots, CommitLog, CommitLogEntry, SqliteDatabase, UpstreamStatus};
use crate::error::{Result, TaggerError};
use crate::labels::{LabelScheme, LabelStore, WorkingTable};
use crate::population::{Extrapolation, Extrapolator, Population, UniverseCounts};
use crate::population::extrapolate::DEFAULT_SAMPLE_SIZE;
use crate::records::RecordSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROWS_PER_OUTCOME: usize = 10;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Push committed patterns to the label store.
    pub save_enabled: bool,
    /// Matched population records returned for display.
    pub sample_size: usize,
    /// Record indices returned per outcome in sample mode.
    pub rows_per_outcome: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            save_enabled: false,
            sample_size: DEFAULT_SAMPLE_SIZE,
            rows_per_outcome: DEFAULT_ROWS_PER_OUTCOME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    #[default]
    Sample,
    Population,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub label: String,
    pub include: String,
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default)]
    pub mode: EvaluationMode,
    #[serde(default = "default_commit")]
    pub commit: bool,
}

fn default_commit() -> bool {
    true
}

impl EvaluationRequest {
    pub fn new(label: impl Into<String>, include: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            include: include.into(),
            exclude: None,
            mode: EvaluationMode::Sample,
            commit: true,
        }
    }

    pub fn pattern_pair(&self) -> PatternPair {
        PatternPair::from_parts(self.include.clone(), self.exclude.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRows {
    pub outcome: Outcome,
    pub count: u64,
    /// Indices into the record set, in record order.
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum EvaluationResponse {
    Sample {
        summary: MetricsSummary,
        rows_by_outcome: Vec<OutcomeRows>,
    },
    Population {
        summary: MetricsSummary,
        extrapolation: Extrapolation,
    },
}

impl EvaluationResponse {
    pub fn summary(&self) -> &MetricsSummary {
        match self {
            EvaluationResponse::Sample { summary, .. } => summary,
            EvaluationResponse::Population { summary, .. } => summary,
        }
    }
}

/// What a successful commit did.
#[derive(Debug, Clone)]
pub struct Commit {
    pub evaluation: Evaluation,
    pub upstream: UpstreamStatus,
}

pub struct Session<S: LabelStore> {
    records: RecordSet,
    matcher: Matcher,
    store: S,
    options: SessionOptions,
    population: Option<(Population, UniverseCounts)>,
    db: Option<SqliteDatabase>,
}

impl<S: LabelStore> Session<S> {
    pub fn new(records: RecordSet, store: S, options: SessionOptions) -> Self {
        Self {
            records,
            matcher: Matcher::default(),
            store,
            options,
            population: None,
            db: None,
        }
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_population(mut self, population: Population, universe: UniverseCounts) -> Self {
        self.population = Some((population, universe));
        self
    }

    /// Flush the working table and log commits to this database.
    pub fn with_snapshots(mut self, db: SqliteDatabase) -> Self {
        self.db = Some(db);
        self
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref().map(|(population, _)| population)
    }

    /// Fetch the scheme's labels from the store and score them.
    pub fn initialize(&mut self, scheme: LabelScheme) -> Result<WorkingTable> {
        let entries = self.store.fetch(scheme)?;
        let table = WorkingTable::initialize(scheme, entries, &self.records, &self.matcher);
        self.flush(&table);
        Ok(table)
    }

    /// Score a pattern pair for a row without touching the table.
    pub fn evaluate(
        &self,
        table: &WorkingTable,
        label: &str,
        pair: &PatternPair,
    ) -> Result<Evaluation> {
        let row = table
            .get(label)
            .ok_or_else(|| TaggerError::MissingLabel(label.to_string()))?;
        evaluate(
            &self.matcher,
            &self.records,
            table.scheme().relevance(),
            &row.label,
            pair,
        )
    }

    /// Evaluate and, on success, write the pair and its metrics into the row.
    ///
    /// The label store push and the snapshot flush happen afterwards; their
    /// failures are logged and never undo the in-memory commit.
    pub fn commit(
        &mut self,
        table: &mut WorkingTable,
        label: &str,
        pair: &PatternPair,
    ) -> Result<Commit> {
        let evaluation = self.evaluate(table, label, pair)?;
        let row = table.apply(&evaluation.label, pair, &evaluation.summary)?;
        let id = row.id.clone();

        log::info!(
            "Committed '{}' for {} {} (f1 {:?})",
            pair.include,
            table.scheme().as_str(),
            evaluation.label,
            evaluation.summary.f1score
        );

        let upstream = self.push_upstream(table.scheme(), &id, pair);
        self.flush(table);
        self.log_commit(table.scheme(), &evaluation, upstream);

        Ok(Commit { evaluation, upstream })
    }

    fn push_upstream(
        &mut self,
        scheme: LabelScheme,
        id: &str,
        pair: &PatternPair,
    ) -> UpstreamStatus {
        if pair.is_placeholder() {
            log::debug!("Not saving placeholder pattern for {}", id);
            return UpstreamStatus::Placeholder;
        }
        if !self.options.save_enabled {
            log::debug!("Saving disabled, {} kept in memory only", id);
            return UpstreamStatus::Disabled;
        }

        match self.store.update(scheme, id, pair) {
            Ok(()) => UpstreamStatus::Saved,
            Err(e) => {
                log::warn!("{}", e);
                UpstreamStatus::Failed
            }
        }
    }

    fn flush(&mut self, table: &WorkingTable) {
        if let Some(db) = self.db.as_mut() {
            if let Err(e) = snapshots::save_working_table(db.conn_mut(), table) {
                log::warn!("Failed to flush {} snapshot: {}", table.scheme().as_str(), e);
            }
        }
    }

    fn log_commit(
        &mut self,
        scheme: LabelScheme,
        evaluation: &Evaluation,
        upstream: UpstreamStatus,
    ) {
        if let Some(db) = self.db.as_mut() {
            let entry = CommitLogEntry::from_evaluation(scheme, evaluation, upstream);
            if let Err(e) = db.log_commit(&entry) {
                log::warn!("Failed to log commit for {}: {}", evaluation.label, e);
            }
        }
    }

    /// Run one evaluation request end to end.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        table: &mut WorkingTable,
        request: &EvaluationRequest,
        rng: &mut R,
    ) -> Result<EvaluationResponse> {
        let pair = request.pattern_pair();

        if request.mode == EvaluationMode::Population && self.population.is_none() {
            return Err(TaggerError::Config(
                "No population snapshot loaded".to_string(),
            ));
        }

        let evaluation = if request.commit {
            self.commit(table, &request.label, &pair)?.evaluation
        } else {
            self.evaluate(table, &request.label, &pair)?
        };

        match request.mode {
            EvaluationMode::Sample => {
                let rows_by_outcome = Outcome::ALL
                    .into_iter()
                    .map(|outcome| OutcomeRows {
                        outcome,
                        count: evaluation.summary.count(outcome),
                        indices: evaluation
                            .partition
                            .indices(outcome)
                            .take(self.options.rows_per_outcome)
                            .collect(),
                    })
                    .collect();

                Ok(EvaluationResponse::Sample {
                    summary: evaluation.summary,
                    rows_by_outcome,
                })
            }
            EvaluationMode::Population => {
                let (population, universe) = self.population.as_ref().ok_or_else(|| {
                    TaggerError::Config("No population snapshot loaded".to_string())
                })?;
                let extrapolation = Extrapolator::new(self.options.sample_size).extrapolate(
                    &self.matcher,
                    &pair,
                    population,
                    universe,
                    rng,
                )?;

                Ok(EvaluationResponse::Population {
                    summary: evaluation.summary,
                    extrapolation,
                })
            }
        }
    }
}
