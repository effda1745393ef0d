use crate::classify::{Matcher, MetricsSummary, Partition, PatternPair, Relevance};
use crate::error::Result;
use crate::records::RecordSet;

/// Result of scoring one pattern pair for one label.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub label: String,
    pub pair: PatternPair,
    pub partition: Partition,
    pub summary: MetricsSummary,
}

/// Matcher, partitioner and metrics in one pass.
///
/// Only pattern compilation can fail; everything after it is total.
pub fn evaluate(
    matcher: &Matcher,
    records: &RecordSet,
    relevance: Relevance,
    label: &str,
    pair: &PatternPair,
) -> Result<Evaluation> {
    let selected = matcher.select(records.corpus().iter(), pair)?;
    let relevant = relevance.relevant(records.records(), label);
    let partition = Partition::from_vectors(&selected, &relevant);
    let summary = MetricsSummary::from_partition(&partition);

    Ok(Evaluation {
        label: label.to_string(),
        pair: pair.clone(),
        partition,
        summary,
    })
}
