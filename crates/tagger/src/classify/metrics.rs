//! Precision, recall, F1 and accuracy over a confusion partition.
//!
//! A ratio with no data behind it is `None`, never `0.0` and never NaN:
//!
//! - precision is `None` when nothing was selected (TP + FP = 0);
//! - recall is `None` when nothing is relevant (TP + FN = 0);
//! - F1 is `None` when either input is `None`, or when both are zero;
//! - accuracy is `None` for an empty partition.
//!
//! Aggregates across labels (see [`median_defined`]) skip `None` values.

use crate::classify::partition::{ConfusionCounts, Outcome, Partition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub relevant: u64,
    pub selected: u64,
    pub counts: ConfusionCounts,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1score: Option<f64>,
    pub accuracy: Option<f64>,
}

impl MetricsSummary {
    pub fn from_partition(partition: &Partition) -> Self {
        Self::from_counts(partition.counts())
    }

    pub fn from_counts(counts: ConfusionCounts) -> Self {
        let tp = counts.true_positive;
        let precision = ratio(tp, counts.true_positive + counts.false_positive);
        let recall = ratio(tp, counts.true_positive + counts.false_negative);
        let f1score = f1(precision, recall);
        let accuracy = ratio(counts.true_positive + counts.true_negative, counts.total());

        Self {
            relevant: counts.relevant(),
            selected: counts.selected(),
            counts,
            precision,
            recall,
            f1score,
            accuracy,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.total()
    }

    pub fn count(&self, outcome: Outcome) -> u64 {
        self.counts.get(outcome)
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

fn f1(precision: Option<f64>, recall: Option<f64>) -> Option<f64> {
    let (p, r) = (precision?, recall?);
    if p + r == 0.0 {
        return None;
    }
    Some(2.0 * p * r / (p + r))
}

/// Median of the defined values, `None` when there are none.
pub fn median_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut defined: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
    if defined.is_empty() {
        return None;
    }
    defined.sort_by(f64::total_cmp);

    let mid = defined.len() / 2;
    if defined.len() % 2 == 0 {
        Some((defined[mid - 1] + defined[mid]) / 2.0)
    } else {
        Some(defined[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts(tp: u64, fp: u64, tn: u64, fn_: u64) -> ConfusionCounts {
        ConfusionCounts {
            true_positive: tp,
            false_positive: fp,
            true_negative: tn,
            false_negative: fn_,
        }
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("metric should be defined");
        assert!((actual - expected).abs() < 1e-12, "{} != {}", actual, expected);
    }

    #[test]
    fn test_reference_partition() {
        let summary = MetricsSummary::from_counts(counts(8, 2, 88, 2));
        assert_close(summary.precision, 0.8);
        assert_close(summary.recall, 0.8);
        assert_close(summary.f1score, 0.8);
        assert_close(summary.accuracy, 0.96);
        assert_eq!(summary.relevant, 10);
        assert_eq!(summary.selected, 10);
        assert_eq!(summary.total(), 100);
    }

    #[test]
    fn test_nothing_selected_leaves_precision_undefined() {
        let summary = MetricsSummary::from_counts(counts(0, 0, 90, 10));
        assert_eq!(summary.precision, None);
        assert_close(summary.recall, 0.0);
        assert_eq!(summary.f1score, None);
        assert_close(summary.accuracy, 0.9);
    }

    #[test]
    fn test_nothing_relevant_leaves_recall_undefined() {
        let summary = MetricsSummary::from_counts(counts(0, 5, 95, 0));
        assert_close(summary.precision, 0.0);
        assert_eq!(summary.recall, None);
        assert_eq!(summary.f1score, None);
    }

    #[test]
    fn test_both_zero_leaves_f1_undefined() {
        let summary = MetricsSummary::from_counts(counts(0, 3, 10, 4));
        assert_close(summary.precision, 0.0);
        assert_close(summary.recall, 0.0);
        assert_eq!(summary.f1score, None);
    }

    #[test]
    fn test_empty_partition() {
        let summary = MetricsSummary::from_partition(&Partition::default());
        assert_eq!(summary.precision, None);
        assert_eq!(summary.recall, None);
        assert_eq!(summary.f1score, None);
        assert_eq!(summary.accuracy, None);
    }

    #[test]
    fn test_median_skips_undefined() {
        assert_eq!(median_defined([None, Some(0.2), None, Some(0.6), Some(0.4)]), Some(0.4));
        assert_eq!(median_defined([Some(0.2), Some(0.6)]), Some(0.4));
        assert_eq!(median_defined([None, None]), None);
        assert_eq!(median_defined(Vec::<Option<f64>>::new()), None);
    }

    proptest! {
        #[test]
        fn prop_ratios_are_bounded_or_undefined(
            tp in 0u64..500, fp in 0u64..500, tn in 0u64..500, fn_ in 0u64..500
        ) {
            let summary = MetricsSummary::from_counts(counts(tp, fp, tn, fn_));

            prop_assert_eq!(summary.precision.is_none(), tp + fp == 0);
            prop_assert_eq!(summary.recall.is_none(), tp + fn_ == 0);
            prop_assert_eq!(summary.accuracy.is_none(), tp + fp + tn + fn_ == 0);
            if summary.precision.is_none() || summary.recall.is_none() {
                prop_assert!(summary.f1score.is_none());
            }

            for value in [summary.precision, summary.recall, summary.f1score, summary.accuracy]
                .into_iter()
                .flatten()
            {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
