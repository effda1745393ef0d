use serde::{Deserialize, Serialize};

/// Where a record lands once selection is compared with ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    FalsePositive,
    FalseNegative,
    TruePositive,
    TrueNegative,
}

impl Outcome {
    /// Display order used by result listings.
    pub const ALL: [Outcome; 4] = [
        Outcome::FalsePositive,
        Outcome::FalseNegative,
        Outcome::TruePositive,
        Outcome::TrueNegative,
    ];

    pub fn classify(selected: bool, relevant: bool) -> Self {
        match (selected, relevant) {
            (true, true) => Outcome::TruePositive,
            (true, false) => Outcome::FalsePositive,
            (false, false) => Outcome::TrueNegative,
            (false, true) => Outcome::FalseNegative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::FalsePositive => "false-positive",
            Outcome::FalseNegative => "false-negative",
            Outcome::TruePositive => "true-positive",
            Outcome::TrueNegative => "true-negative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Outcome::ALL.into_iter().find(|o| o.as_str() == s)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Outcome::FalsePositive => "Records that should not have been selected but were",
            Outcome::FalseNegative => "Records that weren't selected but should have been",
            Outcome::TruePositive => "Records that were correctly selected",
            Outcome::TrueNegative => "Records that were correctly not selected",
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Outcome::TruePositive | Outcome::FalsePositive)
    }

    pub fn is_relevant(&self) -> bool {
        matches!(self, Outcome::TruePositive | Outcome::FalseNegative)
    }
}

/// Raw confusion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: u64,
    pub false_positive: u64,
    pub true_negative: u64,
    pub false_negative: u64,
}

impl ConfusionCounts {
    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn selected(&self) -> u64 {
        self.true_positive + self.false_positive
    }

    pub fn relevant(&self) -> u64 {
        self.true_positive + self.false_negative
    }

    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::TruePositive => self.true_positive,
            Outcome::FalsePositive => self.false_positive,
            Outcome::TrueNegative => self.true_negative,
            Outcome::FalseNegative => self.false_negative,
        }
    }

    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TruePositive => self.true_positive += 1,
            Outcome::FalsePositive => self.false_positive += 1,
            Outcome::TrueNegative => self.true_negative += 1,
            Outcome::FalseNegative => self.false_negative += 1,
        }
    }
}

/// One [`Outcome`] per evaluated record, index-aligned with the record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    outcomes: Vec<Outcome>,
    counts: ConfusionCounts,
}

impl Partition {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let mut counts = ConfusionCounts::default();
        let outcomes = pairs
            .into_iter()
            .map(|(selected, relevant)| {
                let outcome = Outcome::classify(selected, relevant);
                counts.add(outcome);
                outcome
            })
            .collect();
        Self { outcomes, counts }
    }

    /// Both vectors must describe the same records in the same order.
    pub fn from_vectors(selected: &[bool], relevant: &[bool]) -> Self {
        assert_eq!(
            selected.len(),
            relevant.len(),
            "selection and relevance vectors differ in length"
        );
        Self::from_pairs(selected.iter().copied().zip(relevant.iter().copied()))
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn counts(&self) -> ConfusionCounts {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Record indices that fell into `outcome`, in record order.
    pub fn indices(&self, outcome: Outcome) -> impl Iterator<Item = usize> + '_ {
        self.outcomes
            .iter()
            .enumerate()
            .filter(move |(_, o)| **o == outcome)
            .map(|(i, _)| i)
    }
}
