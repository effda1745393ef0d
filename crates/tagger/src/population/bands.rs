use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed income banding used to stratify the population.
///
/// Boundaries are 0 / 10k / 100k / 1M / 10M / unbounded; each band includes
/// its upper boundary, and the lowest band also includes zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeBand {
    #[serde(rename = "up_to_10k")]
    UpTo10k,
    #[serde(rename = "up_to_100k")]
    UpTo100k,
    #[serde(rename = "up_to_1m")]
    UpTo1m,
    #[serde(rename = "up_to_10m")]
    UpTo10m,
    #[serde(rename = "over_10m")]
    Over10m,
}

impl IncomeBand {
    pub const ALL: [IncomeBand; 5] = [
        IncomeBand::UpTo10k,
        IncomeBand::UpTo100k,
        IncomeBand::UpTo1m,
        IncomeBand::UpTo10m,
        IncomeBand::Over10m,
    ];

    /// Band for a reported income. Negative or non-finite incomes have none.
    pub fn from_income(income: f64) -> Option<Self> {
        if !income.is_finite() || income < 0.0 {
            return None;
        }
        let band = if income <= 10_000.0 {
            IncomeBand::UpTo10k
        } else if income <= 100_000.0 {
            IncomeBand::UpTo100k
        } else if income <= 1_000_000.0 {
            IncomeBand::UpTo1m
        } else if income <= 10_000_000.0 {
            IncomeBand::UpTo10m
        } else {
            IncomeBand::Over10m
        };
        Some(band)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeBand::UpTo10k => "up_to_10k",
            IncomeBand::UpTo100k => "up_to_100k",
            IncomeBand::UpTo1m => "up_to_1m",
            IncomeBand::UpTo10m => "up_to_10m",
            IncomeBand::Over10m => "over_10m",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        IncomeBand::ALL.into_iter().find(|b| b.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncomeBand::UpTo10k => "Under £10k",
            IncomeBand::UpTo100k => "£10k-£100k",
            IncomeBand::UpTo1m => "£100k-£1m",
            IncomeBand::UpTo10m => "£1m-£10m",
            IncomeBand::Over10m => "Over £10m",
        }
    }
}

impl fmt::Display for IncomeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
