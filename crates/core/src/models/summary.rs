use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::budget::BudgetRecord;

/// Health of a budget, derived from the rounded usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// ≤ 50%
    Safe,
    /// > 50% and ≤ 80%
    Warn,
    /// > 80% and ≤ 100%
    Alert,
    /// > 100%
    Overspent,
}

impl BudgetStatus {
    /// First match wins: `> 100`, `> 80`, `> 50`, else safe.
    pub fn from_percentage(percentage: i64) -> Self {
        if percentage > 100 {
            BudgetStatus::Overspent
        } else if percentage > 80 {
            BudgetStatus::Alert
        } else if percentage > 50 {
            BudgetStatus::Warn
        } else {
            BudgetStatus::Safe
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::Safe => write!(f, "safe"),
            BudgetStatus::Warn => write!(f, "warn"),
            BudgetStatus::Alert => write!(f, "alert"),
            BudgetStatus::Overspent => write!(f, "overspent"),
        }
    }
}

/// A stored budget joined with its spend in the current window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// The budget as stored (possibly malformed)
    #[serde(flatten)]
    pub budget: BudgetRecord,

    /// Sum of matching expenses inside the budget's own window
    pub spent: Decimal,

    /// `round(spent / limit * 100)`, or 0 when the limit is unusable
    pub percentage: i64,

    pub status: BudgetStatus,
}
