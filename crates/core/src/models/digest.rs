use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::summary::BudgetStatus;

/// Weekly report over the trailing 7-day window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDigest {
    /// First day of the window (`YYYY-MM-DD`)
    pub window_start: String,

    /// Last day of the window, i.e. "today" (`YYYY-MM-DD`)
    pub window_end: String,

    /// Sum of every expense in the window
    pub total_spent: Decimal,

    /// Sum of all budget limits, spent against or not
    pub total_budget: Decimal,

    /// Window spend in categories that have a budget
    pub budgeted_spent: Decimal,

    /// Window spend in categories without a budget
    pub unbudgeted_spent: Decimal,

    /// `round(budgeted_spent / total_budget * 100)`, 0 without budgets
    pub utilization_pct: i64,

    /// One row per budget with spend in the window
    pub rows: Vec<DigestRow>,

    /// Expenses counted in the window
    pub included: usize,

    /// Expenses dropped for an unusable amount, category or date
    pub excluded: usize,
}

/// Per-budget line of the weekly digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestRow {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    pub percentage: i64,
    pub status: BudgetStatus,
}
