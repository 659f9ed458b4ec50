use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dashboard figures for the current month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    /// `YYYY-MM`
    pub month: String,

    /// Sum of every budget's `spent` (each over its own window)
    pub budgeted_spent: Decimal,

    /// This month's spend in categories without a budget
    pub unbudgeted_spent: Decimal,

    pub total_budget: Decimal,

    /// `round(budgeted_spent / total_budget * 100)`, 0 without budgets
    pub utilization_pct: i64,

    /// Spend over the trailing 30 days divided by 30
    pub average_daily_spend: Decimal,

    /// This month's spend per category, largest first
    pub segments: Vec<CategorySegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySegment {
    pub category: String,
    pub amount: Decimal,
}
