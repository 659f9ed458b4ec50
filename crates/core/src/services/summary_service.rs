use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::models::budget::{BudgetRecord, Period};
use crate::models::expense::{ExpenseRecord, NormalizedExpense};
use crate::models::summary::{BudgetStatus, BudgetSummary};
use crate::models::window::DateWindow;
use crate::services::aggregation_service::AggregationService;
use crate::services::normalization_service::{DateFallback, NormalizationService};
use crate::services::window_service::WindowService;

/// `round(spent / limit * 100)`, half away from zero.
///
/// A missing, zero or negative limit yields 0. Results beyond `i64`
/// saturate.
pub fn usage_percentage(spent: Decimal, limit: Option<Decimal>) -> i64 {
    let Some(limit) = limit.filter(|l| *l > Decimal::ZERO) else {
        return 0;
    };

    spent
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(limit))
        .map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .unwrap_or(if spent.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// Percentage and status of a spend/limit pair.
pub fn classify(spent: Decimal, limit: Option<Decimal>) -> (i64, BudgetStatus) {
    let percentage = usage_percentage(spent, limit);
    (percentage, BudgetStatus::from_percentage(percentage))
}

/// Joins budgets with their current-window spend.
///
/// Each budget is evaluated over the window of its own period, so a weekly
/// and a monthly budget summarized together use different windows.
pub struct SummaryService {
    windows: WindowService,
    normalizer: NormalizationService,
    aggregation: AggregationService,
}

impl SummaryService {
    pub fn new() -> Self {
        Self {
            windows: WindowService::new(),
            normalizer: NormalizationService::new(),
            aggregation: AggregationService::new(),
        }
    }

    /// Summaries in the same order as `budgets`.
    ///
    /// A budget without a category or period gets `spent = 0` instead of
    /// failing the whole summary.
    pub fn summarize(
        &self,
        budgets: &[BudgetRecord],
        expenses: &[ExpenseRecord],
        now: DateTime<Utc>,
    ) -> Vec<BudgetSummary> {
        let batch = self.normalizer.normalize_all(expenses, DateFallback::WhenMissing);
        let mut resolved: HashMap<Period, DateWindow> = HashMap::new();

        budgets
            .iter()
            .map(|budget| {
                let spent = match (budget.category(), budget.period) {
                    (Some(category), Some(period)) => {
                        let window = resolved
                            .entry(period)
                            .or_insert_with(|| self.windows.resolve(period, now));
                        self.spent_in(&batch.expenses, window, category)
                    }
                    _ => {
                        tracing::warn!(
                            budget_id = budget.budget_id.as_deref().unwrap_or("?"),
                            "budget has no category or period; spent defaults to 0"
                        );
                        Decimal::ZERO
                    }
                };

                let (percentage, status) = classify(spent, budget.limit);
                BudgetSummary {
                    budget: budget.clone(),
                    spent,
                    percentage,
                    status,
                }
            })
            .collect()
    }

    fn spent_in(&self, expenses: &[NormalizedExpense], window: &DateWindow, category: &str) -> Decimal {
        self.aggregation.windowed_total(expenses, window, category).total
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}
