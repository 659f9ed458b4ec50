use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::models::aggregate::sum_amounts;
use crate::models::budget::{BudgetRecord, Period};
use crate::models::digest::{DigestRow, WeeklyDigest};
use crate::models::expense::{ExpenseRecord, NormalizedExpense};
use crate::services::aggregation_service::AggregationService;
use crate::services::normalization_service::{DateFallback, NormalizationService};
use crate::services::summary_service::{classify, usage_percentage};
use crate::services::window_service::WindowService;

/// Builds the 7-day trailing spend report.
///
/// The window is always weekly, whatever the budgets' own periods are.
/// Rendering the digest into an email is left to the notification layer.
pub struct DigestService {
    windows: WindowService,
    normalizer: NormalizationService,
    aggregation: AggregationService,
}

impl DigestService {
    pub fn new() -> Self {
        Self {
            windows: WindowService::new(),
            normalizer: NormalizationService::new(),
            aggregation: AggregationService::new(),
        }
    }

    pub fn build(
        &self,
        budgets: &[BudgetRecord],
        expenses: &[ExpenseRecord],
        now: DateTime<Utc>,
    ) -> WeeklyDigest {
        let window = self.windows.resolve(Period::Weekly, now);

        // An unparseable `date` falls back to the creation timestamp here.
        let batch = self
            .normalizer
            .normalize_all(expenses, DateFallback::WhenMissingOrUnparseable);
        let in_window: Vec<NormalizedExpense> = batch
            .expenses
            .into_iter()
            .filter(|e| window.contains(&e.date))
            .collect();

        // Period plays no part here: a budget counts toward the budgeted
        // set with a category, toward the total with a limit, and gets a
        // row with both.
        let budgeted: HashSet<&str> = budgets.iter().filter_map(BudgetRecord::category).collect();

        let spent_by_category = self.aggregation.windowed_totals(&in_window, &window);
        let total_spent = sum_amounts(in_window.iter().map(|e| e.amount));
        let budgeted_spent = sum_amounts(
            in_window
                .iter()
                .filter(|e| budgeted.contains(e.category.as_str()))
                .map(|e| e.amount),
        );
        let total_budget = sum_amounts(budgets.iter().filter_map(|b| b.limit));

        let rows = budgets
            .iter()
            .filter_map(|budget| {
                let (Some(category), Some(limit)) = (budget.category(), budget.limit) else {
                    tracing::warn!(
                        budget_id = budget.budget_id.as_deref().unwrap_or("?"),
                        "budget without category or limit has no digest row"
                    );
                    return None;
                };
                let spent = spent_by_category.get(category);
                if spent <= Decimal::ZERO {
                    return None;
                }
                let (percentage, status) = classify(spent, Some(limit));
                Some(DigestRow {
                    category: category.to_string(),
                    spent,
                    limit,
                    percentage,
                    status,
                })
            })
            .collect();

        WeeklyDigest {
            window_start: window.start().to_string(),
            window_end: window.end().to_string(),
            total_spent,
            total_budget,
            budgeted_spent,
            unbudgeted_spent: total_spent.saturating_sub(budgeted_spent),
            utilization_pct: usage_percentage(budgeted_spent, Some(total_budget)),
            rows,
            included: in_window.len(),
            excluded: batch.excluded.len(),
        }
    }
}

impl Default for DigestService {
    fn default() -> Self {
        Self::new()
    }
}
