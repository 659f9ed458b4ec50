use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::models::aggregate::sum_amounts;
use crate::models::budget::BudgetRecord;
use crate::models::expense::ExpenseRecord;
use crate::models::overview::{CategorySegment, DashboardOverview};
use crate::models::window::DateWindow;
use crate::services::aggregation_service::AggregationService;
use crate::services::normalization_service::{DateFallback, NormalizationService};
use crate::services::summary_service::{usage_percentage, SummaryService};
use crate::services::window_service::WindowService;

/// Days averaged over for the daily spend figure.
pub const AVERAGE_WINDOW_DAYS: u64 = 30;

/// Computes the month-level dashboard figures.
pub struct OverviewService {
    windows: WindowService,
    normalizer: NormalizationService,
    aggregation: AggregationService,
    summaries: SummaryService,
}

impl OverviewService {
    pub fn new() -> Self {
        Self {
            windows: WindowService::new(),
            normalizer: NormalizationService::new(),
            aggregation: AggregationService::new(),
            summaries: SummaryService::new(),
        }
    }

    pub fn build(
        &self,
        budgets: &[BudgetRecord],
        expenses: &[ExpenseRecord],
        now: DateTime<Utc>,
    ) -> DashboardOverview {
        let month = self.windows.month_of(now);
        let trailing = self.windows.trailing_days(AVERAGE_WINDOW_DAYS, now);
        let batch = self.normalizer.normalize_all(expenses, DateFallback::WhenMissing);

        let budgeted_spent = sum_amounts(
            self.summaries
                .summarize(budgets, expenses, now)
                .iter()
                .map(|s| s.spent),
        );
        let total_budget = sum_amounts(budgets.iter().filter_map(|b| b.limit));

        let budgeted: HashSet<&str> = budgets.iter().filter_map(BudgetRecord::category).collect();
        let month_totals = self.aggregation.windowed_totals(&batch.expenses, &month);
        let unbudgeted_spent = sum_amounts(
            month_totals
                .by_category
                .iter()
                .filter(|(category, _)| !budgeted.contains(category.as_str()))
                .map(|(_, amount)| *amount),
        );

        let trailing_total = self.aggregation.windowed_totals(&batch.expenses, &trailing).total();
        let average_daily_spend = trailing_total / Decimal::from(AVERAGE_WINDOW_DAYS);

        let mut segments: Vec<CategorySegment> = month_totals
            .by_category
            .into_iter()
            .map(|(category, amount)| CategorySegment { category, amount })
            .collect();
        segments.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

        DashboardOverview {
            month: month_prefix(&month),
            budgeted_spent,
            unbudgeted_spent,
            total_budget,
            utilization_pct: usage_percentage(budgeted_spent, Some(total_budget)),
            average_daily_spend,
            segments,
        }
    }
}

impl Default for OverviewService {
    fn default() -> Self {
        Self::new()
    }
}

fn month_prefix(window: &DateWindow) -> String {
    match window {
        DateWindow::Month { prefix, .. } => prefix.clone(),
        DateWindow::Range { start, .. } => start.chars().take(7).collect(),
    }
}
