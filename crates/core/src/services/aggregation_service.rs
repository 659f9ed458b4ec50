use rust_decimal::Decimal;

use crate::models::aggregate::{add_amount, SpendTotals, WindowedSpend};
use crate::models::expense::{ExpenseRecord, NormalizedExpense};
use crate::models::window::DateWindow;
use crate::services::normalization_service::{DateFallback, NormalizationService};

/// Sums expense amounts per category, with or without a date window.
///
/// Amounts accumulate as exact decimals; nothing is rounded here. A total
/// that would overflow saturates rather than aborting the computation.
/// Category matching is exact string equality (no trimming, no case-folding).
pub struct AggregationService {
    normalizer: NormalizationService,
}

impl AggregationService {
    pub fn new() -> Self {
        Self {
            normalizer: NormalizationService::new(),
        }
    }

    /// Unwindowed totals: every record with a category and a numeric amount
    /// counts, whatever its date.
    pub fn totals_by_category(&self, records: &[ExpenseRecord]) -> SpendTotals {
        let mut totals = SpendTotals::default();

        for record in records {
            let category = record.category.as_deref().filter(|c| !c.is_empty());
            match (category, record.amount) {
                (Some(category), Some(amount)) => {
                    let total = totals
                        .by_category
                        .entry(category.to_string())
                        .or_insert(Decimal::ZERO);
                    *total = add_amount(*total, amount);
                    totals.counted += 1;
                }
                _ => totals.excluded += 1,
            }
        }

        totals
    }

    /// Totals per category of already-normalized expenses inside `window`.
    pub fn windowed_totals(&self, expenses: &[NormalizedExpense], window: &DateWindow) -> SpendTotals {
        let mut totals = SpendTotals::default();

        for expense in expenses.iter().filter(|e| window.contains(&e.date)) {
            let total = totals
                .by_category
                .entry(expense.category.clone())
                .or_insert(Decimal::ZERO);
            *total = add_amount(*total, expense.amount);
            totals.counted += 1;
        }

        totals
    }

    /// Sum of already-normalized expenses of exactly `category` inside `window`.
    pub fn windowed_total(
        &self,
        expenses: &[NormalizedExpense],
        window: &DateWindow,
        category: &str,
    ) -> WindowedSpend {
        let mut spend = WindowedSpend::default();

        for expense in expenses.iter().filter(|e| e.category == category) {
            if window.contains(&expense.date) {
                spend.total = add_amount(spend.total, expense.amount);
                spend.counted += 1;
            } else {
                spend.outside_window += 1;
            }
        }

        spend
    }

    /// Normalize raw records, then sum `category` inside `window`.
    ///
    /// Records with an unusable amount, category or date are counted in
    /// `excluded` and never abort the sum.
    pub fn windowed_spend(
        &self,
        records: &[ExpenseRecord],
        window: &DateWindow,
        category: &str,
        fallback: DateFallback,
    ) -> WindowedSpend {
        let batch = self.normalizer.normalize_all(records, fallback);
        let mut spend = self.windowed_total(&batch.expenses, window, category);
        spend.excluded = batch.excluded_count();
        spend
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
