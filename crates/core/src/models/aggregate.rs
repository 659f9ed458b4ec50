use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::expense::NormalizedExpense;

/// Why a stored expense could not take part in a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Amount absent or not a number
    MissingAmount,
    /// Category absent or empty
    MissingCategory,
    /// No date source could be parsed
    UnparseableDate,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exclusion::MissingAmount => write!(f, "missing amount"),
            Exclusion::MissingCategory => write!(f, "missing category"),
            Exclusion::UnparseableDate => write!(f, "unparseable date"),
        }
    }
}

/// Result of normalizing a collection of stored expenses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub expenses: Vec<NormalizedExpense>,
    /// `(position in the input, reason)` for every dropped record
    pub excluded: Vec<(usize, Exclusion)>,
}

impl NormalizedBatch {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}

/// Per-category totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendTotals {
    pub by_category: HashMap<String, Decimal>,
    /// Expenses that contributed
    pub counted: usize,
    /// Expenses dropped before summing
    pub excluded: usize,
}

impl SpendTotals {
    pub fn get(&self, category: &str) -> Decimal {
        self.by_category.get(category).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        sum_amounts(self.by_category.values().copied())
    }
}

/// Spend of one category inside one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowedSpend {
    pub total: Decimal,
    /// Matching expenses inside the window
    pub counted: usize,
    /// Matching expenses dated outside the window
    pub outside_window: usize,
    /// Expenses dropped before matching (any category)
    pub excluded: usize,
}

/// Add `amount` to a running total. Saturates at `Decimal::MAX` / `MIN`
/// instead of panicking on overflow.
pub fn add_amount(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        tracing::warn!(%total, %amount, "spend total overflowed, saturating");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Overflow-safe sum of amounts.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, add_amount)
}
