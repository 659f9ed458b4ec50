use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::expense::{Expense, ExpenseInput};
use crate::services::normalization_service::to_date_only;
use crate::services::window_service::format_date;

/// Validates and builds new expenses.
///
/// Pure business logic: persisting the result is the caller's job.
pub struct ExpenseService;

impl ExpenseService {
    pub fn new() -> Self {
        Self
    }

    /// Build an expense from user input at instant `now`.
    ///
    /// Date resolution: the submitted date (normalized), else the UTC date
    /// of `now`.
    pub fn create(&self, input: ExpenseInput, now: DateTime<Utc>) -> Result<Expense, CoreError> {
        self.validate(&input)?;

        let created_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let date = input
            .date
            .as_deref()
            .and_then(to_date_only)
            .unwrap_or_else(|| format_date(now.date_naive()));

        Ok(Expense {
            expense_id: Uuid::new_v4().to_string(),
            amount: input.amount,
            category: input.category,
            date,
            created_at,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
        })
    }

    /// Rules:
    /// - Category must be non-empty
    /// - Amount must not be negative
    fn validate(&self, input: &ExpenseInput) -> Result<(), CoreError> {
        if input.category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "amount (number) and category are required".into(),
            ));
        }
        if input.amount < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Expense amount must not be negative (got {})",
                input.amount
            )));
        }
        Ok(())
    }
}

impl Default for ExpenseService {
    fn default() -> Self {
        Self::new()
    }
}
