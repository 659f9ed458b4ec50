use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetInput};

/// Validates and builds new budgets.
pub struct BudgetService;

impl BudgetService {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, input: BudgetInput, now: DateTime<Utc>) -> Result<Budget, CoreError> {
        if input.category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "category, limit (number), and period are required".into(),
            ));
        }
        if input.limit <= Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Budget limit must be positive (got {})",
                input.limit
            )));
        }

        Ok(Budget {
            budget_id: Uuid::new_v4().to_string(),
            category: input.category,
            limit: input.limit,
            period: input.period,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new()
    }
}
