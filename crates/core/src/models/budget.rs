use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::errors::CoreError;

use super::item::{decimal_attr, decimal_to_value, str_attr, Item};

/// Recurrence basis of a budget's spend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Trailing 7 days, today included
    Weekly,
    /// The calendar month containing today
    Monthly,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Weekly => write!(f, "weekly"),
            Period::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    /// Exact, case-sensitive match on the stored labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(CoreError::ValidationError(format!(
                "Unknown budget period '{other}': expected 'weekly' or 'monthly'"
            ))),
        }
    }
}

/// Payload for creating (or fully replacing) a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub category: String,
    pub limit: Decimal,
    pub period: Period,
}

/// A validated budget owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Opaque identifier
    pub budget_id: String,

    /// Label joined against expense categories (exact, case-sensitive)
    pub category: String,

    pub limit: Decimal,

    pub period: Period,

    /// RFC 3339 creation instant
    pub created_at: String,
}

impl Budget {
    /// Attributes written to the store (keys are added by the repository).
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("budgetId".into(), Value::String(self.budget_id.clone()));
        item.insert("category".into(), Value::String(self.category.clone()));
        item.insert("limit".into(), decimal_to_value(self.limit));
        item.insert("period".into(), Value::String(self.period.to_string()));
        item.insert("createdAt".into(), Value::String(self.created_at.clone()));
        item
    }
}

/// A budget exactly as decoded from storage.
///
/// Fields with the wrong type or an unknown value are `None` rather than
/// failing the whole record; [`BudgetRecord::validate`] decides whether
/// the record is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BudgetRecord {
    pub fn new(category: impl Into<String>, limit: Decimal, period: Period) -> Self {
        Self {
            budget_id: None,
            category: Some(category.into()),
            limit: Some(limit),
            period: Some(period),
            created_at: None,
        }
    }

    /// Lenient decode of a stored item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            budget_id: str_attr(item, "budgetId"),
            category: str_attr(item, "category"),
            limit: decimal_attr(item, "limit"),
            period: str_attr(item, "period").and_then(|p| p.parse().ok()),
            created_at: str_attr(item, "createdAt"),
        }
    }

    /// Category, if present and non-empty.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Turn the record into a canonical [`Budget`], or report which
    /// required field is missing.
    pub fn validate(&self) -> Result<Budget, CoreError> {
        let category = self.category().ok_or_else(|| {
            CoreError::ValidationError("Budget record has no category".into())
        })?;
        let limit = self.limit.ok_or_else(|| {
            CoreError::ValidationError(format!("Budget '{category}' has no numeric limit"))
        })?;
        let period = self.period.ok_or_else(|| {
            CoreError::ValidationError(format!("Budget '{category}' has no valid period"))
        })?;

        Ok(Budget {
            budget_id: self.budget_id.clone().unwrap_or_default(),
            category: category.to_string(),
            limit,
            period,
            created_at: self.created_at.clone().unwrap_or_default(),
        })
    }
}

impl From<&Budget> for BudgetRecord {
    fn from(b: &Budget) -> Self {
        Self {
            budget_id: Some(b.budget_id.clone()),
            category: Some(b.category.clone()),
            limit: Some(b.limit),
            period: Some(b.period),
            created_at: Some(b.created_at.clone()),
        }
    }
}
