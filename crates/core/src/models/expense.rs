use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::item::{decimal_attr, decimal_to_value, put_opt_str, str_attr, Item};

/// Payload submitted when recording a new expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub amount: Decimal,

    pub category: String,

    /// Any date or timestamp; normalized to `YYYY-MM-DD` on creation.
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default, alias = "note")]
    pub notes: Option<String>,
}

impl ExpenseInput {
    pub fn new(amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            date: None,
            notes: None,
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A recorded expense. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Opaque identifier
    pub expense_id: String,

    /// Non-negative amount in the user's currency
    pub amount: Decimal,

    pub category: String,

    /// Canonical `YYYY-MM-DD`
    pub date: String,

    /// RFC 3339 creation instant
    pub created_at: String,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Expense {
    /// Attributes written to the store (keys are added by the repository).
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("expenseId".into(), Value::String(self.expense_id.clone()));
        item.insert("amount".into(), decimal_to_value(self.amount));
        item.insert("category".into(), Value::String(self.category.clone()));
        item.insert("date".into(), Value::String(self.date.clone()));
        item.insert("createdAt".into(), Value::String(self.created_at.clone()));
        put_opt_str(&mut item, "notes", &self.notes);
        item
    }
}

/// An expense exactly as decoded from storage.
///
/// Every field is optional: older records, receipt-ingested records and
/// hand-edited records do not agree on shape. Normalization decides what
/// is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Raw date value (date, timestamp, or garbage)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Storage sort key, e.g. `EXPENSE#2024-03-08#<id>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Object key of the uploaded receipt, for receipt-ingested records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_key: Option<String>,
}

impl ExpenseRecord {
    pub fn new(category: impl Into<String>, amount: Decimal, date: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            amount: Some(amount),
            date: Some(date.into()),
            ..Self::default()
        }
    }

    /// A record with no `date` attribute, only a creation timestamp.
    pub fn created(category: impl Into<String>, amount: Decimal, created_at: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            amount: Some(amount),
            created_at: Some(created_at.into()),
            ..Self::default()
        }
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Lenient decode of a stored item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            expense_id: str_attr(item, "expenseId"),
            amount: decimal_attr(item, "amount"),
            category: str_attr(item, "category"),
            date: str_attr(item, "date"),
            created_at: str_attr(item, "createdAt"),
            sort_key: str_attr(item, "SK"),
            notes: str_attr(item, "notes").or_else(|| str_attr(item, "note")),
            receipt_key: str_attr(item, "receiptKey"),
        }
    }
}

impl From<&Expense> for ExpenseRecord {
    fn from(e: &Expense) -> Self {
        Self {
            expense_id: Some(e.expense_id.clone()),
            amount: Some(e.amount),
            category: Some(e.category.clone()),
            date: Some(e.date.clone()),
            created_at: Some(e.created_at.clone()),
            sort_key: None,
            notes: e.notes.clone(),
            receipt_key: None,
        }
    }
}

/// The canonical `(category, amount, date)` triple the aggregation core works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedExpense {
    pub category: String,
    pub amount: Decimal,
    /// `YYYY-MM-DD`
    pub date: String,
}
