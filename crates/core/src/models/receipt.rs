use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::item::{decimal_to_value, Item};

/// An expense recorded from an uploaded receipt.
///
/// Unlike [`super::expense::Expense`], `date` holds the full creation
/// timestamp; normalization reduces it to a calendar date when the
/// record is aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptExpense {
    /// Owner parsed from the object key
    pub user_id: String,

    pub expense_id: String,

    pub amount: Decimal,

    pub category: String,

    /// RFC 3339 timestamp, same as `created_at`
    pub date: String,

    pub created_at: String,

    pub notes: String,

    /// Object key of the uploaded receipt
    pub receipt_key: String,
}

impl ReceiptExpense {
    /// Attributes written to the store (keys are added by the repository).
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("expenseId".into(), Value::String(self.expense_id.clone()));
        item.insert("amount".into(), decimal_to_value(self.amount));
        item.insert("category".into(), Value::String(self.category.clone()));
        item.insert("date".into(), Value::String(self.date.clone()));
        item.insert("createdAt".into(), Value::String(self.created_at.clone()));
        item.insert("notes".into(), Value::String(self.notes.clone()));
        item.insert("receiptKey".into(), Value::String(self.receipt_key.clone()));
        item
    }
}
