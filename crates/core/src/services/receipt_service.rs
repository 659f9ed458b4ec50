use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::receipt::ReceiptExpense;

/// Top-level folder of receipt uploads: `receipts/<user>/<file>`.
pub const RECEIPT_FOLDER: &str = "receipts";

/// Owner recorded when the object key carries no user.
pub const UNKNOWN_USER: &str = "unknown-user";

/// Placeholder category until receipts are actually read.
pub const RECEIPT_CATEGORY: &str = "Groceries";

pub const RECEIPT_NOTES: &str = "Mock OCR: receipt processed";

/// Fixed amount recorded for every receipt (145.50).
pub fn receipt_amount() -> Decimal {
    Decimal::new(14550, 2)
}

/// Owner of an uploaded receipt, from a percent-encoded object key.
///
/// `receipts/<user>/<file>` yields `<user>`; any other shape yields
/// [`UNKNOWN_USER`].
pub fn user_from_object_key(object_key: &str) -> String {
    let decoded = urlencoding::decode(object_key)
        .map(|k| k.into_owned())
        .unwrap_or_else(|_| object_key.to_string());

    let parts: Vec<&str> = decoded.split('/').collect();
    match parts.as_slice() {
        [folder, user, _, ..] if *folder == RECEIPT_FOLDER => user.to_string(),
        _ => UNKNOWN_USER.to_string(),
    }
}

/// Turns receipt uploads into expenses.
///
/// No receipt content is read: every upload records the same placeholder
/// amount and category, dated at the instant of ingestion.
pub struct ReceiptService;

impl ReceiptService {
    pub fn new() -> Self {
        Self
    }

    pub fn ingest(&self, object_key: &str, now: DateTime<Utc>) -> ReceiptExpense {
        let created_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        ReceiptExpense {
            user_id: user_from_object_key(object_key),
            expense_id: Uuid::new_v4().to_string(),
            amount: receipt_amount(),
            category: RECEIPT_CATEGORY.to_string(),
            date: created_at.clone(),
            created_at,
            notes: RECEIPT_NOTES.to_string(),
            receipt_key: object_key.to_string(),
        }
    }
}

impl Default for ReceiptService {
    fn default() -> Self {
        Self::new()
    }
}
