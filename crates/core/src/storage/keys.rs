//! Key schema of the single-table store.
//!
//! | record   | partition key  | sort key                   | index sort key     |
//! |----------|----------------|----------------------------|--------------------|
//! | budget   | `USER#<user>`  | `BUDGET#<id>`              |                    |
//! | expense  | `USER#<user>`  | `EXPENSE#<date>#<id>`      | `EXPENSE#<date>`   |
//! | receipt  | `USER#<user>`  | `EXPENSE#<createdAt>`      | `EXPENSE#<createdAt>` |
//! | settings | `USER#<user>`  | `SETTINGS`                 |                    |

pub const PK: &str = "PK";
pub const SK: &str = "SK";
pub const INDEX_PK: &str = "GSI1PK";
pub const INDEX_SK: &str = "GSI1SK";

pub const USER_PREFIX: &str = "USER#";
pub const BUDGET_PREFIX: &str = "BUDGET#";
pub const EXPENSE_PREFIX: &str = "EXPENSE#";
pub const SETTINGS_SK: &str = "SETTINGS";

pub fn user_pk(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

pub fn budget_sk(budget_id: &str) -> String {
    format!("{BUDGET_PREFIX}{budget_id}")
}

/// The id suffix keeps two expenses on the same day from sharing a key.
pub fn expense_sk(date: &str, expense_id: &str) -> String {
    format!("{EXPENSE_PREFIX}{date}#{expense_id}")
}

pub fn expense_index_sk(date: &str) -> String {
    format!("{EXPENSE_PREFIX}{date}")
}

/// Upper bound of an index range ending on `date`, including
/// receipt keys that carry a timestamp on that day.
pub fn expense_index_upper(date: &str) -> String {
    format!("{EXPENSE_PREFIX}{date}~")
}

/// Primary and index sort key of a receipt-ingested expense.
pub fn receipt_expense_sk(created_at: &str) -> String {
    format!("{EXPENSE_PREFIX}{created_at}")
}

/// Date portion of an expense sort key: `EXPENSE#2024-03-08#abc` → `2024-03-08`.
///
/// Keys written by receipt ingestion carry a full timestamp
/// (`EXPENSE#2024-03-08T10:15:00.000Z`), which is returned whole.
pub fn date_from_expense_sk(sk: &str) -> Option<&str> {
    let rest = sk.strip_prefix(EXPENSE_PREFIX)?;
    let date = rest.split('#').next().unwrap_or(rest);
    (!date.is_empty()).then_some(date)
}
