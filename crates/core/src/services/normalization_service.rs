use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::aggregate::{Exclusion, NormalizedBatch};
use crate::models::expense::{ExpenseRecord, NormalizedExpense};
use crate::services::window_service::format_date;
use crate::storage::keys;

/// Timestamp layouts tried (as UTC) when the input is not RFC 3339 / RFC 2822.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts that are not already canonical.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// When a record's own `date` is not enough, which fallbacks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFallback {
    /// Fall back to the sort key / creation timestamp only when `date` is absent.
    WhenMissing,
    /// Also fall back when `date` is present but unparseable.
    WhenMissingOrUnparseable,
}

/// Coerce a raw date value into canonical `YYYY-MM-DD`.
///
/// Already-canonical input is accepted verbatim (no reparsing, so no
/// calendar validation). Anything else goes through general timestamp
/// parsing and yields the UTC calendar date. Empty or unparseable input
/// yields `None`.
pub fn to_date_only(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_canonical_date(trimmed) {
        return Some(trimmed.to_string());
    }
    parse_utc_date(trimmed).map(format_date)
}

/// `^\d{4}-\d{2}-\d{2}$`
pub fn is_canonical_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

fn parse_utc_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Turns stored expense records into canonical `(category, amount, date)` triples.
///
/// Never fails: a record that cannot be normalized is reported as an
/// [`Exclusion`] and left out.
pub struct NormalizationService;

impl NormalizationService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the calendar date of one record.
    ///
    /// Sources, in order: the `date` attribute, the date embedded in the
    /// storage sort key, the creation timestamp.
    pub fn resolve_date(&self, record: &ExpenseRecord, fallback: DateFallback) -> Option<String> {
        if let Some(raw) = &record.date {
            if let Some(date) = to_date_only(raw) {
                return Some(date);
            }
            if fallback == DateFallback::WhenMissing {
                return None;
            }
        }

        record
            .sort_key
            .as_deref()
            .and_then(keys::date_from_expense_sk)
            .and_then(to_date_only)
            .or_else(|| record.created_at.as_deref().and_then(to_date_only))
    }

    pub fn normalize(
        &self,
        record: &ExpenseRecord,
        fallback: DateFallback,
    ) -> Result<NormalizedExpense, Exclusion> {
        let amount = record.amount.ok_or(Exclusion::MissingAmount)?;
        let category = record
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(Exclusion::MissingCategory)?;
        let date = self
            .resolve_date(record, fallback)
            .ok_or(Exclusion::UnparseableDate)?;

        Ok(NormalizedExpense {
            category: category.to_string(),
            amount,
            date,
        })
    }

    pub fn normalize_all(&self, records: &[ExpenseRecord], fallback: DateFallback) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for (idx, record) in records.iter().enumerate() {
            match self.normalize(record, fallback) {
                Ok(expense) => batch.expenses.push(expense),
                Err(reason) => {
                    tracing::debug!(
                        index = idx,
                        expense_id = record.expense_id.as_deref().unwrap_or("?"),
                        %reason,
                        "expense excluded from aggregation"
                    );
                    batch.excluded.push((idx, reason));
                }
            }
        }

        if !batch.excluded.is_empty() {
            tracing::warn!(
                excluded = batch.excluded.len(),
                total = records.len(),
                "some expenses could not be normalized"
            );
        }

        batch
    }
}

impl Default for NormalizationService {
    fn default() -> Self {
        Self::new()
    }
}
