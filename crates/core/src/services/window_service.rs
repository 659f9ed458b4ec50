use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use crate::models::budget::Period;
use crate::models::window::DateWindow;

/// Length of the weekly window in days, today included.
pub const WEEK_DAYS: u64 = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves the "current period" of a budget into a concrete date window.
///
/// Pure function of `(period, now)`: the reference instant is always passed
/// in, never read from the clock. All arithmetic is on the UTC calendar date
/// of `now`; there is no timezone parameter.
pub struct WindowService;

impl WindowService {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, period: Period, now: DateTime<Utc>) -> DateWindow {
        match period {
            Period::Monthly => self.month_of(now),
            Period::Weekly => self.trailing_days(WEEK_DAYS, now),
        }
    }

    /// The calendar month containing `now`, matched by `YYYY-MM` prefix.
    pub fn month_of(&self, now: DateTime<Utc>) -> DateWindow {
        let today = now.date_naive();
        let first = today.with_day(1).unwrap_or(today);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);

        DateWindow::Month {
            prefix: today.format("%Y-%m").to_string(),
            start: format_date(first),
            end: format_date(last),
        }
    }

    /// `[today - (days - 1), today]`. `days == 0` is treated as 1.
    pub fn trailing_days(&self, days: u64, now: DateTime<Utc>) -> DateWindow {
        let end = now.date_naive();
        let start = end
            .checked_sub_days(Days::new(days.max(1) - 1))
            .unwrap_or(NaiveDate::MIN);

        DateWindow::Range {
            start: format_date(start),
            end: format_date(end),
        }
    }
}

impl Default for WindowService {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
