use serde::{Deserialize, Serialize};

/// Inclusive date range within which expenses count as "current".
///
/// All bounds are `YYYY-MM-DD` strings in UTC. Membership is decided on
/// the canonical string form, so it is only meaningful for normalized
/// dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateWindow {
    /// A calendar month. Membership is a `YYYY-MM` prefix match;
    /// `start`/`end` are informational (first and last day).
    Month {
        prefix: String,
        start: String,
        end: String,
    },
    /// A closed `[start, end]` range compared lexicographically.
    Range { start: String, end: String },
}

impl DateWindow {
    /// Whether a normalized `YYYY-MM-DD` date falls inside the window.
    pub fn contains(&self, date: &str) -> bool {
        match self {
            DateWindow::Month { prefix, .. } => date.starts_with(prefix.as_str()),
            DateWindow::Range { start, end } => date >= start.as_str() && date <= end.as_str(),
        }
    }

    pub fn start(&self) -> &str {
        match self {
            DateWindow::Month { start, .. } | DateWindow::Range { start, .. } => start,
        }
    }

    pub fn end(&self) -> &str {
        match self {
            DateWindow::Month { end, .. } | DateWindow::Range { end, .. } => end,
        }
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateWindow::Month { prefix, .. } => write!(f, "{prefix}"),
            DateWindow::Range { start, end } => write!(f, "{start}..={end}"),
        }
    }
}
