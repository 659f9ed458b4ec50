use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to check one category's spend against its limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRequest {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
}

impl AlertRequest {
    pub fn new(category: impl Into<String>, spent: Decimal, limit: Decimal) -> Self {
        Self {
            category: category.into(),
            spent,
            limit,
        }
    }
}

/// Why an alert was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    AlertsDisabled,
    NotOverspent,
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuppressReason::AlertsDisabled => write!(f, "alerts disabled"),
            SuppressReason::NotOverspent => write!(f, "not overspent"),
        }
    }
}

/// Everything needed to tell a user they overspent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverspendAlert {
    pub recipient: String,
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    /// `spent - limit`
    pub overage: Decimal,
    /// Rounded usage percentage
    pub percentage: i64,
}

/// Outcome of evaluating an overspend check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertDecision {
    Suppressed(SuppressReason),
    Send(OverspendAlert),
}

impl AlertDecision {
    pub fn should_send(&self) -> bool {
        matches!(self, AlertDecision::Send(_))
    }
}

impl std::fmt::Display for AlertDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertDecision::Suppressed(reason) => write!(f, "suppressed: {reason}"),
            AlertDecision::Send(_) => write!(f, "send: overspending"),
        }
    }
}
