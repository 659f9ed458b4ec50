use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::item::{bool_attr, put_opt_str, str_attr, Item};

/// Default display currency (amounts render as `R12.34`).
pub const DEFAULT_CURRENCY: &str = "ZAR";

/// Per-user notification settings. One per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Send an email when a budget is overspent
    #[serde(default)]
    pub alerts_enabled: bool,

    /// Send the weekly digest on the scheduled run
    #[serde(default)]
    pub weekly_summary: bool,

    /// Currency code used when rendering amounts (e.g. "ZAR", "USD")
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Fallback recipient when the caller's identity carries no email
    #[serde(default)]
    pub email: Option<String>,

    /// RFC 3339 instant of the last update
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alerts_enabled: false,
            weekly_summary: false,
            currency: default_currency(),
            email: None,
            updated_at: None,
        }
    }
}

impl Settings {
    /// Lenient decode: non-boolean flags read as `false`.
    pub fn from_item(item: &Item) -> Self {
        Self {
            alerts_enabled: bool_attr(item, "alertsEnabled").unwrap_or(false),
            weekly_summary: bool_attr(item, "weeklySummary").unwrap_or(false),
            currency: str_attr(item, "currency")
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(default_currency),
            email: str_attr(item, "email"),
            updated_at: str_attr(item, "updatedAt"),
        }
    }

    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("alertsEnabled".into(), Value::Bool(self.alerts_enabled));
        item.insert("weeklySummary".into(), Value::Bool(self.weekly_summary));
        item.insert("currency".into(), Value::String(self.currency.clone()));
        put_opt_str(&mut item, "email", &self.email);
        put_opt_str(&mut item, "updatedAt", &self.updated_at);
        item
    }

    /// The configured email, trimmed, if it is non-empty.
    pub fn usable_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}
