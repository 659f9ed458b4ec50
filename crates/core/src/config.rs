use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default sender address for outbound notifications.
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@spendguard.app";

/// Default region used by the email collaborator.
pub const DEFAULT_EMAIL_REGION: &str = "us-east-1";

/// Connection settings for the key-value store collaborator.
///
/// Built once by the entry point and handed to storage constructors,
/// so nothing below the entry point reads the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Table holding budgets, expenses and settings for every user.
    pub table_name: String,

    /// Region of the table. `"local"` when an explicit endpoint is used.
    #[serde(default)]
    pub region: Option<String>,

    /// Explicit endpoint override (local development).
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl StoreConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            region: None,
            endpoint: None,
        }
    }

    /// Point the store at a local endpoint. Region becomes `"local"`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self.region = Some("local".to_string());
        self
    }

    /// Read `TABLE_NAME`, `AWS_REGION` and `DYNAMODB_ENDPOINT` from the environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] but with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = non_empty(lookup("TABLE_NAME")).ok_or_else(|| {
            CoreError::Configuration("TABLE_NAME env var is required".into())
        })?;

        let config = Self {
            table_name,
            region: non_empty(lookup("AWS_REGION")),
            endpoint: None,
        };

        Ok(match non_empty(lookup("DYNAMODB_ENDPOINT")) {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        })
    }

    /// `true` when talking to a local endpoint rather than a managed table.
    pub fn is_local(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Settings for the outbound email collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address placed on every outbound email.
    pub from_address: String,

    pub region: String,
}

impl EmailConfig {
    /// Read `SES_FROM_EMAIL` and `AWS_REGION`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            from_address: non_empty(lookup("SES_FROM_EMAIL"))
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            region: non_empty(lookup("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_EMAIL_REGION.to_string()),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            region: DEFAULT_EMAIL_REGION.to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
