use thiserror::Error;

/// Unified error type for the entire spendguard-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ──────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Collaborators ───────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to send email: {0}")]
    Email(String),

    // ── Serialization / File ────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    pub(crate) fn not_found(kind: &str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind: kind.to_string(),
            id: id.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
