//! Error types for reconciliation

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that can occur while reconciling corrections against the store
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No canonical record matches the query name
    #[error("no canonical record matches '{0}'")]
    NoMatch(String),

    /// Several candidates survived every tie-break
    #[error("ambiguous name '{query}': candidates {candidates:?}")]
    Ambiguous { query: String, candidates: Vec<String> },

    /// An alias entry was rejected by validation
    #[error("invalid alias '{from}' -> '{to}': {reason}")]
    InvalidAlias { from: String, to: String, reason: String },
}
