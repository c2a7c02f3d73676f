//! Error types shared by the configuration and output layers

/// Result type for configuration and output operations
pub type Result<T> = std::result::Result<T, DatagenError>;

/// Errors surfaced by the set generator
#[derive(thiserror::Error, Debug)]
pub enum DatagenError {
    /// A required credential is absent. Fatal: raised before any work starts.
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("source error: {0}")]
    Source(String),
}
