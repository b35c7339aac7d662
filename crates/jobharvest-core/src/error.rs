use thiserror::Error;

use crate::platform::Platform;

/// Application-wide error types for jobharvest.
#[derive(Error, Debug)]
pub enum AppError {
    /// A platform query failed (rejected request, upstream failure).
    #[error("provider error on {platform}: {message}")]
    Provider { platform: Platform, message: String },

    /// A platform returned a response the provider could not interpret.
    #[error("malformed response from {platform}: {message}")]
    MalformedResponse { platform: Platform, message: String },

    /// Provider request timed out.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("network error: {0}")]
    Network(String),

    /// Every attempted (term, platform) search failed.
    #[error("all {attempted} searches failed; nothing was collected")]
    AllSearchesFailed { attempted: usize },

    /// Output directory or file could not be written.
    #[error("export error: {0}")]
    Export(String),

    /// JSON serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writing failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The settings handed to the pipeline are unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Returns true if this error is recovered locally by the collector:
    /// the failing (term, platform) pair is skipped and the run continues.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Provider { .. }
                | AppError::MalformedResponse { .. }
                | AppError::Timeout(_)
                | AppError::Network(_)
        )
    }
}
