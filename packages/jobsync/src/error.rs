//! Typed errors for the sync library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Date parse failures are
//! deliberately not represented here: the normalizers degrade to raw
//! passthrough instead of raising.

use thiserror::Error;

/// Errors that can occur during a sync cycle.
///
/// Every variant is fatal for the current cycle; there is no internal
/// recovery or retry. The external scheduler owns run-level retry policy.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or malformed process configuration (pre-flight)
    #[error("config error: {message}")]
    Config { message: String },

    /// Upstream API responded with a non-success envelope
    #[error("source API error: {message}")]
    SourceApi { message: String },

    /// Network failure on an outbound call
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP response
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Tabular store operation failed
    #[error("store error: {message}")]
    Store { message: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Build a configuration error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Build a source API error from an upstream message.
    pub fn source_api(message: impl Into<String>) -> Self {
        Self::SourceApi {
            message: message.into(),
        }
    }

    /// Build a store error from a message.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Fail on a non-2xx response, attaching the body to a `Status` error.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SyncError::Status { status, body });
    }
    Ok(response)
}
