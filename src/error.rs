//! Error types for download orchestration.
//!
//! Failures are contained at the smallest meaningful scope: protocol-level
//! errors are caught at the protocol boundary and become failed-download
//! counts, page-level timeouts become empty pages, and only
//! `SessionSetup` aborts a run.

use thiserror::Error;

/// Custom error type for fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// Configuration error (bad pattern rule, unusable download directory)
    #[error("configuration error: {0}")]
    Config(String),

    /// Browser session could not start. Fatal: nothing can proceed
    /// without a session.
    #[error("session setup failed: {0}")]
    SessionSetup(String),

    /// Page or control failed to load/appear within its bound
    #[error("timed out after {waited_secs}s waiting for {what}")]
    NavigationTimeout { what: String, waited_secs: u64 },

    /// Download did not finish within the completion window
    #[error("download did not complete within {0}s")]
    PollTimeout(u64),

    /// Any other error during UI interaction (stale tab, driver
    /// communication failure, unreadable directory)
    #[error("interaction error: {0}")]
    Interaction(String),
}

impl From<anyhow::Error> for FetchError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} preserves the full context chain
        Self::Interaction(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `FetchError`
pub type FetchResult<T> = Result<T, FetchError>;
