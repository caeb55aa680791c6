use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `userdeck-api` crate.
///
/// Covers every wire-level failure mode of the probe and fetch requests.
/// `userdeck-core` maps these into the published error taxonomy shown to
/// consumers.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint URL parsing error.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Request exceeded its upper time bound and was aborted.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // ── Endpoint ────────────────────────────────────────────────────
    /// Endpoint reachable but answered with a non-success status.
    #[error("Endpoint returned HTTP {status}")]
    Http { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body was not a JSON array of user records.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String },
}

impl Error {
    /// Returns `true` if this error was caused by a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the endpoint could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// The HTTP status the endpoint answered with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
