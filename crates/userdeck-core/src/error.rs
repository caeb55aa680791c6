// ── Published error taxonomy ──
//
// User-facing errors from userdeck-core. Consumers never see raw reqwest
// errors or JSON parse failures -- the `From<userdeck_api::Error>` impl
// translates wire-level errors into the four published kinds.
// Classification is by failure signal (timeout flag, HTTP status, transport
// class), never by matching message text.

use thiserror::Error;

/// Error taxonomy published on the controller's state surface.
///
/// `Clone` so the most recent failure can sit in a `watch` channel while
/// the same value is returned to the caller. Every variant renders a
/// distinct user-facing message; all four are terminal for the current
/// load attempt and recovery happens via passive reconnection or an
/// explicit retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The reachability probe failed, so the fetch was never attempted.
    #[error("Could not reach the server -- check your connection and retry")]
    ConnectionFailed,

    /// Probe or fetch exceeded its time bound and was aborted.
    #[error("The request took too long and was aborted")]
    Timeout,

    /// Endpoint reachable but answered the fetch with a non-success status.
    #[error("The server answered with HTTP {0}")]
    Http(u16),

    /// Any other transport or decode failure (DNS, reset, malformed body).
    #[error("Network error: {0}")]
    Network(String),
}

// ── Conversion from wire-level errors ────────────────────────────────
//
// `ConnectionFailed` never comes from here: it is produced only by the
// probe step of a load, where the cause is irrelevant to the caller.

impl From<userdeck_api::Error> for DirectoryError {
    fn from(err: userdeck_api::Error) -> Self {
        match err {
            userdeck_api::Error::Timeout { .. } => Self::Timeout,
            userdeck_api::Error::Http { status } => Self::Http(status),
            userdeck_api::Error::Transport(ref e) if e.is_timeout() => Self::Timeout,
            other => Self::Network(other.to_string()),
        }
    }
}
