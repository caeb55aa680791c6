// ── Runtime controller configuration ──
//
// Describes where the user directory lives and how patient the controller
// is. The CLI builds a `DirectoryConfig` and hands it in -- core never
// reads config files.

use std::time::Duration;

use url::Url;

/// Default public endpoint: the JSONPlaceholder demo user directory.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Configuration for a [`Directory`](crate::Directory) controller.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Endpoint serving a JSON array of user records.
    pub endpoint: Url,
    /// Upper bound for the HEAD reachability probe.
    pub probe_timeout: Duration,
    /// Upper bound for the full GET fetch.
    pub fetch_timeout: Duration,
    /// Cadence of passive reconnection probes while disconnected.
    /// Zero disables passive reconnection.
    pub reconnect_interval: Duration,
    /// How long a transient info message stays visible after a load settles.
    pub info_message_ttl: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.parse().expect("default endpoint is a valid URL"),
            probe_timeout: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(10),
            reconnect_interval: Duration::from_secs(30),
            info_message_ttl: Duration::from_millis(1500),
        }
    }
}
