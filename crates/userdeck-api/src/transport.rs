// Transport configuration for building reqwest::Client instances.
//
// The probe and the fetch share one connection pool but carry different
// per-request deadlines, so the client-wide timeout stays unset and each
// request applies its own bound from this config.

use std::time::Duration;

/// Transport policy for the directory client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for the HEAD reachability probe.
    pub probe_timeout: Duration,
    /// Upper bound for the full GET fetch.
    pub fetch_timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .build()
            .map_err(crate::error::Error::Transport)
    }
}

fn default_user_agent() -> String {
    concat!("userdeck/", env!("CARGO_PKG_VERSION")).to_owned()
}
