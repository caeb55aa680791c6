// Directory HTTP client
//
// Wraps `reqwest::Client` with the two requests the lifecycle controller
// needs: an existence-only HEAD probe and the full GET fetch. Both send
// `Cache-Control: no-cache` so intermediaries never answer for a dead
// origin, and both carry their own deadline.

use std::time::Duration;

use reqwest::header;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::User;
use crate::transport::TransportConfig;

/// Raw HTTP client for the user directory endpoint.
///
/// Holds no state beyond the connection pool and the configured deadlines;
/// retry and reconnection policy live in the caller.
pub struct DirectoryClient {
    http: reqwest::Client,
    endpoint: Url,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

impl DirectoryClient {
    /// Create a new client for `endpoint` from a `TransportConfig`.
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint,
            probe_timeout: transport.probe_timeout,
            fetch_timeout: transport.fetch_timeout,
        })
    }

    /// The directory endpoint this client talks to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Existence-only reachability check.
    ///
    /// Sends `HEAD` to the endpoint and succeeds iff a 2xx status arrives
    /// within the probe deadline. No retries here.
    pub async fn probe(&self) -> Result<(), Error> {
        debug!("HEAD {}", self.endpoint);

        let resp = self
            .http
            .head(self.endpoint.clone())
            .header(header::CACHE_CONTROL, "no-cache")
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| classify(e, self.probe_timeout))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Http {
                status: status.as_u16(),
            })
        }
    }

    /// Fetch the full user collection.
    ///
    /// Sends `GET` to the endpoint and decodes the body as a JSON array of
    /// [`User`] records. The deadline covers the whole exchange, body
    /// included.
    pub async fn fetch_users(&self) -> Result<Vec<User>, Error> {
        debug!("GET {}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .header(header::CACHE_CONTROL, "no-cache")
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| classify(e, self.fetch_timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| classify(e, self.fetch_timeout))?;

        let users: Vec<User> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
            }
        })?;

        trace!("fetched {} users", users.len());
        Ok(users)
    }
}

/// Fold reqwest's timeout signal into the explicit `Timeout` variant so
/// callers classify by type, never by message text.
fn classify(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout { timeout }
    } else {
        Error::Transport(err)
    }
}
