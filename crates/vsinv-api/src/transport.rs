// Shared transport configuration for building reqwest::Client instances.
//
// The vim client and the query client share TLS, timeout, and cookie
// settings through this module. Each client gets its own cookie jar: the
// vim session cookie and the Inventory Service session cookie live on
// different hosts and must not leak into one another.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use tracing::warn;

use crate::error::Error;

/// TLS verification mode (api-level mirror of core's TlsVerification).
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (vCenter ships self-signed certificates).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("vsinv/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Create a config with a fresh cookie jar (for session auth).
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}

/// Send a request, retrying exactly once if the first attempt times out.
///
/// A second timeout surfaces as [`Error::Timeout`]. Any other transport
/// failure is returned immediately.
pub(crate) async fn send_with_retry(
    builder: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<reqwest::Response, Error> {
    let retry = builder.try_clone();

    match builder.send().await {
        Ok(resp) => Ok(resp),
        Err(e) if e.is_timeout() => {
            let Some(retry) = retry else {
                return Err(Error::Timeout {
                    timeout_secs: timeout.as_secs(),
                });
            };
            warn!(url = ?e.url().map(url::Url::as_str), "request timed out, retrying once");
            retry.send().await.map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout {
                        timeout_secs: timeout.as_secs(),
                    }
                } else {
                    Error::Transport(e)
                }
            })
        }
        Err(e) => Err(Error::Transport(e)),
    }
}

/// Read a response body. A timeout while streaming it is reported with the
/// configured limit, like one during [`send_with_retry`].
pub(crate) async fn read_body(resp: reqwest::Response, timeout: Duration) -> Result<String, Error> {
    resp.text().await.map_err(|e| {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: timeout.as_secs(),
            }
        } else {
            Error::Transport(e)
        }
    })
}
