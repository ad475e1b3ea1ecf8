// ── Connection configuration ──
//
// Everything needed to open a vim session. Built by the binaries from
// flags, environment and the settings file; the core never reads those
// sources itself.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// How to verify the vCenter TLS certificate.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// Use the system certificate store.
    SystemDefaults,
    /// Trust a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate. vCenter appliances ship self-signed
    /// certificates, so this is the default.
    #[default]
    DangerAcceptInvalid,
}

/// Connection parameters for one vCenter.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// SDK endpoint, e.g. `https://vcenter.example.com/sdk`.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Applied to every HTTP request (each is retried once on timeout).
    pub timeout: Duration,
}

/// Derive the SDK endpoint from a `--server` value.
///
/// A bare host (`vcenter.example.com`, `10.0.0.2:8443`) becomes
/// `https://<host>/sdk`. A value with a scheme is taken as the base URL and
/// gets `/sdk` appended unless it already ends with it.
pub fn sdk_url(server: &str) -> Result<Url, CoreError> {
    let server = server.trim();
    if server.is_empty() {
        return Err(CoreError::Config {
            message: "server must not be empty".into(),
        });
    }

    let base = if server.contains("://") {
        server.trim_end_matches('/').to_owned()
    } else {
        format!("https://{}", server.trim_end_matches('/'))
    };

    let full = if base.ends_with("/sdk") {
        base
    } else {
        format!("{base}/sdk")
    };

    Url::parse(&full).map_err(|e| CoreError::Config {
        message: format!("invalid server '{server}': {e}"),
    })
}
