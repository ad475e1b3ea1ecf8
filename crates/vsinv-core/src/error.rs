// ── Core error types ──
//
// User-facing errors from vsinv-core. Consumers never see HTTP status codes
// or XML parse failures directly: the `From<vsinv_api::Error>` impl
// translates wire-level errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to vSphere at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("vSphere request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Discovery errors ─────────────────────────────────────────────
    #[error("vSphere does not expose a '{service}' service endpoint")]
    ServiceNotFound { service: String },

    // ── Name generation ──────────────────────────────────────────────
    #[error("Failed to generate a new, unique, name after {attempts} attempts")]
    NameSpaceExhausted { attempts: usize },

    #[error("The {side} word list is empty")]
    EmptyWordList { side: &'static str },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("vSphere API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures to reach or authenticate with vSphere.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::AuthenticationFailed { .. } | Self::Timeout { .. }
        )
    }
}

// ── Conversion from wire-level errors ────────────────────────────────

impl From<vsinv_api::Error> for CoreError {
    fn from(err: vsinv_api::Error) -> Self {
        use vsinv_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            // Timeouts arrive as `ApiError::Timeout` with the configured limit.
            ApiError::Transport(ref e) => {
                if e.is_connect() || e.is_request() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::Tls(message) => CoreError::Config { message },
            ApiError::Http { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            ApiError::Fault { fault, message } => CoreError::Api {
                message: format!("{fault}: {message}"),
                status: None,
            },
            ApiError::Xml { message } => CoreError::Api {
                message: format!("malformed response: {message}"),
                status: None,
            },
            ApiError::MissingElement { element } => CoreError::Api {
                message: format!("malformed response: missing <{element}>"),
                status: None,
            },
            ApiError::ServiceNotFound { prefix } => CoreError::ServiceNotFound {
                service: prefix.trim_end_matches('/').to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_not_found_names_the_service() {
        let err: CoreError = vsinv_api::Error::ServiceNotFound {
            prefix: "VSPHERE-INVENTORY-SERVICE/".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "vSphere does not expose a 'VSPHERE-INVENTORY-SERVICE' service endpoint"
        );
        assert!(!err.is_connection_failure());
    }

    #[test]
    fn timeout_reports_the_configured_limit() {
        let err: CoreError = vsinv_api::Error::Timeout { timeout_secs: 30 }.into();
        assert_eq!(err.to_string(), "vSphere request timed out after 30s");
        assert!(err.is_connection_failure());
    }

    #[test]
    fn invalid_login_is_a_connection_failure() {
        let err: CoreError = vsinv_api::Error::Authentication {
            message: "bad password".into(),
        }
        .into();
        assert!(err.is_connection_failure());
    }
}
