use thiserror::Error;

/// Top-level error type for the `vsinv-api` crate.
///
/// Covers every failure mode of both wire surfaces: the vim SOAP endpoint
/// and the Inventory Service query endpoint. `vsinv-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, ticket refused, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The server no longer recognises the session cookie.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out, after the single retry.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status with a body that carried no SOAP fault.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── SOAP ────────────────────────────────────────────────────────
    /// A SOAP fault returned by the vim endpoint.
    #[error("vSphere fault ({fault}): {message}")]
    Fault { fault: String, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response was not well-formed XML.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// A required element was absent from an otherwise valid response.
    #[error("Response is missing <{element}>")]
    MissingElement { element: &'static str },

    // ── Discovery ───────────────────────────────────────────────────
    /// No service endpoint matched the requested name prefix.
    #[error("No service endpoint named '{prefix}*' is registered")]
    ServiceNotFound { prefix: String },
}

impl Error {
    /// Returns `true` if the failure happened before any response arrived.
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_request(),
            Self::Tls(_) => true,
            _ => false,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml {
            message: err.to_string(),
        }
    }
}
