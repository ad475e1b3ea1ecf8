//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text, and owns the exit code of every failure.

use miette::Diagnostic;
use thiserror::Error;

use vsinv_config::ConfigError;
use vsinv_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    /// Connection or authentication failure, missing setting, or an
    /// exhausted name space.
    pub const FATAL: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to vSphere at {url}")]
    #[diagnostic(
        code(vsinv::connection_failed),
        help(
            "Check that vCenter is reachable from this host.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(vsinv::auth_failed),
        help("Check --user / VSPHERE_USER and the password.")
    )]
    AuthFailed { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(vsinv::timeout),
        help("Increase the timeout with --timeout or VSPHERE_TIMEOUT.")
    )]
    Timeout { seconds: u64 },

    #[error("vCenter has no '{service}' service")]
    #[diagnostic(
        code(vsinv::service_not_found),
        help("Tags are read from the vSphere Inventory Service; check that it is deployed and registered.")
    )]
    ServiceNotFound { service: String },

    #[error("vSphere API error: {message}")]
    #[diagnostic(code(vsinv::api_error))]
    Api { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No {setting} configured")]
    #[diagnostic(
        code(vsinv::missing_setting),
        help("Pass --{flag}, set {env}, or add it to the settings file.")
    )]
    MissingSetting {
        setting: String,
        flag: String,
        env: String,
    },

    #[error("Could not read the password")]
    #[diagnostic(
        code(vsinv::password_prompt),
        help("No terminal to prompt on. Pass --password or set VSPHERE_PASSWORD.")
    )]
    PasswordPrompt {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vsinv::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(vsinv::config))]
    Config(Box<figment::Error>),

    // ── Name generation ──────────────────────────────────────────────
    #[error("Failed to generate a new, unique, name after {attempts} attempts")]
    #[diagnostic(
        code(vsinv::names_exhausted),
        help("Add words to lefts.txt / rights.txt.")
    )]
    NameSpaceExhausted { attempts: usize },

    #[error("Word list problem: {message}")]
    #[diagnostic(
        code(vsinv::word_list),
        help("Word lists are read from --words-dir, VSPHERE_WORDS_DIR or <executable dir>/names.")
    )]
    WordList { message: String },

    // ── Process ──────────────────────────────────────────────────────
    #[error("Interrupted")]
    #[diagnostic(code(vsinv::interrupted))]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(vsinv::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. }
            | Self::AuthFailed { .. }
            | Self::Timeout { .. }
            | Self::MissingSetting { .. }
            | Self::PasswordPrompt { .. }
            | Self::Validation { .. }
            | Self::NameSpaceExhausted { .. } => exit_code::FATAL,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::ServiceNotFound { service } => CliError::ServiceNotFound { service },
            CoreError::NameSpaceExhausted { attempts } => CliError::NameSpaceExhausted { attempts },
            CoreError::EmptyWordList { side } => CliError::WordList {
                message: format!("the {side} word list is empty"),
            },
            CoreError::Api { message, .. } => CliError::Api { message },
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { setting, flag, env } => CliError::MissingSetting {
                setting: setting.into(),
                flag: flag.into(),
                env: format!("{}{env}", vsinv_config::ENV_PREFIX),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config(e),
        }
    }
}
