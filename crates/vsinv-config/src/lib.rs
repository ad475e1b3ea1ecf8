//! Shared configuration for `vsphere-inventory` and `vsphere-name-generator`.
//!
//! Settings are layered with figment: built-in defaults, then the TOML
//! settings file, then `VSPHERE_TIMEOUT`. Command-line flags are applied on
//! top by the binaries, which also own the interactive password prompt.
//!
//! The string and flag settings (`VSPHERE_SERVER`, `VSPHERE_PASSWORD`,
//! `VSPHERE_VERIFY_TLS`, ...) are read from the environment by clap as raw
//! text. figment's `Env` provider would parse `123456` or `true` into typed
//! values that no longer deserialize into a `String`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vsinv_core::{ConnectionConfig, TlsVerification, sdk_url};

/// Prefix of every environment variable read as a setting.
pub const ENV_PREFIX: &str = "VSPHERE_";

/// Settings taken from `VSPHERE_*` here rather than by the binaries' flags.
const ENV_KEYS: &[&str] = &["timeout"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {setting} configured (use --{flag} or VSPHERE_{env})")]
    Missing {
        setting: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Every setting the tools understand. All connection fields are optional
/// here; [`Config::connection_config`] enforces what a session needs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// vCenter host name, or a full URL for non-standard endpoints.
    pub server: Option<String>,

    pub user: Option<String>,

    /// Plaintext password. Prefer the prompt or `VSPHERE_PASSWORD`.
    pub password: Option<String>,

    /// Inventory folder to list, e.g. `Datacenter/vm/Production`.
    pub path: Option<String>,

    /// Verify the server certificate against the system store.
    #[serde(default)]
    pub verify_tls: bool,

    /// PEM file with a CA certificate to trust (implies verification).
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Directory holding `lefts.txt` and `rights.txt` for name generation.
    pub words_dir: Option<PathBuf>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: None,
            user: None,
            password: None,
            path: None,
            verify_tls: false,
            ca_cert: None,
            timeout: default_timeout(),
            words_dir: None,
        }
    }
}

impl Config {
    /// TLS mode implied by `ca_cert` and `verify_tls`.
    pub fn tls(&self) -> TlsVerification {
        match (&self.ca_cert, self.verify_tls) {
            (Some(path), _) => TlsVerification::CustomCa(path.clone()),
            (None, true) => TlsVerification::SystemDefaults,
            (None, false) => TlsVerification::DangerAcceptInvalid,
        }
    }

    /// The configured server, or a [`ConfigError::Missing`].
    pub fn require_server(&self) -> Result<&str, ConfigError> {
        self.server
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing {
                setting: "vCenter server",
                flag: "server",
                env: "SERVER",
            })
    }

    /// The configured user, or a [`ConfigError::Missing`].
    pub fn require_user(&self) -> Result<&str, ConfigError> {
        self.user
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing {
                setting: "vCenter user",
                flag: "user",
                env: "USER",
            })
    }

    /// The configured inventory path, or a [`ConfigError::Missing`].
    pub fn require_path(&self) -> Result<&str, ConfigError> {
        self.path
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing {
                setting: "inventory path",
                flag: "path",
                env: "PATH",
            })
    }

    /// Build a [`ConnectionConfig`] with an already-resolved password.
    pub fn connection_config(
        &self,
        password: SecretString,
    ) -> Result<ConnectionConfig, ConfigError> {
        let server = self.require_server()?;
        let url = sdk_url(server).map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: e.to_string(),
        })?;

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(ConnectionConfig {
            url,
            username: self.require_user()?.to_owned(),
            password,
            tls: self.tls(),
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "vsinv", "vsinv").map_or_else(
        || PathBuf::from(".vsinv.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load settings from the default file path and `VSPHERE_TIMEOUT`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load settings from `path` (a missing file is not an error) and
/// `VSPHERE_TIMEOUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS));

    let config: Config = figment.extract()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn load(path: &str) -> Result<Config, figment::Error> {
        load_config_from(Path::new(path)).map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let cfg = load("absent.toml")?;
            assert_eq!(cfg.server, None);
            assert_eq!(cfg.timeout, 30);
            assert!(!cfg.verify_tls);
            Ok(())
        });
    }

    #[test]
    fn file_values_are_read() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "vsinv.toml",
                r#"
                server = "vc01.lab"
                user = "ansible"
                path = "Lab/vm/Prod"
                timeout = 10
                "#,
            )?;
            let cfg = load("vsinv.toml")?;
            assert_eq!(cfg.server.as_deref(), Some("vc01.lab"));
            assert_eq!(cfg.user.as_deref(), Some("ansible"));
            assert_eq!(cfg.path.as_deref(), Some("Lab/vm/Prod"));
            assert_eq!(cfg.timeout, 10);
            Ok(())
        });
    }

    #[test]
    fn environment_timeout_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("vsinv.toml", "server = \"from-file\"\ntimeout = 20")?;
            jail.set_env("VSPHERE_TIMEOUT", "5");

            let cfg = load("vsinv.toml")?;
            assert_eq!(cfg.server.as_deref(), Some("from-file"));
            assert_eq!(cfg.timeout, 5);
            Ok(())
        });
    }

    #[test]
    fn string_settings_in_environment_do_not_break_loading() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("vsinv.toml", "user = \"file-user\"")?;
            jail.set_env("VSPHERE_PASSWORD", "123456");
            jail.set_env("VSPHERE_USER", "true");
            jail.set_env("VSPHERE_PATH", "[s3cret]");
            jail.set_env("VSPHERE_VERIFY_TLS", "1");
            jail.set_env("VSPHERE_WORDS_DIR", "2024");

            let cfg = load("absent.toml")?;
            assert_eq!(cfg.password, None);
            assert_eq!(cfg.path, None);
            assert!(!cfg.verify_tls);

            let cfg = load("vsinv.toml")?;
            assert_eq!(cfg.user.as_deref(), Some("file-user"));
            Ok(())
        });
    }

    #[test]
    fn tls_mode_selection() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.tls(), TlsVerification::DangerAcceptInvalid));

        cfg.verify_tls = true;
        assert!(matches!(cfg.tls(), TlsVerification::SystemDefaults));

        cfg.ca_cert = Some(PathBuf::from("ca.pem"));
        assert!(matches!(cfg.tls(), TlsVerification::CustomCa(_)));
    }

    #[test]
    fn connection_config_requires_server_and_user() {
        let cfg = Config::default();
        let err = cfg
            .connection_config(SecretString::from("pw".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { flag: "server", .. }));

        let cfg = Config {
            server: Some("vc01".into()),
            ..Config::default()
        };
        let err = cfg
            .connection_config(SecretString::from("pw".to_owned()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no vCenter user configured (use --user or VSPHERE_USER)"
        );
    }

    #[test]
    fn connection_config_builds_sdk_url() {
        let cfg = Config {
            server: Some("vc01.lab".into()),
            user: Some("ansible".into()),
            timeout: 12,
            ..Config::default()
        };
        let conn = cfg
            .connection_config(SecretString::from("pw".to_owned()))
            .unwrap();

        assert_eq!(conn.url.as_str(), "https://vc01.lab/sdk");
        assert_eq!(conn.username, "ansible");
        assert_eq!(conn.password.expose_secret(), "pw");
        assert_eq!(conn.timeout, Duration::from_secs(12));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = Config {
            server: Some("vc01".into()),
            user: Some("u".into()),
            timeout: 0,
            ..Config::default()
        };
        let err = cfg
            .connection_config(SecretString::from("pw".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
