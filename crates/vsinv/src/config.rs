//! CLI configuration: thin wrapper around `vsinv_config`.
//!
//! Applies command-line flags on top of the settings file and environment,
//! prompts for the password when none is configured, and locates the
//! name generator's word lists.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use vsinv_config::{Config, load_config, load_config_from};
use vsinv_core::ConnectionConfig;

use crate::cli::ConnectionOpts;
use crate::error::CliError;

/// Settings from file and environment, with flags applied on top.
///
/// An explicit `--config` file must exist; the default location may be
/// absent.
pub fn resolve_settings(opts: &ConnectionOpts) -> Result<Config, CliError> {
    let mut cfg = match &opts.config {
        Some(path) => {
            if !path.is_file() {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} does not exist", path.display()),
                });
            }
            load_config_from(path)?
        }
        None => load_config()?,
    };

    apply_flags(&mut cfg, opts);
    Ok(cfg)
}

fn apply_flags(cfg: &mut Config, opts: &ConnectionOpts) {
    if let Some(ref server) = opts.server {
        cfg.server = Some(server.clone());
    }
    if let Some(ref user) = opts.user {
        cfg.user = Some(user.clone());
    }
    if let Some(ref password) = opts.password {
        cfg.password = Some(password.clone());
    }
    if let Some(ref path) = opts.path {
        cfg.path = Some(path.clone());
    }
    if let Some(timeout) = opts.timeout {
        cfg.timeout = timeout;
    }
    if opts.verify_tls {
        cfg.verify_tls = true;
    }
    if let Some(ref ca_cert) = opts.ca_cert {
        cfg.ca_cert = Some(ca_cert.clone());
    }
}

/// Connection parameters, prompting for the password if needed.
///
/// Server and user are checked first so a missing setting is reported
/// before any prompt appears.
pub fn connection_config(cfg: &Config) -> Result<ConnectionConfig, CliError> {
    cfg.require_server()?;
    let user = cfg.require_user()?;

    let password = match cfg.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => prompt_password(user)?,
    };

    Ok(cfg.connection_config(password)?)
}

fn prompt_password(user: &str) -> Result<SecretString, CliError> {
    rpassword::prompt_password(format!("vCenter password for {user}: "))
        .map(SecretString::from)
        .map_err(|source| CliError::PasswordPrompt { source })
}

/// Directory holding `lefts.txt` and `rights.txt`: the configured one, or
/// `names/` next to the executable.
pub fn words_dir(cfg: &Config, flag: Option<&Path>) -> Result<PathBuf, CliError> {
    if let Some(dir) = flag.or(cfg.words_dir.as_deref()) {
        return Ok(dir.to_path_buf());
    }

    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| CliError::WordList {
        message: format!("cannot locate the directory of {}", exe.display()),
    })?;
    Ok(dir.join("names"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::InventoryCli;

    fn opts(args: &[&str]) -> ConnectionOpts {
        let mut argv = vec!["vsphere-inventory"];
        argv.extend_from_slice(args);
        InventoryCli::try_parse_from(argv).unwrap().connection
    }

    #[test]
    fn flags_override_settings() {
        let mut cfg = Config {
            server: Some("file-server".into()),
            user: Some("file-user".into()),
            timeout: 30,
            ..Config::default()
        };
        apply_flags(&mut cfg, &opts(&["-s", "flag-server", "--timeout", "7", "--verify-tls"]));

        assert_eq!(cfg.server.as_deref(), Some("flag-server"));
        assert_eq!(cfg.user.as_deref(), Some("file-user"));
        assert_eq!(cfg.timeout, 7);
        assert!(cfg.verify_tls);
    }

    #[test]
    fn configured_password_skips_prompt() {
        let cfg = Config {
            server: Some("vc01".into()),
            user: Some("ansible".into()),
            password: Some("pw".into()),
            ..Config::default()
        };
        let conn = connection_config(&cfg).unwrap();
        assert_eq!(conn.url.as_str(), "https://vc01/sdk");
    }

    #[test]
    fn missing_server_reported_before_prompt() {
        let cfg = Config::default();
        let err = connection_config(&cfg).unwrap_err();
        assert!(matches!(err, CliError::MissingSetting { .. }));
    }

    #[test]
    fn explicit_words_dir_wins() {
        let cfg = Config {
            words_dir: Some(PathBuf::from("/from/settings")),
            ..Config::default()
        };
        let flag = PathBuf::from("/from/flag");
        assert_eq!(words_dir(&cfg, Some(flag.as_path())).unwrap(), flag);
        assert_eq!(
            words_dir(&cfg, None).unwrap(),
            PathBuf::from("/from/settings")
        );
    }

    #[test]
    fn default_words_dir_is_next_to_executable() {
        let dir = words_dir(&Config::default(), None).unwrap();
        assert!(dir.ends_with("names"));
    }
}
