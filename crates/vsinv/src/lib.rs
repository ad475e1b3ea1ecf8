//! Command-line front end shared by `vsphere-inventory` and
//! `vsphere-name-generator`.
//!
//! Both binaries parse their flags ([`cli`]), layer them over the settings
//! file ([`config`]), run one command against a single vCenter session
//! ([`commands`]) and report failures through [`error::CliError`], which
//! owns the exit code.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the level from `warn`.
pub fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
