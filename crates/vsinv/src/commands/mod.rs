//! Command handlers.
//!
//! Each handler opens one vim session, does its work, and logs out on
//! every path out: success, error, or Ctrl-C.

pub mod inventory;
pub mod names;

use std::future::Future;

use tracing::{info, warn};

use vsinv_core::{Connection, ConnectionConfig};

use crate::error::CliError;

/// Run `work` unless Ctrl-C arrives first.
pub async fn until_interrupted<T>(
    work: impl Future<Output = Result<T, CliError>>,
) -> Result<T, CliError> {
    tokio::select! {
        result = work => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("interrupted");
            Err(CliError::Interrupted)
        }
    }
}

/// Open the vim session for a command.
pub async fn connect(config: &ConnectionConfig) -> Result<Connection, CliError> {
    let connection =
        until_interrupted(async { Connection::connect(config).await.map_err(CliError::from) })
            .await?;
    info!(url = %config.url, "connected");
    Ok(connection)
}
