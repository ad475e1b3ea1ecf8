// ── Connection lifecycle ──
//
// A `Connection` is one logged-in vim session. It is opened with
// credentials, optionally hands out Inventory Service sessions through the
// ticket exchange, and must be closed with `disconnect()` on every exit path
// so the server-side session is released.

use tracing::{debug, info, warn};

use vsinv_api::{QueryClient, TlsMode, TransportConfig, VimClient};

use crate::config::{ConnectionConfig, TlsVerification};
use crate::error::CoreError;

/// An authenticated vim session.
pub struct Connection {
    vim: VimClient,
    transport: TransportConfig,
}

impl Connection {
    /// Retrieve service content and log in with the configured credentials.
    ///
    /// Any failure here is fatal for the caller: there is nothing to fall
    /// back to without a session.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);

        debug!(url = %config.url, "connecting to vSphere");
        let vim = VimClient::connect(config.url.clone(), &transport)
            .await
            .map_err(|e| connect_error(config, e))?;

        vim.login(&config.username, &config.password)
            .await
            .map_err(|e| connect_error(config, e))?;

        info!(user = %config.username, url = %config.url, "logged in");
        Ok(Self { vim, transport })
    }

    /// The underlying vim client.
    pub fn vim(&self) -> &VimClient {
        &self.vim
    }

    /// Open an Inventory Service session bound to this vim session.
    ///
    /// Discovers the service endpoint, acquires a ticket for its key and
    /// exchanges it with `loginByTicket`. A vCenter without an Inventory
    /// Service yields [`CoreError::ServiceNotFound`].
    pub async fn establish_query_session(&self) -> Result<QueryClient, CoreError> {
        let endpoint = self.vim.discover_inventory_service().await?;
        let ticket = self.vim.acquire_session_ticket(&endpoint.key).await?;

        let base_url = endpoint.url.parse().map_err(|e| CoreError::Api {
            message: format!("inventory service URL '{}' is invalid: {e}", endpoint.url),
            status: None,
        })?;

        let client = QueryClient::login_by_ticket(base_url, &ticket, &self.transport).await?;

        info!(endpoint = %endpoint.name, "inventory service session established");
        Ok(client)
    }

    /// Log out. Failures are logged, never returned: the process is exiting
    /// anyway and the session will expire on the server.
    pub async fn disconnect(self) {
        match self.vim.logout().await {
            Ok(()) => debug!("logged out"),
            Err(e) => warn!(error = %e, "logout failed"),
        }
    }
}

/// Build a [`TransportConfig`] from the connection configuration.
fn build_transport(config: &ConnectionConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        cookie_jar: None,
    }
    .with_cookie_jar()
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

/// Errors while opening the session are reported against the server URL.
fn connect_error(config: &ConnectionConfig, err: vsinv_api::Error) -> CoreError {
    if err.is_connection() {
        return CoreError::ConnectionFailed {
            url: config.url.to_string(),
            reason: err.to_string(),
        };
    }
    match CoreError::from(err) {
        CoreError::Timeout { .. } => CoreError::Timeout {
            timeout_secs: config.timeout.as_secs(),
        },
        other => other,
    }
}
