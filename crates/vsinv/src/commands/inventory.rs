//! `vsphere-inventory`: the Ansible dynamic inventory.

use tracing::debug;

use vsinv_core::{Connection, build_inventory_document, list_vms_at_path, lookup_single_host};

use crate::cli::InventoryCli;
use crate::commands::{connect, until_interrupted};
use crate::config::{connection_config, resolve_settings};
use crate::error::CliError;
use crate::output::{print_output, render_json};

/// What Ansible asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `--list`: every host under the inventory path, grouped by tag.
    List { path: String },
    /// `--host`: the variables of one host, or `{}`.
    Host { hostname: String },
}

pub async fn run(cli: InventoryCli) -> Result<(), CliError> {
    let settings = resolve_settings(&cli.connection)?;

    let request = match cli.host {
        Some(hostname) => Request::Host { hostname },
        None => Request::List {
            path: settings.require_path()?.to_owned(),
        },
    };
    debug!(?request, "resolved request");

    let connection = connect(&connection_config(&settings)?).await?;
    let result = until_interrupted(render(&connection, &request)).await;
    connection.disconnect().await;

    print_output(&result?)?;
    Ok(())
}

/// Produce the JSON document for `request`.
pub async fn render(connection: &Connection, request: &Request) -> Result<String, CliError> {
    match request {
        Request::List { path } => {
            let query = connection.establish_query_session().await?;
            let vms = list_vms_at_path(connection.vim(), &query, path).await?;
            Ok(render_json(&build_inventory_document(vms))?)
        }
        Request::Host { hostname } => match lookup_single_host(connection.vim(), hostname).await? {
            Some(vm) => Ok(render_json(&vm)?),
            None => Ok(render_json(&serde_json::Map::new())?),
        },
    }
}
