//! `vsphere-name-generator`: a node name not yet used under the inventory
//! path.

use std::path::Path;

use tracing::info;

use vsinv_core::{
    Connection, CoreError, DEFAULT_MAX_ATTEMPTS, WordList, generate_unique_name, list_vms_at_path,
};

use crate::cli::NameGeneratorCli;
use crate::commands::{connect, until_interrupted};
use crate::config::{connection_config, resolve_settings, words_dir};
use crate::error::CliError;
use crate::output::print_output;

pub async fn run(cli: NameGeneratorCli) -> Result<(), CliError> {
    let settings = resolve_settings(&cli.connection)?;
    let path = settings.require_path()?.to_owned();

    // Word lists are read before connecting so a bad install fails fast.
    let dir = words_dir(&settings, cli.words_dir.as_deref())?;
    let lefts = load_words(&dir.join("lefts.txt"))?;
    let rights = load_words(&dir.join("rights.txt"))?;

    let connection = connect(&connection_config(&settings)?).await?;
    let known = until_interrupted(known_hostnames(&connection, &path)).await;
    connection.disconnect().await;

    let name = generate_unique_name(&known?, &lefts, &rights, DEFAULT_MAX_ATTEMPTS)?;
    info!(name = %name, "generated name");
    print_output(&name)?;
    Ok(())
}

/// Hostnames of the VMs under `path`.
async fn known_hostnames(connection: &Connection, path: &str) -> Result<Vec<String>, CliError> {
    let query = connection.establish_query_session().await?;
    let vms = list_vms_at_path(connection.vim(), &query, path).await?;
    Ok(vms.into_iter().map(|vm| vm.hostname).collect())
}

fn load_words(path: &Path) -> Result<WordList, CliError> {
    WordList::from_file(path).map_err(|e| CliError::WordList {
        message: match e {
            CoreError::Config { message } => message,
            other => other.to_string(),
        },
    })
}
