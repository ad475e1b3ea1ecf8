//! Clap derive structures for `vsphere-inventory` and
//! `vsphere-name-generator`.
//!
//! Also compiled by `build.rs` for man page generation, so this module
//! depends on clap alone.

use std::path::PathBuf;

use clap::{Args, Parser};

const INVENTORY_EPILOG: &str = "\
You will be prompted for the password if it is not provided.

Using with Ansible:

    ansible -i vsphere-inventory all -m ping
    ansible-playbook site.yml -i vsphere-inventory

Ansible passes no arguments other than --list / --host, so configure the
connection through VSPHERE_* environment variables or the settings file.";

// ── Shared connection options ────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectionOpts {
    /// The vCenter server to connect to (host name or URL)
    #[arg(long, short = 's', env = "VSPHERE_SERVER")]
    pub server: Option<String>,

    /// The user to authenticate as
    #[arg(long, short = 'u', env = "VSPHERE_USER")]
    pub user: Option<String>,

    /// The password to authenticate with (prompted for when absent)
    #[arg(long, env = "VSPHERE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Inventory folder whose VMs are listed, e.g. Datacenter/vm/Production
    #[arg(long, short = 'p', env = "VSPHERE_PATH")]
    pub path: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "VSPHERE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Verify the server's TLS certificate against the system store
    #[arg(long, env = "VSPHERE_VERIFY_TLS")]
    pub verify_tls: bool,

    /// PEM CA certificate to trust for the server (implies verification)
    #[arg(long, env = "VSPHERE_CA_CERT", value_name = "FILE")]
    pub ca_cert: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, env = "VSPHERE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// ── vsphere-inventory ────────────────────────────────────────────────

/// vSphere Virtual Machine Ansible Inventory Lister
#[derive(Debug, Parser)]
#[command(
    name = "vsphere-inventory",
    version,
    about = "Generate a dynamic Ansible inventory from VMware vSphere",
    long_about = "Lists the virtual machines in one vSphere inventory folder as an \
        Ansible dynamic inventory, grouping hosts by their vSphere tags.",
    after_long_help = INVENTORY_EPILOG
)]
pub struct InventoryCli {
    /// Output all groups and hosts (the default)
    #[arg(long, conflicts_with = "host")]
    pub list: bool,

    /// Output the variables of a single host, found by its DNS name
    #[arg(long, value_name = "HOSTNAME")]
    pub host: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionOpts,
}

// ── vsphere-name-generator ───────────────────────────────────────────

/// vSphere node name generator
#[derive(Debug, Parser)]
#[command(
    name = "vsphere-name-generator",
    version,
    about = "Generate a node name not yet used in a vSphere inventory folder",
    long_about = "Combines a random word from lefts.txt with one from rights.txt \
        into <left>-<right>, retrying until the name is not used by any VM \
        hostname under --path."
)]
pub struct NameGeneratorCli {
    /// Directory containing lefts.txt and rights.txt
    /// [default: <executable dir>/names]
    #[arg(long, env = "VSPHERE_WORDS_DIR", value_name = "DIR")]
    pub words_dir: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionOpts,
}
