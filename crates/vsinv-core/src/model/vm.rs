// ── Virtual machine domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// VM power state as reported by `runtime.powerState`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PowerState {
    PoweredOn,
    #[default]
    PoweredOff,
    Suspended,
}

/// Flat per-VM record, shaped for Ansible `hostvars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmRecord {
    pub name: String,
    #[serde(rename = "uuid")]
    pub unique_id: String,
    #[serde(rename = "status")]
    pub power_state: PowerState,
    /// Guest hostname, or the VM name when the guest reports none.
    pub hostname: String,
    #[serde(rename = "ipAddresses")]
    pub ip_addresses: Vec<String>,
    #[serde(
        rename = "ansible_ssh_host",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_ipv4: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VmRecord {
    /// Copy of this record with its tag list replaced.
    #[must_use]
    pub fn with_tags(&self, tags: Vec<String>) -> Self {
        Self {
            tags,
            ..self.clone()
        }
    }
}

/// The first address that looks like IPv4 (contains a `.`).
///
/// `None` is the normal outcome for VMs whose guest reports no IPv4 address.
pub fn select_primary_ipv4(addresses: &[String]) -> Option<String> {
    addresses.iter().find(|a| a.contains('.')).cloned()
}
