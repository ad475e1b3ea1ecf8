// ── API-to-domain type conversions ──
//
// Bridges raw `vsinv_api` response types into canonical `vsinv_core::model`
// domain types. Missing optional data gets a default; values vSphere should
// never send are logged and normalized rather than failing the whole run.

use tracing::warn;

use vsinv_api::{TaggedVm, VirtualMachineProperties};

use crate::model::{PowerState, Tag, TagAssignment, VmRecord, select_primary_ipv4};

// ── Helpers ────────────────────────────────────────────────────────

fn parse_power_state(vm_name: &str, raw: Option<&str>) -> PowerState {
    match raw.map(str::parse::<PowerState>) {
        Some(Ok(state)) => state,
        Some(Err(_)) => {
            warn!(vm = vm_name, state = ?raw, "unknown power state, treating as poweredOff");
            PowerState::PoweredOff
        }
        None => {
            warn!(vm = vm_name, "no power state reported, treating as poweredOff");
            PowerState::PoweredOff
        }
    }
}

// ── Virtual machines ───────────────────────────────────────────────

impl From<VirtualMachineProperties> for VmRecord {
    fn from(vm: VirtualMachineProperties) -> Self {
        let power_state = parse_power_state(&vm.name, vm.power_state.as_deref());

        let hostname = vm
            .guest_hostname
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| vm.name.clone());

        // Adapters without a network (loopback, unbacked) are not reachable.
        let ip_addresses: Vec<String> = vm
            .nics
            .into_iter()
            .filter(|nic| nic.network.is_some())
            .flat_map(|nic| nic.ip_addresses)
            .collect();

        let primary_ipv4 = select_primary_ipv4(&ip_addresses);

        Self {
            unique_id: vm.uuid.unwrap_or_default(),
            name: vm.name,
            power_state,
            hostname,
            ip_addresses,
            primary_ipv4,
            tags: Vec::new(),
        }
    }
}

// ── Tag assignments ────────────────────────────────────────────────

/// Convert one tagged-VM row; rows without a uuid cannot be joined and are
/// skipped.
pub fn tag_assignment(vm: TaggedVm) -> Option<TagAssignment> {
    let Some(uuid) = vm.uuid else {
        warn!(vm = %vm.name, "tag assignment without a uuid, skipping");
        return None;
    };

    Some(TagAssignment {
        vm_unique_id: uuid,
        vm_name: vm.name,
        tags: vm
            .tags
            .into_iter()
            .map(|t| Tag {
                name: t.name,
                category: t.category,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vsinv_api::{GuestNicInfo, ServiceTag};

    use super::*;

    fn props() -> VirtualMachineProperties {
        VirtualMachineProperties {
            moref: None,
            name: "web-1".into(),
            template: false,
            uuid: Some("4231-aaaa".into()),
            power_state: Some("poweredOn".into()),
            guest_hostname: Some("web-1.example.com".into()),
            nics: vec![
                GuestNicInfo {
                    network: None,
                    ip_addresses: vec!["127.0.0.1".into()],
                },
                GuestNicInfo {
                    network: Some("VM Network".into()),
                    ip_addresses: vec!["fe80::1".into(), "10.1.2.3".into()],
                },
            ],
        }
    }

    #[test]
    fn converts_full_vm() {
        let vm = VmRecord::from(props());
        assert_eq!(vm.name, "web-1");
        assert_eq!(vm.unique_id, "4231-aaaa");
        assert_eq!(vm.power_state, PowerState::PoweredOn);
        assert_eq!(vm.hostname, "web-1.example.com");
        assert_eq!(vm.ip_addresses, vec!["fe80::1".to_owned(), "10.1.2.3".to_owned()]);
        assert_eq!(vm.primary_ipv4.as_deref(), Some("10.1.2.3"));
        assert!(vm.tags.is_empty());
    }

    #[test]
    fn hostname_falls_back_to_name() {
        let missing = VmRecord::from(VirtualMachineProperties {
            guest_hostname: None,
            ..props()
        });
        assert_eq!(missing.hostname, "web-1");

        let empty = VmRecord::from(VirtualMachineProperties {
            guest_hostname: Some(String::new()),
            ..props()
        });
        assert_eq!(empty.hostname, "web-1");
    }

    #[test]
    fn no_networked_nic_means_no_addresses() {
        let vm = VmRecord::from(VirtualMachineProperties {
            nics: vec![GuestNicInfo {
                network: None,
                ip_addresses: vec!["10.0.0.9".into()],
            }],
            ..props()
        });
        assert!(vm.ip_addresses.is_empty());
        assert_eq!(vm.primary_ipv4, None);
    }

    #[test]
    fn unknown_power_state_is_powered_off() {
        let vm = VmRecord::from(VirtualMachineProperties {
            power_state: Some("exploded".into()),
            ..props()
        });
        assert_eq!(vm.power_state, PowerState::PoweredOff);
    }

    #[test]
    fn tagged_vm_without_uuid_is_skipped() {
        let row = TaggedVm {
            uuid: None,
            name: "orphan".into(),
            tags: Vec::new(),
        };
        assert_eq!(tag_assignment(row), None);
    }

    #[test]
    fn tagged_vm_maps_tags() {
        let row = TaggedVm {
            uuid: Some("u-1".into()),
            name: "db-1".into(),
            tags: vec![ServiceTag {
                name: "database".into(),
                category: "Role".into(),
            }],
        };
        let assignment = tag_assignment(row).unwrap_or_else(|| panic!("assignment expected"));
        assert_eq!(assignment.vm_unique_id, "u-1");
        assert_eq!(assignment.tag_names(), vec!["database".to_owned()]);
        assert_eq!(assignment.tags[0].category, "Role");
    }
}
