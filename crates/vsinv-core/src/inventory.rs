// ── Inventory fetch ──
//
// Walks one inventory folder and turns its virtual machines into
// `VmRecord`s with tags merged in. Only immediate children are listed;
// nested folders are not descended into.

use tracing::{debug, info};

use vsinv_api::{ManagedObjectReference, QueryClient, VimClient, VirtualMachineProperties};

use crate::error::CoreError;
use crate::model::VmRecord;
use crate::tags::{fetch_all_tag_assignments, merge_tags};

/// Templates are flagged by vSphere, or by naming convention.
pub fn is_template(vm: &VirtualMachineProperties) -> bool {
    vm.template || vm.name.ends_with("template")
}

/// All non-template VMs directly under `path`, tagged, in enumeration order.
///
/// A path that does not exist yields an empty list, not an error.
pub async fn list_vms_at_path(
    vim: &VimClient,
    query: &QueryClient,
    path: &str,
) -> Result<Vec<VmRecord>, CoreError> {
    let Some(folder) = vim.find_by_inventory_path(path).await? else {
        info!(path, "inventory path not found");
        return Ok(Vec::new());
    };

    let vm_refs: Vec<ManagedObjectReference> = vim
        .retrieve_child_entities(&folder)
        .await?
        .into_iter()
        .filter(ManagedObjectReference::is_virtual_machine)
        .collect();

    if vm_refs.is_empty() {
        debug!(path, "no virtual machines at path");
        return Ok(Vec::new());
    }

    let mut props = vim.retrieve_virtual_machines(&vm_refs).await?;
    sort_by_reference_order(&mut props, &vm_refs);

    let records: Vec<VmRecord> = props
        .into_iter()
        .filter(|vm| {
            let template = is_template(vm);
            if template {
                debug!(vm = %vm.name, "skipping template");
            }
            !template
        })
        .map(VmRecord::from)
        .collect();

    let assignments = fetch_all_tag_assignments(query).await?;
    let tagged: Vec<VmRecord> = records
        .iter()
        .map(|vm| merge_tags(&assignments, vm))
        .collect();

    info!(path, count = tagged.len(), "listed virtual machines");
    Ok(tagged)
}

/// A single VM by guest DNS name, without tags. `None` when no VM matches.
pub async fn lookup_single_host(
    vim: &VimClient,
    hostname: &str,
) -> Result<Option<VmRecord>, CoreError> {
    let Some(moref) = vim.find_vm_by_dns_name(hostname).await? else {
        info!(hostname, "no virtual machine with that DNS name");
        return Ok(None);
    };

    let vm = vim
        .retrieve_virtual_machines(std::slice::from_ref(&moref))
        .await?
        .into_iter()
        .next()
        .map(VmRecord::from);

    Ok(vm)
}

/// Property results come back in server order; restore the order the
/// folder listed them in. Unknown objects keep their relative order at the
/// end.
fn sort_by_reference_order(
    props: &mut [VirtualMachineProperties],
    order: &[ManagedObjectReference],
) {
    props.sort_by_key(|vm| {
        vm.moref
            .as_ref()
            .and_then(|m| order.iter().position(|r| r == m))
            .unwrap_or(usize::MAX)
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn props(value: &str, name: &str) -> VirtualMachineProperties {
        VirtualMachineProperties {
            moref: Some(ManagedObjectReference::new("VirtualMachine", value)),
            name: name.into(),
            ..VirtualMachineProperties::default()
        }
    }

    #[test]
    fn template_by_flag_or_name() {
        let flagged = VirtualMachineProperties {
            template: true,
            ..props("vm-1", "web")
        };
        assert!(is_template(&flagged));
        assert!(is_template(&props("vm-2", "centos7-template")));
        assert!(!is_template(&props("vm-3", "template-builder")));
        assert!(!is_template(&props("vm-4", "web-1")));
    }

    #[test]
    fn restores_enumeration_order() {
        let order = vec![
            ManagedObjectReference::new("VirtualMachine", "vm-3"),
            ManagedObjectReference::new("VirtualMachine", "vm-1"),
            ManagedObjectReference::new("VirtualMachine", "vm-2"),
        ];
        let mut got = vec![props("vm-1", "one"), props("vm-2", "two"), props("vm-3", "three")];

        sort_by_reference_order(&mut got, &order);

        let names: Vec<&str> = got.iter().map(|vm| vm.name.as_str()).collect();
        assert_eq!(names, vec!["three", "one", "two"]);
    }
}
