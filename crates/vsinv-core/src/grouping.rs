// ── Tag grouping and inventory document assembly ──

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::warn;

use crate::model::{InventoryDocument, RESERVED_GROUPS, VmRecord};

fn is_reserved(tag: &str) -> bool {
    RESERVED_GROUPS.contains(&tag)
}

/// Map each tag to the hostnames carrying it, in record order.
///
/// Groups exist only for tags that are in use. A host is listed once per
/// group even if its record repeats the tag.
pub fn group_by_tag<'a>(
    records: impl IntoIterator<Item = &'a VmRecord>,
) -> IndexMap<String, Vec<String>> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for vm in records {
        for tag in &vm.tags {
            let hosts = groups.entry(tag.clone()).or_default();
            if !hosts.contains(&vm.hostname) {
                hosts.push(vm.hostname.clone());
            }
        }
    }
    groups
}

/// Assemble the `_meta` / `all` / per-tag document.
///
/// Tags named like a reserved key are dropped from the record so they
/// cannot shadow `_meta` or `all`. When two records share a hostname the
/// later one wins in `hostvars` and the host keeps a single `all` slot.
pub fn build_inventory_document(records: Vec<VmRecord>) -> InventoryDocument {
    let mut doc = InventoryDocument::default();

    for mut vm in records {
        vm.tags.retain(|tag| {
            let reserved = is_reserved(tag);
            if reserved {
                warn!(host = %vm.hostname, tag = %tag, "tag uses a reserved group name, ignoring");
            }
            !reserved
        });

        match doc.hostvars.entry(vm.hostname.clone()) {
            Entry::Occupied(mut slot) => {
                warn!(
                    host = %vm.hostname,
                    replaced = %slot.get().name,
                    by = %vm.name,
                    "duplicate hostname, keeping the later VM"
                );
                slot.insert(vm);
            }
            Entry::Vacant(slot) => {
                doc.all.push(vm.hostname.clone());
                slot.insert(vm);
            }
        }
    }

    doc.groups = group_by_tag(doc.hostvars.values());
    doc
}
