// ── Tag assignment fetch and merge ──

use tracing::debug;

use vsinv_api::QueryClient;

use crate::convert::tag_assignment;
use crate::error::CoreError;
use crate::model::{TagAssignment, VmRecord};

/// Run the tag-assignment query against an Inventory Service session.
pub async fn fetch_all_tag_assignments(
    query: &QueryClient,
) -> Result<Vec<TagAssignment>, CoreError> {
    let assignments: Vec<TagAssignment> = query
        .tagged_vms()
        .await?
        .into_iter()
        .filter_map(tag_assignment)
        .collect();

    debug!(count = assignments.len(), "fetched tag assignments");
    Ok(assignments)
}

/// A copy of `vm` whose tags are the names from the assignment with the
/// same unique id, or empty when no assignment matches.
pub fn merge_tags(assignments: &[TagAssignment], vm: &VmRecord) -> VmRecord {
    let tags = if vm.unique_id.is_empty() {
        Vec::new()
    } else {
        assignments
            .iter()
            .find(|a| a.vm_unique_id == vm.unique_id)
            .map(TagAssignment::tag_names)
            .unwrap_or_default()
    };
    vm.with_tags(tags)
}
