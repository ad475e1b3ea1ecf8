// ── Tag domain types ──

use serde::{Deserialize, Serialize};

/// A user label and the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub category: String,
}

/// The tags attached to one VM, keyed by the VM's unique id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAssignment {
    pub vm_unique_id: String,
    /// VM name as the Inventory Service reports it (diagnostics only).
    pub vm_name: String,
    pub tags: Vec<Tag>,
}

impl TagAssignment {
    /// Tag names in assignment order.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}
