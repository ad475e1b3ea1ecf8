// ── Domain model ──
//
// Canonical types produced by one inventory run. Created fresh per query
// and never persisted.

pub mod inventory;
pub mod tag;
pub mod vm;

pub use inventory::{InventoryDocument, RESERVED_GROUPS};
pub use tag::{Tag, TagAssignment};
pub use vm::{PowerState, VmRecord, select_primary_ipv4};
