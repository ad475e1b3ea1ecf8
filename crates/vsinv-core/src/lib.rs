//! Domain layer between `vsinv-api` and the command-line tools.
//!
//! - **[`Connection`]**: one logged-in vim session.
//!   [`connect()`](Connection::connect) authenticates,
//!   [`establish_query_session()`](Connection::establish_query_session) runs
//!   the ticket exchange for the Inventory Service, and
//!   [`disconnect()`](Connection::disconnect) logs out.
//!
//! - **Inventory** ([`list_vms_at_path`], [`lookup_single_host`]): folder
//!   enumeration, template filtering and conversion into [`VmRecord`]s.
//!
//! - **Tags** ([`fetch_all_tag_assignments`], [`merge_tags`]) and
//!   **grouping** ([`group_by_tag`], [`build_inventory_document`]): the
//!   Ansible dynamic-inventory document.
//!
//! - **Names** ([`generate_unique_name`]): `left-right` node names that do
//!   not collide with existing hosts.

pub mod config;
pub mod connection;
pub mod convert;
pub mod error;
pub mod grouping;
pub mod inventory;
pub mod model;
pub mod names;
pub mod tags;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConnectionConfig, TlsVerification, sdk_url};
pub use connection::Connection;
pub use error::CoreError;
pub use grouping::{build_inventory_document, group_by_tag};
pub use inventory::{is_template, list_vms_at_path, lookup_single_host};
pub use model::{InventoryDocument, PowerState, Tag, TagAssignment, VmRecord};
pub use names::{
    DEFAULT_MAX_ATTEMPTS, WordList, collides, generate_unique_name, generate_unique_name_with,
};
pub use tags::{fetch_all_tag_assignments, merge_tags};
