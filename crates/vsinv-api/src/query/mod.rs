// Inventory Service XQuery surface.

pub mod client;
pub mod tagging;

pub use client::QueryClient;
pub use tagging::{ServiceTag, TAG_ASSIGNMENT_QUERY, TaggedVm};
