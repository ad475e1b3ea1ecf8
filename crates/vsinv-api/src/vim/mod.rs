// vim25 SOAP surface: session, discovery, search and property retrieval.

pub mod client;
pub mod directory;
pub(crate) mod envelope;
pub mod models;
pub mod properties;
pub mod search;
pub mod session;

pub use client::{VIM_NAMESPACE, VimClient};
pub use directory::INVENTORY_SERVICE_PREFIX;
pub use models::{
    GuestNicInfo, ManagedObjectReference, ServiceContent, ServiceEndpoint,
    VirtualMachineProperties,
};
