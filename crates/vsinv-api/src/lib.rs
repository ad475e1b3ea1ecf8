//! Async client for the vSphere web services API and the vSphere Inventory
//! Service.
//!
//! Two wire surfaces live here:
//!
//! - **[`VimClient`]**: the vim25 SOAP endpoint (`/sdk`): service content,
//!   username/password login, session tickets, service endpoint discovery,
//!   `SearchIndex` lookups and `PropertyCollector` retrieval.
//! - **[`QueryClient`]**: the Inventory Service XQuery endpoint, logged in
//!   with a ticket obtained from a [`VimClient`] session.
//!
//! Responses are decoded into small structured types; nothing above this
//! crate builds or parses SOAP envelopes.

pub mod error;
pub mod query;
pub mod transport;
pub mod vim;
pub mod xml;

pub use error::Error;
pub use query::{QueryClient, ServiceTag, TaggedVm};
pub use transport::{TlsMode, TransportConfig};
pub use vim::{
    GuestNicInfo, INVENTORY_SERVICE_PREFIX, ManagedObjectReference, ServiceContent,
    ServiceEndpoint, VimClient, VirtualMachineProperties,
};
pub use xml::XmlElement;
