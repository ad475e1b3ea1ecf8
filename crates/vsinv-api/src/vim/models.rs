// Raw vim response types
//
// Thin, lossless views over the XML the SOAP endpoint returns. Field names
// follow the vSphere property paths they were read from; no domain
// interpretation happens here (that lives in `vsinv-core::convert`).

use crate::error::Error;
use crate::xml::XmlElement;

/// A managed object reference: `<x type="Folder">group-v3</x>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagedObjectReference {
    pub kind: String,
    pub value: String,
}

impl ManagedObjectReference {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Read a reference from an element carrying a `type` attribute.
    pub fn from_element(element: &XmlElement) -> Option<Self> {
        let kind = element.attr("type")?;
        let value = element.text();
        if value.is_empty() {
            return None;
        }
        Some(Self::new(kind, value))
    }

    pub fn is_virtual_machine(&self) -> bool {
        self.kind == "VirtualMachine"
    }

    pub fn is_folder(&self) -> bool {
        self.kind == "Folder"
    }

    /// The well-known `ServiceInstance` root object.
    pub fn service_instance() -> Self {
        Self::new("ServiceInstance", "ServiceInstance")
    }

    /// The well-known service directory object used for endpoint discovery.
    pub fn service_directory() -> Self {
        Self::new("ServiceDirectory", "ServiceDirectory")
    }
}

impl std::fmt::Display for ManagedObjectReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// The subset of `ServiceContent` this client needs.
#[derive(Debug, Clone)]
pub struct ServiceContent {
    pub root_folder: ManagedObjectReference,
    pub property_collector: ManagedObjectReference,
    pub session_manager: ManagedObjectReference,
    pub search_index: ManagedObjectReference,
    /// `about.fullName`, e.g. "VMware vCenter Server 6.0.0 build-3634794".
    pub full_name: Option<String>,
    /// `about.apiVersion`, e.g. "6.0".
    pub api_version: Option<String>,
}

impl ServiceContent {
    pub(crate) fn from_returnval(returnval: &XmlElement) -> Result<Self, Error> {
        let moref = |name: &'static str| {
            returnval
                .child(name)
                .and_then(ManagedObjectReference::from_element)
                .ok_or(Error::MissingElement { element: name })
        };

        let about = returnval.child("about");

        Ok(Self {
            root_folder: moref("rootFolder")?,
            property_collector: moref("propertyCollector")?,
            session_manager: moref("sessionManager")?,
            search_index: moref("searchIndex")?,
            full_name: about
                .and_then(|a| a.child_text("fullName"))
                .map(String::from),
            api_version: about
                .and_then(|a| a.child_text("apiVersion"))
                .map(String::from),
        })
    }
}

/// One entry of `QueryServiceEndpointList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub name: String,
    pub uuid: String,
    pub url: String,
    pub key: String,
}

impl ServiceEndpoint {
    pub(crate) fn from_returnval(returnval: &XmlElement) -> Result<Self, Error> {
        let field = |name: &'static str| {
            returnval
                .first_descendant(name)
                .map(|e| e.text().to_owned())
                .ok_or(Error::MissingElement { element: name })
        };

        Ok(Self {
            name: field("instanceName")?,
            uuid: field("instanceUuid")?,
            url: field("url")?,
            key: field("key")?,
        })
    }
}

/// One `GuestNicInfo` from a VM's `guest.net` property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestNicInfo {
    /// Port group name; absent for adapters not backed by a vSphere network.
    pub network: Option<String>,
    pub ip_addresses: Vec<String>,
}

impl GuestNicInfo {
    fn from_element(element: &XmlElement) -> Self {
        Self {
            network: element
                .child_text("network")
                .filter(|n| !n.is_empty())
                .map(String::from),
            ip_addresses: element
                .children_named("ipAddress")
                .map(|ip| ip.text().to_owned())
                .filter(|ip| !ip.is_empty())
                .collect(),
        }
    }
}

/// Properties fetched for each virtual machine.
///
/// Every field other than the reference and name may be unset on the
/// server (VM still being created, tools not running), so they are optional
/// or default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualMachineProperties {
    pub moref: Option<ManagedObjectReference>,
    /// `name`
    pub name: String,
    /// `config.template`
    pub template: bool,
    /// `summary.config.uuid`
    pub uuid: Option<String>,
    /// `runtime.powerState`
    pub power_state: Option<String>,
    /// `summary.guest.hostName`
    pub guest_hostname: Option<String>,
    /// `guest.net`
    pub nics: Vec<GuestNicInfo>,
}

/// Property paths requested for every VM, in request order.
pub const VM_PROPERTY_PATHS: &[&str] = &[
    "name",
    "config.template",
    "summary.config.uuid",
    "runtime.powerState",
    "summary.guest.hostName",
    "guest.net",
];

impl VirtualMachineProperties {
    /// Build from an `<objects>` element of a `RetrievePropertiesEx` result.
    pub(crate) fn from_object_content(objects: &XmlElement) -> Self {
        let mut vm = Self {
            moref: objects
                .child("obj")
                .and_then(ManagedObjectReference::from_element),
            ..Self::default()
        };

        for prop in objects.children_named("propSet") {
            let Some(val) = prop.child("val") else {
                continue;
            };
            match prop.child_text("name").unwrap_or_default() {
                "name" => vm.name = val.text().to_owned(),
                "config.template" => vm.template = val.text() == "true",
                "summary.config.uuid" => vm.uuid = non_empty(val.text()),
                "runtime.powerState" => vm.power_state = non_empty(val.text()),
                "summary.guest.hostName" => vm.guest_hostname = non_empty(val.text()),
                "guest.net" => {
                    vm.nics = val
                        .children_named("GuestNicInfo")
                        .map(GuestNicInfo::from_element)
                        .collect();
                }
                _ => {}
            }
        }

        vm
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}
