// PropertyCollector retrieval
//
// `RetrievePropertiesEx` returns at most one page of objects plus an opaque
// continuation token; the remaining pages come from
// `ContinueRetrievePropertiesEx`. Both are drained here so callers get the
// full object list.

use tracing::debug;

use crate::error::Error;
use crate::vim::client::VimClient;
use crate::vim::envelope::{SoapRequest, property_filter_spec};
use crate::vim::models::{ManagedObjectReference, VM_PROPERTY_PATHS, VirtualMachineProperties};
use crate::xml::XmlElement;

impl VimClient {
    /// Immediate children (`childEntity`) of a folder.
    ///
    /// Objects other than folders have no `childEntity` property; for them
    /// the result is empty rather than a fault.
    pub async fn retrieve_child_entities(
        &self,
        parent: &ManagedObjectReference,
    ) -> Result<Vec<ManagedObjectReference>, Error> {
        if !parent.is_folder() {
            debug!(%parent, "not a folder, no children to enumerate");
            return Ok(Vec::new());
        }

        let spec = property_filter_spec(&parent.kind, &["childEntity"], std::slice::from_ref(parent));
        let objects = self.retrieve_properties(&spec).await?;

        let children: Vec<ManagedObjectReference> = objects
            .iter()
            .flat_map(|o| o.children_named("propSet"))
            .filter(|p| p.child_text("name") == Some("childEntity"))
            .filter_map(|p| p.child("val"))
            .flat_map(XmlElement::children)
            .filter_map(ManagedObjectReference::from_element)
            .collect();

        debug!(%parent, count = children.len(), "enumerated child entities");
        Ok(children)
    }

    /// Fetch the inventory properties of the given virtual machines.
    ///
    /// Results are returned in server order; callers that need request
    /// order should match on [`VirtualMachineProperties::moref`].
    pub async fn retrieve_virtual_machines(
        &self,
        vms: &[ManagedObjectReference],
    ) -> Result<Vec<VirtualMachineProperties>, Error> {
        if vms.is_empty() {
            return Ok(Vec::new());
        }

        let spec = property_filter_spec("VirtualMachine", VM_PROPERTY_PATHS, vms);
        let objects = self.retrieve_properties(&spec).await?;

        Ok(objects
            .iter()
            .map(VirtualMachineProperties::from_object_content)
            .collect())
    }

    /// Run one property filter spec and drain every result page.
    async fn retrieve_properties(&self, spec: &str) -> Result<Vec<XmlElement>, Error> {
        let collector = &self.content().property_collector;

        let request = SoapRequest::new("RetrievePropertiesEx", collector)
            .raw(spec)
            .raw("<options></options>");
        let payload = self.invoke(request).await?;

        let mut objects = Vec::new();
        let mut token = collect_page(payload, &mut objects);

        while let Some(next) = token {
            debug!(fetched = objects.len(), "continuing property retrieval");
            let request =
                SoapRequest::new("ContinueRetrievePropertiesEx", collector).text("token", &next);
            let payload = self.invoke(request).await?;
            token = collect_page(payload, &mut objects);
        }

        Ok(objects)
    }
}

/// Move the `<objects>` of one result page into `objects` and return the
/// continuation token, if any. An empty result has no `<returnval>` at all.
fn collect_page(payload: XmlElement, objects: &mut Vec<XmlElement>) -> Option<String> {
    let returnval = payload
        .into_children()
        .into_iter()
        .find(|c| c.name() == "returnval")?;

    let token = returnval
        .child_text("token")
        .filter(|t| !t.is_empty())
        .map(String::from);

    objects.extend(
        returnval
            .into_children()
            .into_iter()
            .filter(|c| c.name() == "objects"),
    );

    token
}
