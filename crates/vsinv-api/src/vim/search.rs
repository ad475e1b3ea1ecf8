// SearchIndex lookups

use tracing::debug;

use crate::error::Error;
use crate::vim::client::VimClient;
use crate::vim::envelope::SoapRequest;
use crate::vim::models::ManagedObjectReference;

impl VimClient {
    /// Resolve an inventory path (e.g. `Datacenter/vm/Production`).
    ///
    /// Returns `None` when nothing lives at that path.
    pub async fn find_by_inventory_path(
        &self,
        path: &str,
    ) -> Result<Option<ManagedObjectReference>, Error> {
        let request = SoapRequest::new("FindByInventoryPath", &self.content().search_index)
            .text("inventoryPath", path);

        let payload = self.invoke(request).await?;
        let found = payload
            .child("returnval")
            .and_then(ManagedObjectReference::from_element);

        debug!(path, found = ?found, "resolved inventory path");
        Ok(found)
    }

    /// Find a virtual machine by its guest-reported DNS name, searching all
    /// datacenters.
    pub async fn find_vm_by_dns_name(
        &self,
        dns_name: &str,
    ) -> Result<Option<ManagedObjectReference>, Error> {
        let request = SoapRequest::new("FindByDnsName", &self.content().search_index)
            .text("dnsName", dns_name)
            .text("vmSearch", "true");

        let payload = self.invoke(request).await?;
        let found = payload
            .child("returnval")
            .and_then(ManagedObjectReference::from_element);

        debug!(dns_name, found = ?found, "resolved DNS name");
        Ok(found)
    }
}
