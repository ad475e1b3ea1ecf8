// Service endpoint discovery
//
// `QueryServiceEndpointList` on the `ServiceDirectory` object lists every
// service registered with the vCenter lookup service. The Inventory Service
// registers itself under an instance name with a fixed prefix.

use tracing::debug;

use crate::error::Error;
use crate::vim::client::VimClient;
use crate::vim::envelope::SoapRequest;
use crate::vim::models::{ManagedObjectReference, ServiceEndpoint};

/// Instance-name prefix of the vSphere Inventory Service endpoint.
pub const INVENTORY_SERVICE_PREFIX: &str = "VSPHERE-INVENTORY-SERVICE/";

impl VimClient {
    /// List every registered service endpoint.
    pub async fn query_service_endpoint_list(&self) -> Result<Vec<ServiceEndpoint>, Error> {
        let request = SoapRequest::new(
            "QueryServiceEndpointList",
            &ManagedObjectReference::service_directory(),
        );

        let payload = self.invoke(request).await?;
        let endpoints = payload
            .children_named("returnval")
            .map(ServiceEndpoint::from_returnval)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = endpoints.len(), "listed service endpoints");
        Ok(endpoints)
    }

    /// Find the first endpoint whose instance name starts with `prefix`.
    pub async fn discover_endpoint(&self, prefix: &str) -> Result<ServiceEndpoint, Error> {
        let endpoints = self.query_service_endpoint_list().await?;
        select_endpoint(endpoints, prefix).ok_or_else(|| Error::ServiceNotFound {
            prefix: prefix.to_owned(),
        })
    }

    /// Find the vSphere Inventory Service endpoint.
    pub async fn discover_inventory_service(&self) -> Result<ServiceEndpoint, Error> {
        let endpoint = self.discover_endpoint(INVENTORY_SERVICE_PREFIX).await?;
        debug!(name = %endpoint.name, url = %endpoint.url, "found inventory service");
        Ok(endpoint)
    }
}

fn select_endpoint(endpoints: Vec<ServiceEndpoint>, prefix: &str) -> Option<ServiceEndpoint> {
    endpoints.into_iter().find(|e| e.name.starts_with(prefix))
}
