// vim SOAP HTTP client
//
// Wraps `reqwest::Client` with the SOAP headers, envelope encoding and fault
// decoding of the vim25 endpoint. Method families (session, directory,
// search, properties) are implemented as inherent methods in sibling files
// to keep this module focused on transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, trace};
use url::Url;

use crate::error::Error;
use crate::transport::{TransportConfig, read_body, send_with_retry};
use crate::vim::envelope::{SoapRequest, decode_response};
use crate::vim::models::{ManagedObjectReference, ServiceContent};
use crate::xml::XmlElement;

/// XML namespace and base `SOAPAction` of the vim25 API.
pub const VIM_NAMESPACE: &str = "urn:vim25";

/// Raw HTTP client for the vSphere web services (`/sdk`) endpoint.
///
/// Constructed by [`connect()`](Self::connect), which fetches the
/// `ServiceContent` so every later call knows the references of the
/// session manager, search index and property collector. The session cookie
/// lives in the client's own jar.
pub struct VimClient {
    http: reqwest::Client,
    sdk_url: Url,
    timeout: Duration,
    soap_action: String,
    content: ServiceContent,
    cookie_jar: Option<Arc<Jar>>,
}

impl VimClient {
    /// Connect to `sdk_url` (e.g. `https://vcenter.example.com/sdk`) and
    /// retrieve the service content. Does NOT log in.
    ///
    /// If the transport config has no cookie jar, one is created: the vim
    /// session is cookie based.
    pub async fn connect(sdk_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        let mut client = Self::with_client(http, sdk_url, transport.timeout).await?;
        client.cookie_jar = config.cookie_jar;
        Ok(client)
    }

    /// Connect with a pre-built `reqwest::Client`.
    ///
    /// The client must carry a cookie store for login to stick.
    pub async fn with_client(
        http: reqwest::Client,
        sdk_url: Url,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let request = SoapRequest::new(
            "RetrieveServiceContent",
            &ManagedObjectReference::service_instance(),
        );
        let payload = send(&http, &sdk_url, VIM_NAMESPACE, timeout, request).await?;
        let returnval = payload
            .child("returnval")
            .ok_or(Error::MissingElement {
                element: "returnval",
            })?;
        let content = ServiceContent::from_returnval(returnval)?;

        let soap_action = content
            .api_version
            .as_deref()
            .map_or_else(|| VIM_NAMESPACE.to_owned(), |v| format!("{VIM_NAMESPACE}/{v}"));

        info!(
            server = content.full_name.as_deref().unwrap_or("unknown"),
            api_version = content.api_version.as_deref().unwrap_or("unknown"),
            "retrieved service content"
        );

        Ok(Self {
            http,
            sdk_url,
            timeout,
            soap_action,
            content,
            cookie_jar: None,
        })
    }

    /// Managed object references discovered at connect time.
    pub fn content(&self) -> &ServiceContent {
        &self.content
    }

    /// The `Cookie` header value currently held for the SDK endpoint, if
    /// this client owns its jar and a session has been established.
    pub fn cookie_header(&self) -> Option<String> {
        let jar = self.cookie_jar.as_ref()?;
        let cookies = jar.cookies(&self.sdk_url)?;
        cookies.to_str().ok().map(String::from)
    }

    /// Invoke a vim method and return its response element.
    pub(crate) async fn invoke(&self, request: SoapRequest) -> Result<XmlElement, Error> {
        send(
            &self.http,
            &self.sdk_url,
            &self.soap_action,
            self.timeout,
            request,
        )
        .await
    }
}

async fn send(
    http: &reqwest::Client,
    url: &Url,
    soap_action: &str,
    timeout: Duration,
    request: SoapRequest,
) -> Result<XmlElement, Error> {
    let method = request.method();
    debug!(method, "POST {}", url);

    let builder = http
        .post(url.clone())
        .header(CONTENT_TYPE, "text/xml; charset=utf-8")
        .header("SOAPAction", soap_action)
        .body(request.into_envelope());

    let resp = send_with_retry(builder, timeout).await?;
    let status = resp.status().as_u16();
    let body = read_body(resp, timeout).await?;
    trace!(method, status, bytes = body.len(), "response received");

    decode_response(status, &body)
}
