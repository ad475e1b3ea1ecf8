// vim session management
//
// Username/password login, logout, and service ticket acquisition on the
// `SessionManager`. `AcquireSessionTicket` with a `serviceKey` is not part
// of the published WSDL; the request shape matches what the vSphere client
// tooling sends to obtain a ticket for a registered endpoint.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::vim::client::VimClient;
use crate::vim::envelope::SoapRequest;

impl VimClient {
    /// Authenticate with username/password.
    ///
    /// On success the `vmware_soap_session` cookie is stored in the client's
    /// jar and used for all subsequent requests. Wrong credentials surface as
    /// [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        debug!(username, "logging in");

        let request = SoapRequest::new("Login", &self.content().session_manager)
            .text("userName", username)
            .text("password", password.expose_secret());

        let payload = self.invoke(request).await?;
        if let Some(full_name) = payload
            .child("returnval")
            .and_then(|r| r.child_text("fullName"))
        {
            debug!(user = full_name, "login successful");
        }
        Ok(())
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        let request = SoapRequest::new("Logout", &self.content().session_manager);
        self.invoke(request).await?;
        debug!("logout complete");
        Ok(())
    }

    /// Acquire a one-shot session ticket for the service registered under
    /// `service_key`.
    pub async fn acquire_session_ticket(&self, service_key: &str) -> Result<String, Error> {
        debug!(service_key, "acquiring session ticket");

        let request = SoapRequest::new("AcquireSessionTicket", &self.content().session_manager)
            .text("serviceKey", service_key);

        let payload = self.invoke(request).await?;
        payload
            .child_text("returnval")
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or(Error::MissingElement {
                element: "returnval",
            })
    }
}
