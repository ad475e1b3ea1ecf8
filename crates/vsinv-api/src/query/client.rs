// Inventory Service query client
//
// The Inventory Service accepts XQuery documents POSTed to `/secure/query`
// and answers with an XML `<resultSet>`. Authentication is a ticket handed
// over from an existing vim session: `GET /login?action=loginByTicket`
// sets the service's own session cookie.

use std::time::Duration;

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::{TransportConfig, read_body, send_with_retry};
use crate::xml::XmlElement;

/// HTTP client bound to one Inventory Service endpoint.
pub struct QueryClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl QueryClient {
    /// Exchange a vim session ticket for an Inventory Service session.
    ///
    /// `base_url` is the endpoint URL reported by service discovery. A fresh
    /// cookie jar is always used so the vim session cookie never reaches the
    /// query host.
    pub async fn login_by_ticket(
        base_url: Url,
        ticket: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.clone().with_cookie_jar().build_client()?;
        let client = Self::with_client(http, base_url, transport.timeout);
        client.login(ticket).await?;
        Ok(client)
    }

    /// Wrap a pre-built `reqwest::Client` without logging in.
    pub fn with_client(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// Perform the ticket login on this client's cookie jar.
    pub async fn login(&self, ticket: &str) -> Result<(), Error> {
        let mut url = self.endpoint_url("login")?;
        url.query_pairs_mut()
            .append_pair("action", "loginByTicket")
            .append_pair("ticket", ticket);

        debug!("logging in to inventory service at {}", self.base_url);

        let resp = send_with_retry(self.http.get(url), self.timeout).await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!(
                    "inventory service ticket login failed (HTTP {status}): {}",
                    body.chars().take(200).collect::<String>()
                ),
            });
        }

        debug!("inventory service login successful");
        Ok(())
    }

    /// POST an XQuery document and return the element children of the first
    /// `<resultSet>`. A response without a result set yields no elements.
    pub async fn query(&self, query: &str) -> Result<Vec<XmlElement>, Error> {
        let url = self.endpoint_url("secure/query")?;
        debug!("POST {}", url);

        let builder = self.http.post(url).body(query.to_owned());
        let resp = send_with_retry(builder, self.timeout).await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = read_body(resp, self.timeout).await?;
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        trace!(bytes = body.len(), "query response received");

        let root = XmlElement::parse(&body)?;
        let result_set = if root.name() == "resultSet" {
            Some(root)
        } else {
            root.first_descendant("resultSet").cloned()
        };

        match result_set {
            Some(set) => {
                let rows = set.into_children();
                debug!(rows = rows.len(), "query returned");
                Ok(rows)
            }
            None => {
                debug!("query response has no resultSet");
                Ok(Vec::new())
            }
        }
    }

    /// `{base_url}/{path}`, keeping any path prefix the endpoint URL carries.
    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}
