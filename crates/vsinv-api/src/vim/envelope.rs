// SOAP envelope construction and response decoding
//
// The only place in the workspace that knows the shape of a vim25 SOAP
// message. Requests are assembled as text with every value escaped;
// responses are parsed into an `XmlElement` tree and the `<Body>` payload is
// either returned or decoded into a typed fault.

use std::fmt::Write as _;

use crate::error::Error;
use crate::vim::models::ManagedObjectReference;
use crate::xml::{XmlElement, escape};

const ENVELOPE_OPEN: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<soapenv:Envelope xmlns:soapenc="http://schemas.xmlsoap.org/soap/encoding/""#,
    r#" xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/""#,
    r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#,
    r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    "<soapenv:Body>",
);

const ENVELOPE_CLOSE: &str = "</soapenv:Body></soapenv:Envelope>";

/// A single vim25 method invocation.
///
/// Parameters are appended in call order; vim25 is order-sensitive, so
/// callers must follow the WSDL parameter order.
#[derive(Debug, Clone)]
pub(crate) struct SoapRequest {
    method: &'static str,
    params: String,
}

impl SoapRequest {
    /// Start a request for `method` invoked on `this`.
    pub fn new(method: &'static str, this: &ManagedObjectReference) -> Self {
        let mut request = Self {
            method,
            params: String::new(),
        };
        request.push_moref("_this", this);
        request
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Append a text parameter: `<name>value</name>`.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        let _ = write!(self.params, "<{name}>{}</{name}>", escape(value));
        self
    }

    /// Append a pre-built fragment (already escaped).
    pub fn raw(mut self, fragment: &str) -> Self {
        self.params.push_str(fragment);
        self
    }

    fn push_moref(&mut self, name: &str, moref: &ManagedObjectReference) {
        let _ = write!(
            self.params,
            r#"<{name} type="{}">{}</{name}>"#,
            escape(&moref.kind),
            escape(&moref.value)
        );
    }

    /// Render the complete SOAP envelope.
    pub fn into_envelope(self) -> String {
        format!(
            r#"{ENVELOPE_OPEN}<{method} xmlns="urn:vim25">{params}</{method}>{ENVELOPE_CLOSE}"#,
            method = self.method,
            params = self.params,
        )
    }
}

/// Build a `<specSet>` fragment for `RetrievePropertiesEx`.
pub(crate) fn property_filter_spec(
    kind: &str,
    paths: &[&str],
    objects: &[ManagedObjectReference],
) -> String {
    let mut spec = String::from("<specSet><propSet>");
    let _ = write!(spec, "<type>{}</type>", escape(kind));
    for path in paths {
        let _ = write!(spec, "<pathSet>{}</pathSet>", escape(path));
    }
    spec.push_str("</propSet>");
    for obj in objects {
        let _ = write!(
            spec,
            r#"<objectSet><obj type="{}">{}</obj></objectSet>"#,
            escape(&obj.kind),
            escape(&obj.value)
        );
    }
    spec.push_str("</specSet>");
    spec
}

/// Decode a SOAP response body.
///
/// Returns the method response element (first child of `<Body>`), or the
/// typed error for a `<Fault>`. HTTP status is only consulted when the body
/// is not a SOAP envelope at all, because vim reports faults with HTTP 500.
pub(crate) fn decode_response(status: u16, body: &str) -> Result<XmlElement, Error> {
    let root = match XmlElement::parse(body) {
        Ok(root) => root,
        Err(_) if !(200..300).contains(&status) => {
            return Err(Error::Http {
                status,
                message: preview(body),
            });
        }
        Err(e) => return Err(e),
    };

    let Some(payload) = root
        .child("Body")
        .and_then(|b| b.children().first())
        .cloned()
    else {
        if (200..300).contains(&status) {
            return Err(Error::MissingElement { element: "Body" });
        }
        return Err(Error::Http {
            status,
            message: preview(body),
        });
    };

    if payload.name() == "Fault" {
        return Err(decode_fault(&payload));
    }

    Ok(payload)
}

fn decode_fault(fault: &XmlElement) -> Error {
    let message = fault.child_text("faultstring").unwrap_or_default().to_owned();

    // The fault type lives in <detail> as either an element named after it
    // (`<InvalidLoginFault>`) or an `xsi:type` attribute.
    let detail_kind = fault
        .child("detail")
        .and_then(|d| d.children().first())
        .map_or_else(
            || {
                fault
                    .child_text("faultcode")
                    .unwrap_or("ServerFaultCode")
                    .to_owned()
            },
            |d| {
                d.attr("xsi:type")
                    .unwrap_or(d.name())
                    .trim_end_matches("Fault")
                    .to_owned()
            },
        );

    match detail_kind.as_str() {
        "InvalidLogin" => Error::Authentication { message },
        "NotAuthenticated" => Error::SessionExpired,
        _ => Error::Fault {
            fault: detail_kind,
            message,
        },
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wrap(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body>{inner}</soapenv:Body></soapenv:Envelope>"#
        )
    }

    #[test]
    fn request_escapes_values_and_keeps_order() {
        let session_manager = ManagedObjectReference::new("SessionManager", "SessionManager");
        let envelope = SoapRequest::new("Login", &session_manager)
            .text("userName", "admin@vsphere.local")
            .text("password", "p<&>ss")
            .into_envelope();

        assert!(envelope.contains(
            r#"<Login xmlns="urn:vim25"><_this type="SessionManager">SessionManager</_this><userName>admin@vsphere.local</userName><password>p&lt;&amp;&gt;ss</password></Login>"#
        ));
        assert!(envelope.starts_with("<?xml"));
        assert!(envelope.ends_with("</soapenv:Envelope>"));
    }

    #[test]
    fn filter_spec_lists_paths_then_objects() {
        let spec = property_filter_spec(
            "VirtualMachine",
            &["name", "guest.net"],
            &[ManagedObjectReference::new("VirtualMachine", "vm-1")],
        );
        assert_eq!(
            spec,
            r#"<specSet><propSet><type>VirtualMachine</type><pathSet>name</pathSet><pathSet>guest.net</pathSet></propSet><objectSet><obj type="VirtualMachine">vm-1</obj></objectSet></specSet>"#
        );
    }

    #[test]
    fn decodes_payload() {
        let body = wrap(r#"<AcquireSessionTicketResponse xmlns="urn:vim25"><returnval>cst-abc</returnval></AcquireSessionTicketResponse>"#);
        let payload = decode_response(200, &body).unwrap();
        assert_eq!(payload.name(), "AcquireSessionTicketResponse");
        assert_eq!(payload.child_text("returnval"), Some("cst-abc"));
    }

    #[test]
    fn invalid_login_fault_is_authentication_error() {
        let body = wrap(
            r#"<soapenv:Fault><faultcode>ServerFaultCode</faultcode><faultstring>Cannot complete login due to an incorrect user name or password.</faultstring><detail><InvalidLoginFault xmlns="urn:vim25" xsi:type="InvalidLogin"></InvalidLoginFault></detail></soapenv:Fault>"#,
        );
        let err = decode_response(500, &body).unwrap_err();
        assert!(
            matches!(err, Error::Authentication { ref message } if message.contains("incorrect user name")),
            "got {err:?}"
        );
    }

    #[test]
    fn not_authenticated_fault_is_session_expired() {
        let body = wrap(
            r#"<soapenv:Fault><faultcode>ServerFaultCode</faultcode><faultstring>The session is not authenticated.</faultstring><detail><NotAuthenticatedFault xmlns="urn:vim25"></NotAuthenticatedFault></detail></soapenv:Fault>"#,
        );
        assert!(matches!(decode_response(500, &body), Err(Error::SessionExpired)));
    }

    #[test]
    fn other_faults_keep_type_and_message() {
        let body = wrap(
            r#"<soapenv:Fault><faultcode>ServerFaultCode</faultcode><faultstring>A specified parameter was not correct: specSet</faultstring><detail><InvalidArgumentFault xmlns="urn:vim25"/></detail></soapenv:Fault>"#,
        );
        let err = decode_response(500, &body).unwrap_err();
        assert!(
            matches!(err, Error::Fault { ref fault, .. } if fault == "InvalidArgument"),
            "got {err:?}"
        );
    }

    #[test]
    fn non_xml_error_body_becomes_http_error() {
        let err = decode_response(503, "Service Unavailable").unwrap_err();
        assert!(matches!(err, Error::Http { status: 503, .. }), "got {err:?}");
    }
}
