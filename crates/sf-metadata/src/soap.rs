//! SOAP envelopes and response decoding for the Metadata and Apex services.

use fast_sfdc_client::security::xml::escape;
use fast_sfdc_client::xml;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};

/// SOAP service a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapService {
    /// `/services/Soap/m/NN.0`
    Metadata,
    /// `/services/Soap/s/NN.0`
    Apex,
}

impl SoapService {
    pub fn namespace(self) -> &'static str {
        match self {
            SoapService::Metadata => "http://soap.sforce.com/2006/04/metadata",
            SoapService::Apex => "http://soap.sforce.com/2006/08/apex",
        }
    }

    fn endpoint(self, client: &fast_sfdc_client::SalesforceClient) -> String {
        match self {
            SoapService::Metadata => client.metadata_url(),
            SoapService::Apex => client.apex_url(),
        }
    }
}

/// One `categories` entry of a [`DebuggingHeader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCategory {
    pub category: String,
    pub level: String,
}

/// Asks the server to capture a debug log for the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggingHeader {
    pub categories: Vec<LogCategory>,
    pub debug_level: String,
}

impl DebuggingHeader {
    /// `Apex_code` at `FINEST`, debug level `DETAIL`.
    pub fn apex_finest() -> Self {
        Self {
            categories: vec![LogCategory {
                category: "Apex_code".to_string(),
                level: "FINEST".to_string(),
            }],
            debug_level: "DETAIL".to_string(),
        }
    }

    fn to_xml(&self) -> String {
        let categories: String = self
            .categories
            .iter()
            .map(|c| {
                format!(
                    "<categories><category>{}</category><level>{}</level></categories>",
                    escape(&c.category),
                    escape(&c.level)
                )
            })
            .collect();
        format!(
            "<DebuggingHeader>{categories}<debugLevel>{}</debugLevel></DebuggingHeader>",
            escape(&self.debug_level)
        )
    }
}

/// Build a complete envelope. `payload` is inserted as-is and must already
/// be escaped.
pub fn envelope(
    service: SoapService,
    session_id: &str,
    method: &str,
    payload: &str,
    debugging: Option<&DebuggingHeader>,
) -> String {
    let debugging = debugging.map(DebuggingHeader::to_xml).unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns="{ns}">
  <soapenv:Header>
    <SessionHeader><sessionId>{session}</sessionId></SessionHeader>{debugging}
  </soapenv:Header>
  <soapenv:Body>
    <{method}>{payload}</{method}>
  </soapenv:Body>
</soapenv:Envelope>"#,
        ns = service.namespace(),
        session = escape(session_id),
    )
}

/// Decoded SOAP response.
#[derive(Debug, Clone)]
pub struct SoapResponse {
    /// Inner content of the `<{method}Response>` element.
    pub body: String,
    /// `debugLog` captured through a [`DebuggingHeader`], if any.
    pub debug_log: Option<String>,
}

/// Decode a raw response. Status 401/403 is decided before the body is read.
pub fn decode(method: &str, status: u16, text: &str) -> Result<SoapResponse> {
    if status == 401 || status == 403 {
        let detail = xml::soap_fault(text)
            .map(|f| fast_sfdc_client::sanitize_error_message(&f.to_string()))
            .unwrap_or_else(|| format!("HTTP {status}"));
        return Err(Error::new(ErrorKind::Unauthorized(detail)));
    }

    if let Some(fault) = xml::soap_fault(text) {
        let message = fast_sfdc_client::sanitize_error_message(&fault.fault_string);
        return Err(Error::new(if fault.is_invalid_session() {
            ErrorKind::Unauthorized(message)
        } else {
            ErrorKind::SoapFault {
                code: fault.code().to_string(),
                message,
            }
        }));
    }

    if !(200..300).contains(&status) {
        return Err(Error::new(ErrorKind::Http(format!(
            "{method} returned HTTP {status}: {}",
            fast_sfdc_client::sanitize_error_message(text)
        ))));
    }

    let response_tag = format!("{method}Response");
    let body = xml::element(text, &response_tag).ok_or_else(|| {
        Error::new(ErrorKind::InvalidResponse(format!("missing <{response_tag}>")))
    })?;

    Ok(SoapResponse {
        body: body.to_string(),
        debug_log: xml::text(text, "debugLog"),
    })
}

impl crate::MetadataClient {
    /// POST one SOAP call and decode the response.
    #[instrument(skip(self, payload, debugging))]
    pub async fn call(
        &self,
        service: SoapService,
        method: &str,
        payload: &str,
        debugging: Option<&DebuggingHeader>,
    ) -> Result<SoapResponse> {
        let client = self.inner();
        let request = client
            .http()
            .post(service.endpoint(client))
            .xml(envelope(service, client.access_token(), method, payload, debugging))
            .soap_action(method);

        let response = client.execute_raw(request).await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status, bytes = text.len(), "SOAP response");
        decode(method, status, &text)
    }
}

/// Required element of a result, unescaped.
pub(crate) fn required(xml_text: &str, tag: &str) -> Result<String> {
    xml::text(xml_text, tag)
        .ok_or_else(|| Error::new(ErrorKind::InvalidResponse(format!("missing <{tag}>"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_headers() {
        let env = envelope(
            SoapService::Apex,
            "00D!tok<en>",
            "executeAnonymous",
            "<String>x</String>",
            Some(&DebuggingHeader::apex_finest()),
        );
        assert!(env.contains(r#"xmlns="http://soap.sforce.com/2006/08/apex""#));
        assert!(env.contains("<sessionId>00D!tok&lt;en&gt;</sessionId>"));
        assert!(env.contains(
            "<DebuggingHeader><categories><category>Apex_code</category><level>FINEST</level></categories><debugLevel>DETAIL</debugLevel></DebuggingHeader>"
        ));
        assert!(env.contains("<executeAnonymous><String>x</String></executeAnonymous>"));

        let plain = envelope(SoapService::Metadata, "s", "describeMetadata", "", None);
        assert!(!plain.contains("DebuggingHeader"));
        assert!(plain.contains("2006/04/metadata"));
    }

    #[test]
    fn test_decode_classifies() {
        let fault = |code: &str| {
            format!(
                "<soapenv:Envelope xmlns:soapenv=\"x\"><soapenv:Body><soapenv:Fault><faultcode>sf:{code}</faultcode><faultstring>{code}: nope</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"
            )
        };

        let err = decode("retrieve", 500, &fault("INVALID_SESSION_ID")).unwrap_err();
        assert!(err.is_unauthorized());

        let err = decode("retrieve", 500, &fault("INVALID_CROSS_REFERENCE_KEY")).unwrap_err();
        match err.kind {
            ErrorKind::SoapFault { code, .. } => assert_eq!(code, "INVALID_CROSS_REFERENCE_KEY"),
            other => panic!("unexpected {other:?}"),
        }

        assert!(decode("retrieve", 403, "").unwrap_err().is_unauthorized());
        assert!(matches!(
            decode("retrieve", 200, "<Body><other/></Body>").unwrap_err().kind,
            ErrorKind::InvalidResponse(_)
        ));
        assert!(matches!(
            decode("retrieve", 502, "bad gateway").unwrap_err().kind,
            ErrorKind::Http(_)
        ));
    }

    #[test]
    fn test_decode_captures_debug_log() {
        let text = r#"<soapenv:Envelope xmlns:soapenv="x"><soapenv:Header><DebuggingInfo><debugLog>45.0 APEX_CODE,FINEST
USER_DEBUG|[1]|DEBUG|a &amp; b</debugLog></DebuggingInfo></soapenv:Header><soapenv:Body><executeAnonymousResponse><result><success>true</success></result></executeAnonymousResponse></soapenv:Body></soapenv:Envelope>"#;
        let response = decode("executeAnonymous", 200, text).unwrap();
        assert!(response.body.contains("<success>true</success>"));
        assert!(response.debug_log.unwrap().ends_with("a & b"));
    }
}
