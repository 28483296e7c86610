//! Mock org shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fast_sfdc_auth::{ConnectionConfig, CredentialProfile};
use fast_sfdc_client::{ClientConfig, SfHttpClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::connector::Connector;
use crate::poll::{PollCadence, PollOptions, PollSettings};

pub(crate) fn config(host: &str) -> ConnectionConfig {
    ConnectionConfig::single(
        "dev",
        CredentialProfile::new(host, "dev@example.com", "secret"),
        45,
    )
}

pub(crate) fn http() -> SfHttpClient {
    SfHttpClient::new(ClientConfig::builder().with_tracing(false).build()).unwrap()
}

/// Connector against `server` with millisecond poll cadences.
pub(crate) fn connector(server: &MockServer) -> Connector {
    let fast = |every| PollOptions::new(PollCadence::Fixed(Duration::from_millis(every)), None);
    Connector::with_client_config(
        config(&server.uri()),
        ClientConfig::builder().with_tracing(false).build(),
    )
    .unwrap()
    .with_poll_settings(
        PollSettings::default()
            .with_container(fast(10))
            .with_retrieve(fast(10))
            .with_deploy(fast(10)),
    )
}

pub(crate) fn login_body(instance: &str, session_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com"><soapenv:Body><loginResponse><result><serverUrl>{instance}/services/Soap/u/45.0/00D000000000001</serverUrl><sessionId>{session_id}</sessionId><userId>005000000000001AAA</userId></result></loginResponse></soapenv:Body></soapenv:Envelope>"#
    )
}

/// Number of logins served so far.
#[derive(Clone)]
pub(crate) struct LoginCounter(Arc<AtomicUsize>);

impl LoginCounter {
    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Login endpoint issuing `SESSION-1`, `SESSION-2`, ... in order.
pub(crate) async fn mount_login(server: &MockServer) -> LoginCounter {
    let counter = Arc::new(AtomicUsize::new(0));
    let issued = counter.clone();
    let instance = server.uri();
    Mock::given(method("POST"))
        .and(path("/services/Soap/u/45.0"))
        .respond_with(move |_: &Request| {
            let n = issued.fetch_add(1, Ordering::SeqCst) + 1;
            ResponseTemplate::new(200).set_body_string(login_body(&instance, &format!("SESSION-{n}")))
        })
        .mount(server)
        .await;
    LoginCounter(counter)
}

pub(crate) fn query_response(records: Vec<serde_json::Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "totalSize": records.len(),
        "done": true,
        "records": records
    }))
}

pub(crate) fn soap_ok(method: &str, result: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="http://soap.sforce.com/2006/04/metadata"><soapenv:Body><{method}Response><result>{result}</result></{method}Response></soapenv:Body></soapenv:Envelope>"#
    )
}
