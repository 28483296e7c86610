use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fast_sfdc::{
    ClientConfig, ConnectionConfig, Connector, CredentialProfile, PollCadence, PollOptions,
    PollSettings,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TOOLING: &str = "/services/data/v45.0/tooling";
pub const METADATA: &str = "/services/Soap/m/45.0";
pub const LOGIN: &str = "/services/Soap/u/45.0";

/// Route `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config(login_host: &str) -> ConnectionConfig {
    ConnectionConfig::single(
        "e2e",
        CredentialProfile::new(login_host, "e2e@example.com", "secret"),
        45,
    )
}

/// Connector logging in at `login_host`, polling every 10ms with no deadline.
pub fn connector(login_host: &str) -> Connector {
    init_tracing();
    let fast = PollOptions::new(PollCadence::Fixed(Duration::from_millis(10)), None);
    Connector::with_client_config(
        config(login_host),
        ClientConfig::builder().with_tracing(false).build(),
    )
    .expect("connector")
    .with_poll_settings(
        PollSettings::default()
            .with_container(fast)
            .with_retrieve(fast)
            .with_deploy(fast),
    )
}

/// Logins served by a mock login endpoint.
#[derive(Clone)]
pub struct Logins(Arc<AtomicUsize>);

impl Logins {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Login endpoint on `server` issuing `SESSION-1`, `SESSION-2`, ... whose
/// server URL points at `instance`.
pub async fn mount_login(server: &MockServer, instance: &str) -> Logins {
    mount_login_with_delay(server, instance, Duration::ZERO).await
}

pub async fn mount_login_with_delay(server: &MockServer, instance: &str, delay: Duration) -> Logins {
    let counter = Arc::new(AtomicUsize::new(0));
    let issued = counter.clone();
    let instance = instance.to_string();
    Mock::given(method("POST"))
        .and(path(LOGIN))
        .respond_with(move |_: &Request| {
            let n = issued.fetch_add(1, Ordering::SeqCst) + 1;
            ResponseTemplate::new(200)
                .set_body_string(login_body(&instance, &format!("SESSION-{n}")))
                .set_delay(delay)
        })
        .mount(server)
        .await;
    Logins(counter)
}

fn login_body(instance: &str, session_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com"><soapenv:Body><loginResponse><result><metadataServerUrl>{instance}/services/Soap/m/45.0/00D000000000001</metadataServerUrl><serverUrl>{instance}/services/Soap/u/45.0/00D000000000001</serverUrl><sessionId>{session_id}</sessionId><userId>005000000000001AAA</userId></result></loginResponse></soapenv:Body></soapenv:Envelope>"#
    )
}

/// A URL nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    format!("http://{}", listener.local_addr().expect("local addr"))
}

pub fn query_response(records: serde_json::Value) -> ResponseTemplate {
    let size = records.as_array().map_or(0, Vec::len);
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "totalSize": size,
        "done": true,
        "records": records
    }))
}

pub fn created(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(serde_json::json!({
        "id": id, "success": true, "errors": []
    }))
}

pub fn metadata_ok(method: &str, result: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="http://soap.sforce.com/2006/04/metadata"><soapenv:Body><{method}Response><result>{result}</result></{method}Response></soapenv:Body></soapenv:Envelope>"#
    ))
}

pub fn soap_fault(code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(500).set_body_string(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:sf="http://soap.sforce.com/2006/04/metadata"><soapenv:Body><soapenv:Fault><faultcode>sf:{code}</faultcode><faultstring>{code}: {message}</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#
    ))
}
