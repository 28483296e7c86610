//! Session renewal and failure classification across the public API.

use std::time::Duration;

use fast_sfdc::{Credentials, ErrorKind};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{
    closed_port_url, connector, metadata_ok, mount_login, mount_login_with_delay, query_response,
    soap_fault, METADATA, TOOLING,
};

const DESCRIBE: &str = "<metadataObjects><directoryName>classes</directoryName><inFolder>false</inFolder><metaFile>true</metaFile><suffix>cls</suffix><xmlName>ApexClass</xmlName></metadataObjects><partialSaveAllowed>true</partialSaveAllowed><testRequired>false</testRequired>";

fn expired_session() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(serde_json::json!([{
        "message": "Session expired or invalid",
        "errorCode": "INVALID_SESSION_ID"
    }]))
}

#[tokio::test]
async fn test_rest_rejection_logs_in_again_once() {
    let server = MockServer::start().await;
    let logins = mount_login(&server, &server.uri()).await;
    Mock::given(method("GET"))
        .and(path(format!("{TOOLING}/query")))
        .and(header("Authorization", "Bearer SESSION-1"))
        .respond_with(expired_session())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{TOOLING}/query")))
        .and(header("Authorization", "Bearer SESSION-2"))
        .respond_with(query_response(serde_json::json!([{"Id": "01p000000000001AAA"}])))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server.uri());
    let result = connector
        .query::<serde_json::Value>("SELECT Id FROM ApexClass")
        .await
        .expect("retry with a fresh session succeeds");

    assert_eq!(result.records.len(), 1);
    assert_eq!(logins.count(), 2);

    // The renewed session is kept for later calls.
    let session = connector.session_state().current().await.expect("session");
    assert_eq!(session.access_token(), "SESSION-2");
}

#[tokio::test]
async fn test_rest_rejection_twice_is_returned() {
    let server = MockServer::start().await;
    let logins = mount_login(&server, &server.uri()).await;
    Mock::given(method("GET"))
        .and(path(format!("{TOOLING}/query")))
        .respond_with(expired_session())
        .expect(2)
        .mount(&server)
        .await;

    let err = connector(&server.uri())
        .query::<serde_json::Value>("SELECT Id FROM ApexClass")
        .await
        .unwrap_err();

    assert!(err.is_unauthorized(), "{err:?}");
    assert_eq!(logins.count(), 2);
}

#[tokio::test]
async fn test_unreachable_instance_is_not_retried() {
    let server = MockServer::start().await;
    let logins = mount_login(&server, &closed_port_url()).await;

    let err = connector(&server.uri())
        .query::<serde_json::Value>("SELECT Id FROM ApexClass")
        .await
        .unwrap_err();

    assert!(err.is_unreachable(), "{err:?}");
    assert_eq!(err.to_string(), "Unreachable host. Check connection");
    assert_eq!(logins.count(), 1);
}

#[tokio::test]
async fn test_unreachable_login_host() {
    let err = connector(&closed_port_url())
        .describe_metadata()
        .await
        .unwrap_err();

    assert!(err.is_unreachable(), "{err:?}");
}

#[tokio::test]
async fn test_soap_invalid_session_is_retried_once() {
    let server = MockServer::start().await;
    let logins = mount_login(&server, &server.uri()).await;
    Mock::given(method("POST"))
        .and(path(METADATA))
        .and(header("SOAPAction", "describeMetadata"))
        .and(wiremock::matchers::body_string_contains("<sessionId>SESSION-1</sessionId>"))
        .respond_with(soap_fault("INVALID_SESSION_ID", "Invalid Session ID found in SessionHeader"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(METADATA))
        .and(header("SOAPAction", "describeMetadata"))
        .and(wiremock::matchers::body_string_contains("<sessionId>SESSION-2</sessionId>"))
        .respond_with(metadata_ok("describeMetadata", DESCRIBE))
        .expect(1)
        .mount(&server)
        .await;

    let describe = connector(&server.uri()).describe_metadata().await.unwrap();

    assert_eq!(describe.metadata_objects.len(), 1);
    assert_eq!(logins.count(), 2);
}

#[tokio::test]
async fn test_other_soap_faults_are_not_retried() {
    let server = MockServer::start().await;
    let logins = mount_login(&server, &server.uri()).await;
    Mock::given(method("POST"))
        .and(path(METADATA))
        .respond_with(soap_fault("INVALID_CROSS_REFERENCE_KEY", "no such job"))
        .expect(1)
        .mount(&server)
        .await;

    let err = connector(&server.uri()).describe_metadata().await.unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Metadata(ref msg) if msg.contains("INVALID_CROSS_REFERENCE_KEY")));
    assert_eq!(logins.count(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_login() {
    let server = MockServer::start().await;
    let logins = mount_login_with_delay(&server, &server.uri(), Duration::from_millis(200)).await;
    Mock::given(method("GET"))
        .and(path(format!("{TOOLING}/query")))
        .and(header("Authorization", "Bearer SESSION-1"))
        .respond_with(query_response(serde_json::json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let connector = connector(&server.uri());
    let (a, b, c) = tokio::join!(
        connector.query::<serde_json::Value>("SELECT Id FROM ApexClass"),
        connector.query::<serde_json::Value>("SELECT Id FROM ApexPage"),
        connector.query::<serde_json::Value>("SELECT Id FROM ApexTrigger"),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(logins.count(), 1);
}

#[tokio::test]
async fn test_switching_profile_logs_in_with_the_new_one() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    let first_logins = mount_login(&first, &first.uri()).await;
    let second_logins = mount_login(&second, &second.uri()).await;
    Mock::given(method("GET"))
        .and(path(format!("{TOOLING}/query")))
        .respond_with(query_response(serde_json::json!([])))
        .mount(&second)
        .await;

    let connector = connector(&first.uri());
    connector.connect().await.unwrap();
    connector.switch_profile(super::common::config(&second.uri())).await;
    connector
        .query::<serde_json::Value>("SELECT Id FROM ApexClass")
        .await
        .unwrap();

    assert_eq!(first_logins.count(), 1);
    assert_eq!(second_logins.count(), 1);
}
