//! Domain operations driven through login, dispatch and polling together.

use std::io::Write;
use std::time::Duration;

use fast_sfdc::metadata::{DeployOptions, RetrieveStatus};
use fast_sfdc::tooling::ContainerAsyncState;
use fast_sfdc::{
    ErrorKind, JobHandle, JobKind, MetadataKind, PollCadence, PollOptions, PollSettings,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{connector, created, metadata_ok, mount_login, query_response, METADATA, TOOLING};

#[tokio::test]
async fn test_create_class_survives_session_expiry_while_polling() {
    let server = MockServer::start().await;
    let logins = mount_login(&server, &server.uri()).await;
    Mock::given(method("POST"))
        .and(path(format!("{TOOLING}/sobjects/MetadataContainer")))
        .respond_with(created("1dc000000000001AAA"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{TOOLING}/sobjects/ApexClassMember")))
        .respond_with(created("400000000000001AAA"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{TOOLING}/sobjects/ContainerAsyncRequest")))
        .respond_with(created("1dr000000000001AAA"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{TOOLING}/query")))
        .and(header("Authorization", "Bearer SESSION-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!([{
            "message": "Session expired or invalid",
            "errorCode": "INVALID_SESSION_ID"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{TOOLING}/query")))
        .and(header("Authorization", "Bearer SESSION-2"))
        .respond_with(query_response(serde_json::json!([{
            "Id": "1dr000000000001AAA",
            "State": "Completed",
            "DeployDetails": {"componentFailures": [], "componentSuccesses": [], "allComponentMessages": []},
            "ErrorMsg": null
        }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{TOOLING}/sobjects/MetadataContainer/1dc000000000001AAA")))
        .and(header("Authorization", "Bearer SESSION-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created = connector(&server.uri())
        .create_metadata(MetadataKind::ApexClass, "AccountService", None)
        .await
        .unwrap();

    assert_eq!(created.relative_path(), "classes/AccountService.cls");
    assert_eq!(created.body, "public class AccountService {\n\n}");
    assert_eq!(created.compile.unwrap().state, ContainerAsyncState::Completed);
    assert_eq!(logins.count(), 2);
}

#[tokio::test]
async fn test_retrieve_from_manifest_until_done() {
    let server = MockServer::start().await;
    mount_login(&server, &server.uri()).await;
    Mock::given(method("POST"))
        .and(path(METADATA))
        .and(header("SOAPAction", "retrieve"))
        .and(body_string_contains("<types><members>*</members><name>ApexClass</name></types>"))
        .respond_with(metadata_ok("retrieve", "<done>false</done><id>09S000000000001AAA</id>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(METADATA))
        .and(header("SOAPAction", "checkRetrieveStatus"))
        .and(body_string_contains("<asyncProcessId>09S000000000001AAA</asyncProcessId>"))
        .respond_with(metadata_ok(
            "checkRetrieveStatus",
            "<done>true</done><id>09S000000000001AAA</id><status>Succeeded</status><success>true</success><zipFile>UEsDBA==</zipFile>",
        ))
        .mount(&server)
        .await;

    let mut manifest = tempfile::NamedTempFile::new().unwrap();
    manifest
        .write_all(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Package xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n  <types>\n    <members>*</members>\n    <name>ApexClass</name>\n  </types>\n  <version>45.0</version>\n</Package>\n",
        )
        .unwrap();

    let connector = connector(&server.uri());
    let handle = connector.retrieve_metadata(manifest.path()).await.unwrap();
    let result = connector
        .poll_retrieve_metadata_status(&handle, &connector.child_token())
        .await
        .unwrap();

    assert_eq!(result.status, RetrieveStatus::Succeeded);
    assert_eq!(result.zip_file.as_deref(), Some("UEsDBA=="));
}

async fn mount_endless_deploy(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(METADATA))
        .and(header("SOAPAction", "deploy"))
        .respond_with(metadata_ok("deploy", "<done>false</done><id>0Af000000000001AAA</id>"))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(METADATA))
        .and(header("SOAPAction", "checkDeployStatus"))
        .respond_with(metadata_ok(
            "checkDeployStatus",
            "<done>false</done><id>0Af000000000001AAA</id><status>InProgress</status><success>false</success>",
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_shutdown_cancels_deploy_poll() {
    let server = MockServer::start().await;
    mount_login(&server, &server.uri()).await;
    mount_endless_deploy(&server).await;

    let connector = connector(&server.uri());
    let handle = connector
        .deploy_metadata("UEsDBA==", &DeployOptions::default())
        .await
        .unwrap();

    let cancel = connector.child_token();
    let (result, ()) = tokio::join!(
        connector.poll_deploy_metadata_status(&handle, None, None, &cancel),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            connector.shutdown();
        }
    );

    let err = result.unwrap_err();
    assert!(
        matches!(err.kind, ErrorKind::Cancelled { kind: JobKind::MetadataDeploy, ref id } if id == "0Af000000000001AAA"),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_deploy_poll_gives_up_at_deadline() {
    let server = MockServer::start().await;
    mount_login(&server, &server.uri()).await;
    mount_endless_deploy(&server).await;

    let connector = connector(&server.uri()).with_poll_settings(PollSettings::default().with_deploy(
        PollOptions::new(
            PollCadence::Fixed(Duration::from_millis(10)),
            Some(Duration::from_millis(100)),
        ),
    ));
    let handle = connector
        .deploy_metadata("UEsDBA==", &DeployOptions::default())
        .await
        .unwrap();

    let err = connector
        .poll_deploy_metadata_status(&handle, None, None, &connector.child_token())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::PollTimedOut { kind: JobKind::MetadataDeploy, .. }), "{err:?}");
}

#[tokio::test]
async fn test_handle_of_another_kind_is_rejected_before_any_call() {
    let server = MockServer::start().await;
    let logins = mount_login(&server, &server.uri()).await;

    let connector = connector(&server.uri());
    let handle = JobHandle::new("09S000000000001AAA", JobKind::MetadataRetrieve);
    let err = connector
        .poll_deploy_metadata_status(&handle, None, None, &connector.child_token())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::InvalidJob { .. }), "{err:?}");
    assert_eq!(logins.count(), 0);
}
