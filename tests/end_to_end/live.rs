//! Smoke tests against a real org. Credentials come from `SF_USERNAME`,
//! `SF_PASSWORD` and optionally `SF_LOGIN_URL` and `SF_API_VERSION`.

use fast_sfdc::{ConnectionConfig, Connector, Credentials};

use super::common::init_tracing;

fn live_connector() -> Connector {
    init_tracing();
    let config = ConnectionConfig::from_env()
        .expect("SF_USERNAME and SF_PASSWORD must be set to run live tests");
    Connector::new(config).expect("connector")
}

#[tokio::test]
#[ignore = "needs a real org"]
async fn test_live_login_and_tooling_query() {
    let connector = live_connector();
    let session = connector.connect().await.expect("login should succeed");
    assert!(session.instance_url().starts_with("https://"));

    let result = connector
        .query::<serde_json::Value>("SELECT Id, Name FROM ApexClass LIMIT 5")
        .await
        .expect("tooling query should succeed");
    assert!(result.records.len() <= 5);
}

#[tokio::test]
#[ignore = "needs a real org"]
async fn test_live_describe_and_anonymous_apex() {
    let connector = live_connector();

    let describe = connector.describe_metadata().await.expect("describe should succeed");
    assert!(describe.types_in_directory("classes").next().is_some());

    let execution = connector
        .execute_anonymous("System.debug('fast-sfdc live test');")
        .await
        .expect("anonymous apex should run");
    assert!(execution.result.compiled);
    assert!(execution.result.success);
}
