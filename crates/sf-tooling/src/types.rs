//! Tooling API record types.
//!
//! Create bodies are the same structs with `id` left empty; absent fields
//! are skipped on serialization so a partial record never overwrites
//! server values with `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record that can be written through the Tooling sObject endpoints.
pub trait ToolingRecord: Serialize + Send + Sync {
    /// Record id, if the record already exists remotely.
    fn record_id(&self) -> Option<&str>;
}

impl ToolingRecord for Value {
    fn record_id(&self) -> Option<&str> {
        self.get("Id").and_then(Value::as_str)
    }
}

macro_rules! tooling_record {
    ($($ty:ty),* $(,)?) => {
        $(impl ToolingRecord for $ty {
            fn record_id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        })*
    };
}

tooling_record!(
    MetadataContainer,
    MetadataMember,
    AuraDefinitionBundle,
    AuraDefinition,
    LightningComponentBundle,
    LightningComponentResource,
);

/// Response from sObject create.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResponse {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CreateError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateError {
    pub message: String,
    #[serde(rename = "statusCode", default)]
    pub status_code: String,
}

/// Workspace that groups members for one compile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetadataContainer {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "Name")]
    pub name: String,
}

/// A compilable member (`ApexClassMember`, `ApexPageMember`,
/// `ApexComponentMember`, `ApexTriggerMember`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetadataMember {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "Body")]
    pub body: String,

    #[serde(rename = "FullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(rename = "Metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    #[serde(rename = "MetadataContainerId", default, skip_serializing_if = "Option::is_none")]
    pub metadata_container_id: Option<String>,

    /// Id of the existing class/page/trigger when updating one.
    #[serde(rename = "ContentEntityId", default, skip_serializing_if = "Option::is_none")]
    pub content_entity_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuraDefinitionBundle {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "ApiVersion", default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<f64>,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "DeveloperName", default, skip_serializing_if = "Option::is_none")]
    pub developer_name: Option<String>,

    #[serde(rename = "MasterLabel", default, skip_serializing_if = "Option::is_none")]
    pub master_label: Option<String>,
}

/// One file of an Aura bundle.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuraDefinition {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "Source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "AuraDefinitionBundleId", default, skip_serializing_if = "Option::is_none")]
    pub aura_definition_bundle_id: Option<String>,

    /// `COMPONENT`, `CONTROLLER`, `HELPER`, `STYLE`, ...
    #[serde(rename = "DefType", default, skip_serializing_if = "Option::is_none")]
    pub def_type: Option<String>,

    /// `XML`, `JS`, `CSS`.
    #[serde(rename = "Format", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LightningComponentBundle {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "FullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(rename = "Metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// One file of a Lightning web component bundle.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LightningComponentResource {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Bundle-relative path, e.g. `lwc/myCmp/myCmp.js`.
    #[serde(rename = "FilePath", default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    #[serde(rename = "Source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "LightningComponentBundleId", default, skip_serializing_if = "Option::is_none")]
    pub lightning_component_bundle_id: Option<String>,

    /// `js`, `html`, `css`, `xml`.
    #[serde(rename = "Format", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Body of a `ContainerAsyncRequest` create.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerAsyncRequest {
    #[serde(rename = "MetadataContainerId")]
    pub metadata_container_id: String,

    #[serde(rename = "IsCheckOnly")]
    pub is_check_only: bool,

    #[serde(rename = "IsRunTests")]
    pub is_run_tests: bool,
}

impl ToolingRecord for ContainerAsyncRequest {
    fn record_id(&self) -> Option<&str> {
        None
    }
}

impl ContainerAsyncRequest {
    /// A real (not check-only) compile without tests.
    pub fn compile(container_id: impl Into<String>) -> Self {
        Self {
            metadata_container_id: container_id.into(),
            is_check_only: false,
            is_run_tests: false,
        }
    }
}

/// State of a container compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ContainerAsyncState {
    Queued,
    Invalidated,
    Completed,
    Failed,
    Error,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl ContainerAsyncState {
    /// Anything but `Queued` ends polling.
    pub fn is_terminal(self) -> bool {
        self != ContainerAsyncState::Queued
    }

    /// Terminal states that mean the compile did not go through.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ContainerAsyncState::Invalidated
                | ContainerAsyncState::Failed
                | ContainerAsyncState::Error
                | ContainerAsyncState::Aborted
        )
    }
}

impl std::fmt::Display for ContainerAsyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContainerAsyncState::Queued => "Queued",
            ContainerAsyncState::Invalidated => "Invalidated",
            ContainerAsyncState::Completed => "Completed",
            ContainerAsyncState::Failed => "Failed",
            ContainerAsyncState::Error => "Error",
            ContainerAsyncState::Aborted => "Aborted",
            ContainerAsyncState::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// `ContainerAsyncRequest` as returned by the status query.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerAsyncRequestStatus {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "State")]
    pub state: ContainerAsyncState,

    #[serde(rename = "DeployDetails", default)]
    pub deploy_details: Option<DeployDetails>,

    #[serde(rename = "ErrorMsg", default)]
    pub error_msg: Option<String>,
}

impl ContainerAsyncRequestStatus {
    /// Component failures reported by the compile, possibly empty.
    pub fn component_failures(&self) -> &[DeployMessage] {
        self.deploy_details
            .as_ref()
            .map(|d| d.component_failures.as_slice())
            .unwrap_or_default()
    }
}

/// Structured compile outcome attached to a container request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployDetails {
    #[serde(default)]
    pub all_component_messages: Vec<DeployMessage>,
    #[serde(default)]
    pub component_failures: Vec<DeployMessage>,
    #[serde(default)]
    pub component_successes: Vec<DeployMessage>,
}

/// One component's compile message.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployMessage {
    #[serde(default)]
    pub changed: bool,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub success: bool,
    pub component_type: Option<String>,
    pub full_name: Option<String>,
    pub file_name: Option<String>,
    pub id: Option<String>,
    pub line_number: Option<i32>,
    pub column_number: Option<i32>,
    pub problem: Option<String>,
    pub problem_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_omits_absent_fields() {
        let definition = AuraDefinition {
            source: Some("<aura:component/>".to_string()),
            aura_definition_bundle_id: Some("0Ab000000000001AAA".to_string()),
            def_type: Some("COMPONENT".to_string()),
            format: Some("XML".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&definition).unwrap();
        assert!(json.get("Id").is_none());
        assert_eq!(json["DefType"], "COMPONENT");
        assert_eq!(definition.record_id(), None);
    }

    #[test]
    fn test_value_record_id() {
        let record = serde_json::json!({"Id": "0Ad000000000001AAA", "Source": "x"});
        assert_eq!(record.record_id(), Some("0Ad000000000001AAA"));
        assert_eq!(serde_json::json!({"Source": "x"}).record_id(), None);
    }

    #[test]
    fn test_container_status_deserialize() {
        let json = r#"{
            "attributes": {"type": "ContainerAsyncRequest"},
            "Id": "1dr000000000001AAA",
            "State": "Failed",
            "ErrorMsg": null,
            "DeployDetails": {
                "allComponentMessages": [],
                "componentFailures": [
                    {"problem": "Unexpected token '}'.", "problemType": "Error", "fullName": "Foo", "lineNumber": 3, "columnNumber": 1, "componentType": "ApexClass", "success": false},
                    {"problem": "Second problem", "problemType": "Error", "fullName": "Foo", "success": false}
                ],
                "componentSuccesses": []
            }
        }"#;
        let status: ContainerAsyncRequestStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.state, ContainerAsyncState::Failed);
        assert!(status.state.is_terminal());
        assert!(status.state.is_failure());
        assert_eq!(status.component_failures().len(), 2);
        assert_eq!(status.component_failures()[0].problem.as_deref(), Some("Unexpected token '}'."));
        assert_eq!(status.component_failures()[0].line_number, Some(3));
    }

    #[test]
    fn test_unknown_state_is_terminal() {
        let status: ContainerAsyncRequestStatus =
            serde_json::from_str(r#"{"Id": "1dr000000000001AAA", "State": "Exploded"}"#).unwrap();
        assert_eq!(status.state, ContainerAsyncState::Unknown);
        assert!(status.state.is_terminal());
        assert!(!status.state.is_failure());
        assert!(status.component_failures().is_empty());
    }

    #[test]
    fn test_queued_is_not_terminal() {
        assert!(!ContainerAsyncState::Queued.is_terminal());
        assert!(ContainerAsyncState::Completed.is_terminal());
        assert!(!ContainerAsyncState::Completed.is_failure());
    }
}
