//! Common types for Metadata API.

use fast_sfdc_client::xml;
use serde::{Deserialize, Serialize};

/// Test level for deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TestLevel {
    /// No tests run.
    #[default]
    NoTestRun,
    /// Run local tests only.
    RunLocalTests,
    /// Run all tests in org.
    RunAllTestsInOrg,
    /// Run specified tests.
    RunSpecifiedTests,
}

impl std::fmt::Display for TestLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestLevel::NoTestRun => write!(f, "NoTestRun"),
            TestLevel::RunLocalTests => write!(f, "RunLocalTests"),
            TestLevel::RunAllTestsInOrg => write!(f, "RunAllTestsInOrg"),
            TestLevel::RunSpecifiedTests => write!(f, "RunSpecifiedTests"),
        }
    }
}

/// A component deployment success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSuccess {
    pub component_type: Option<String>,
    pub file_name: Option<String>,
    pub full_name: Option<String>,
    pub created: bool,
    pub deleted: bool,
}

impl ComponentSuccess {
    pub(crate) fn from_xml(block: &str) -> Self {
        Self {
            component_type: xml::text(block, "componentType"),
            file_name: xml::text(block, "fileName"),
            full_name: xml::text(block, "fullName"),
            created: xml::flag(block, "created"),
            deleted: xml::flag(block, "deleted"),
        }
    }
}

/// A test failure during deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestFailure {
    pub name: Option<String>,
    pub method_name: Option<String>,
    pub message: Option<String>,
    pub stack_trace: Option<String>,
    pub namespace: Option<String>,
}

impl TestFailure {
    pub(crate) fn from_xml(block: &str) -> Self {
        Self {
            name: xml::text(block, "name"),
            method_name: xml::text(block, "methodName"),
            message: xml::text(block, "message"),
            stack_trace: xml::text(block, "stackTrace"),
            namespace: xml::text(block, "namespace").filter(|s| !s.is_empty()),
        }
    }
}

/// Properties of a file in a retrieve result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileProperties {
    pub created_by_id: String,
    pub created_by_name: String,
    pub created_date: String,
    pub file_name: String,
    pub full_name: String,
    pub id: String,
    pub last_modified_by_id: String,
    pub last_modified_by_name: String,
    pub last_modified_date: String,
    pub manageable_state: Option<String>,
    pub namespace_prefix: Option<String>,
    pub component_type: String,
}

impl FileProperties {
    pub(crate) fn from_xml(block: &str) -> Self {
        let field = |tag: &str| xml::text(block, tag).unwrap_or_default();
        Self {
            created_by_id: field("createdById"),
            created_by_name: field("createdByName"),
            created_date: field("createdDate"),
            file_name: field("fileName"),
            full_name: field("fullName"),
            id: field("id"),
            last_modified_by_id: field("lastModifiedById"),
            last_modified_by_name: field("lastModifiedByName"),
            last_modified_date: field("lastModifiedDate"),
            manageable_state: xml::text(block, "manageableState"),
            namespace_prefix: xml::text(block, "namespacePrefix").filter(|s| !s.is_empty()),
            component_type: field("type"),
        }
    }
}
