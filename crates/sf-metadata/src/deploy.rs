//! Deploy operations.

use fast_sfdc_client::security::xml::escape;
use fast_sfdc_client::xml;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, ErrorKind, Result};
use crate::types::{ComponentSuccess, TestFailure, TestLevel};

/// Options for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub allow_missing_files: bool,
    pub auto_update_package: bool,
    /// Validate only, don't actually deploy.
    pub check_only: bool,
    pub ignore_warnings: bool,
    pub perform_retrieve: bool,
    pub purge_on_delete: bool,
    pub rollback_on_error: bool,
    pub run_all_tests: bool,
    pub single_package: bool,
    pub test_level: Option<TestLevel>,
    /// Only sent with [`TestLevel::RunSpecifiedTests`].
    pub run_tests: Vec<String>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            allow_missing_files: false,
            auto_update_package: false,
            check_only: false,
            ignore_warnings: true,
            perform_retrieve: false,
            purge_on_delete: false,
            rollback_on_error: true,
            run_all_tests: false,
            single_package: true,
            test_level: None,
            run_tests: vec![],
        }
    }
}

impl DeployOptions {
    pub(crate) fn to_xml(&self) -> String {
        let mut out = format!(
            "<allowMissingFiles>{}</allowMissingFiles>\
             <autoUpdatePackage>{}</autoUpdatePackage>\
             <checkOnly>{}</checkOnly>\
             <ignoreWarnings>{}</ignoreWarnings>\
             <performRetrieve>{}</performRetrieve>\
             <purgeOnDelete>{}</purgeOnDelete>\
             <rollbackOnError>{}</rollbackOnError>\
             <runAllTests>{}</runAllTests>\
             <singlePackage>{}</singlePackage>",
            self.allow_missing_files,
            self.auto_update_package,
            self.check_only,
            self.ignore_warnings,
            self.perform_retrieve,
            self.purge_on_delete,
            self.rollback_on_error,
            self.run_all_tests,
            self.single_package,
        );
        if let Some(level) = self.test_level {
            out.push_str(&format!("<testLevel>{level}</testLevel>"));
            if level == TestLevel::RunSpecifiedTests {
                for test in &self.run_tests {
                    out.push_str(&format!("<runTests>{}</runTests>", escape(test)));
                }
            }
        }
        out
    }
}

/// Deployment status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployStatus {
    Pending,
    InProgress,
    Succeeded,
    SucceededPartial,
    Failed,
    Canceling,
    Canceled,
    /// A status this client does not know, kept as sent.
    Unknown(String),
}

impl std::str::FromStr for DeployStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(DeployStatus::Pending),
            "InProgress" => Ok(DeployStatus::InProgress),
            "Succeeded" => Ok(DeployStatus::Succeeded),
            "SucceededPartial" => Ok(DeployStatus::SucceededPartial),
            "Failed" => Ok(DeployStatus::Failed),
            "Canceling" => Ok(DeployStatus::Canceling),
            "Canceled" => Ok(DeployStatus::Canceled),
            _ => Err(format!("Unknown deploy status: {}", s)),
        }
    }
}

/// Result of `checkDeployStatus`.
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub id: String,
    pub done: bool,
    pub status: DeployStatus,
    pub success: bool,
    pub error_message: Option<String>,
    pub number_components_deployed: u32,
    pub number_components_errors: u32,
    pub number_components_total: u32,
    pub number_tests_completed: u32,
    pub number_tests_errors: u32,
    pub number_tests_total: u32,
    pub component_failures: Vec<ComponentFailure>,
    pub component_successes: Vec<ComponentSuccess>,
    pub test_failures: Vec<TestFailure>,
    pub state_detail: Option<String>,
}

impl DeployResult {
    pub(crate) fn from_xml(response: &str) -> Result<Self> {
        let result = xml::element(response, "result")
            .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing <result>".to_string())))?;
        let details = xml::element(result, "details").unwrap_or_default();
        let top = xml::without(result, "details");

        let test_failures = xml::element(details, "runTestResult")
            .map(|run| {
                xml::elements(run, "failures")
                    .into_iter()
                    .map(TestFailure::from_xml)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: crate::soap::required(&top, "id")?,
            done: xml::flag(&top, "done"),
            status: xml::text(&top, "status")
                .map(|raw| {
                    raw.parse().unwrap_or_else(|_| {
                        warn!(status = %raw, "Unrecognised deploy status");
                        DeployStatus::Unknown(raw)
                    })
                })
                .unwrap_or(DeployStatus::Pending),
            success: xml::flag(&top, "success"),
            error_message: xml::text(&top, "errorMessage").filter(|s| !s.is_empty()),
            number_components_deployed: xml::number(&top, "numberComponentsDeployed"),
            number_components_errors: xml::number(&top, "numberComponentErrors"),
            number_components_total: xml::number(&top, "numberComponentsTotal"),
            number_tests_completed: xml::number(&top, "numberTestsCompleted"),
            number_tests_errors: xml::number(&top, "numberTestErrors"),
            number_tests_total: xml::number(&top, "numberTestsTotal"),
            component_failures: xml::elements(details, "componentFailures")
                .into_iter()
                .map(ComponentFailure::from_xml)
                .collect(),
            component_successes: xml::elements(details, "componentSuccesses")
                .into_iter()
                .map(ComponentSuccess::from_xml)
                .collect(),
            test_failures,
            state_detail: xml::text(&top, "stateDetail").filter(|s| !s.is_empty()),
        })
    }
}

/// A component failure in deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentFailure {
    pub component_type: Option<String>,
    pub file_name: Option<String>,
    pub full_name: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
    pub problem: String,
    pub problem_type: String,
    pub created: bool,
    pub deleted: bool,
}

impl ComponentFailure {
    fn from_xml(block: &str) -> Self {
        Self {
            component_type: xml::text(block, "componentType"),
            file_name: xml::text(block, "fileName"),
            full_name: xml::text(block, "fullName"),
            line_number: xml::text(block, "lineNumber").and_then(|s| s.trim().parse().ok()),
            column_number: xml::text(block, "columnNumber").and_then(|s| s.trim().parse().ok()),
            problem: xml::text(block, "problem").unwrap_or_else(|| "Unknown problem".to_string()),
            problem_type: xml::text(block, "problemType").unwrap_or_else(|| "Error".to_string()),
            created: xml::flag(block, "created"),
            deleted: xml::flag(block, "deleted"),
        }
    }
}
