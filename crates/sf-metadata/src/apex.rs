//! Anonymous Apex execution.

use fast_sfdc_client::xml;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Result of `executeAnonymous`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteAnonymousResult {
    pub compiled: bool,
    pub success: bool,
    pub line: i32,
    pub column: i32,
    pub compile_problem: Option<String>,
    pub exception_message: Option<String>,
    pub exception_stack_trace: Option<String>,
}

impl ExecuteAnonymousResult {
    pub(crate) fn from_xml(response: &str) -> Result<Self> {
        let result = xml::element(response, "result")
            .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing <result>".to_string())))?;
        let optional = |tag: &str| xml::text(result, tag).filter(|s| !s.is_empty());
        Ok(Self {
            compiled: xml::flag(result, "compiled"),
            success: xml::flag(result, "success"),
            line: xml::number(result, "line"),
            column: xml::number(result, "column"),
            compile_problem: optional("compileProblem"),
            exception_message: optional("exceptionMessage"),
            exception_stack_trace: optional("exceptionStackTrace"),
        })
    }
}

/// Execution result together with the captured debug log.
#[derive(Debug, Clone)]
pub struct AnonymousExecution {
    pub result: ExecuteAnonymousResult,
    pub debug_log: Option<String>,
}
