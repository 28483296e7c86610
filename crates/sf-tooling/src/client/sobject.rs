use fast_sfdc_client::security::{soql, url as url_security};
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::types::{CreateResponse, ToolingRecord};

fn check_sobject(sobject: &str) -> Result<()> {
    if soql::is_safe_sobject_name(sobject) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidInput(format!(
            "invalid sObject name '{sobject}'"
        ))))
    }
}

fn check_id(id: &str) -> Result<()> {
    if url_security::is_valid_salesforce_id(id) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidInput(format!(
            "invalid record id '{id}'"
        ))))
    }
}

impl super::ToolingClient {
    /// Create a Tooling API sObject and return its id.
    #[instrument(skip(self, record))]
    pub async fn create<R: ToolingRecord>(&self, sobject: &str, record: &R) -> Result<String> {
        check_sobject(sobject)?;
        let path = format!("sobjects/{sobject}");
        let result: CreateResponse = self.client.tooling_post(&path, record).await?;

        if result.success {
            debug!(id = %result.id, "Created");
            Ok(result.id)
        } else {
            Err(Error::new(ErrorKind::Salesforce {
                error_code: result
                    .errors
                    .first()
                    .map(|e| e.status_code.clone())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "CREATE_FAILED".to_string()),
                message: result
                    .errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            }))
        }
    }

    /// Update fields of an existing record.
    ///
    /// `body` must not carry the id; the server rejects it on PATCH.
    #[instrument(skip(self, body))]
    pub async fn update<B: serde::Serialize>(&self, sobject: &str, id: &str, body: &B) -> Result<()> {
        check_sobject(sobject)?;
        check_id(id)?;
        let path = format!("sobjects/{sobject}/{id}");
        self.client.tooling_patch(&path, body).await.map_err(Into::into)
    }

    /// Delete a Tooling API sObject.
    #[instrument(skip(self))]
    pub async fn delete(&self, sobject: &str, id: &str) -> Result<()> {
        check_sobject(sobject)?;
        check_id(id)?;
        let path = format!("sobjects/{sobject}/{id}");
        self.client.tooling_delete(&path).await.map_err(Into::into)
    }
}
