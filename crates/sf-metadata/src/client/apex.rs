use fast_sfdc_client::security::xml::escape;
use tracing::instrument;

use crate::apex::{AnonymousExecution, ExecuteAnonymousResult};
use crate::error::Result;
use crate::soap::{DebuggingHeader, SoapService};

impl super::MetadataClient {
    /// Run anonymous Apex with a `FINEST` debugging header.
    ///
    /// A compile problem or an exception is reported in the result, not as
    /// an error.
    #[instrument(skip(self, script), fields(bytes = script.len()))]
    pub async fn execute_anonymous(&self, script: &str) -> Result<AnonymousExecution> {
        let payload = format!("<String>{}</String>", escape(script));
        let response = self
            .call(
                SoapService::Apex,
                "executeAnonymous",
                &payload,
                Some(&DebuggingHeader::apex_finest()),
            )
            .await?;
        Ok(AnonymousExecution {
            result: ExecuteAnonymousResult::from_xml(&response.body)?,
            debug_log: response.debug_log,
        })
    }
}
