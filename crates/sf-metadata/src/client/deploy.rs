use base64::{engine::general_purpose, Engine as _};
use fast_sfdc_client::security::xml::escape;
use tracing::instrument;

use crate::deploy::{DeployOptions, DeployResult};
use crate::error::Result;
use crate::soap::{required, SoapService};

impl super::MetadataClient {
    /// Deploy a base64-encoded zip and return the async process id.
    #[instrument(skip(self, zip_base64, options), fields(bytes = zip_base64.len()))]
    pub async fn deploy_base64(&self, zip_base64: &str, options: &DeployOptions) -> Result<String> {
        let payload = format!(
            "<ZipFile>{}</ZipFile><DeployOptions>{}</DeployOptions>",
            escape(zip_base64),
            options.to_xml()
        );
        let response = self
            .call(SoapService::Metadata, "deploy", &payload, None)
            .await?;
        required(&response.body, "id")
    }

    /// Deploy raw zip bytes.
    pub async fn deploy(&self, package_zip: &[u8], options: &DeployOptions) -> Result<String> {
        let encoded = general_purpose::STANDARD.encode(package_zip);
        self.deploy_base64(&encoded, options).await
    }

    /// Check the status of a deploy operation.
    #[instrument(skip(self))]
    pub async fn check_deploy_status(
        &self,
        async_process_id: &str,
        include_details: bool,
    ) -> Result<DeployResult> {
        let payload = format!(
            "<asyncProcessId>{}</asyncProcessId><includeDetails>{include_details}</includeDetails>",
            escape(async_process_id)
        );
        let response = self
            .call(SoapService::Metadata, "checkDeployStatus", &payload, None)
            .await?;
        DeployResult::from_xml(&response.body)
    }
}
