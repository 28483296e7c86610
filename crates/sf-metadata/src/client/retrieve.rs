use fast_sfdc_client::security::xml::escape;
use tracing::instrument;

use crate::error::Result;
use crate::retrieve::{PackageManifest, RetrieveResult};
use crate::soap::{required, SoapService};

impl super::MetadataClient {
    /// Start an unpackaged retrieve and return the async process id.
    ///
    /// Always sent as a single package.
    #[instrument(skip(self, manifest), fields(types = manifest.types.len()))]
    pub async fn retrieve(&self, manifest: &PackageManifest) -> Result<String> {
        let payload = format!(
            "<retrieveRequest><apiVersion>{}</apiVersion><singlePackage>true</singlePackage><unpackaged>{}</unpackaged></retrieveRequest>",
            escape(self.api_version()),
            manifest.to_xml()
        );
        let response = self
            .call(SoapService::Metadata, "retrieve", &payload, None)
            .await?;
        required(&response.body, "id")
    }

    /// Check the status of a retrieve operation.
    #[instrument(skip(self))]
    pub async fn check_retrieve_status(
        &self,
        async_process_id: &str,
        include_zip: bool,
    ) -> Result<RetrieveResult> {
        let payload = format!(
            "<asyncProcessId>{}</asyncProcessId><includeZip>{include_zip}</includeZip>",
            escape(async_process_id)
        );
        let response = self
            .call(SoapService::Metadata, "checkRetrieveStatus", &payload, None)
            .await?;
        RetrieveResult::from_xml(&response.body)
    }
}
