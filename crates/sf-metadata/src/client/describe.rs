use fast_sfdc_client::security::xml::escape;
use tracing::instrument;

use crate::describe::DescribeMetadataResult;
use crate::error::Result;
use crate::soap::SoapService;

impl super::MetadataClient {
    /// Describe the metadata types available at the client's API version.
    #[instrument(skip(self))]
    pub async fn describe_metadata(&self) -> Result<DescribeMetadataResult> {
        let payload = format!("<asOfVersion>{}</asOfVersion>", escape(self.api_version()));
        let response = self
            .call(SoapService::Metadata, "describeMetadata", &payload, None)
            .await?;
        DescribeMetadataResult::from_xml(&response.body)
    }
}
