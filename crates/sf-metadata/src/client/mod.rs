//! Metadata and Apex SOAP client.

use fast_sfdc_client::{SalesforceClient, SfHttpClient};

mod apex;
mod deploy;
mod describe;
mod retrieve;

/// Salesforce Metadata API client, also used for the Apex SOAP service.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: SalesforceClient,
}

impl MetadataClient {
    /// Create a client with its own transport.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> crate::Result<Self> {
        Ok(Self {
            client: SalesforceClient::new(instance_url, access_token)?,
        })
    }

    /// Bind a shared transport to one session.
    pub fn from_http(
        http: SfHttpClient,
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            client: SalesforceClient::from_http(http, instance_url, access_token)
                .with_api_version(api_version),
        }
    }

    pub fn inner(&self) -> &SalesforceClient {
        &self.client
    }

    pub fn api_version(&self) -> &str {
        self.client.api_version()
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.client = self.client.with_api_version(version);
        self
    }
}
