//! Tooling API client.
//!
//! This client wraps a session-bound `SalesforceClient` and exposes the
//! sObject and query endpoints the compile workflows need.

use fast_sfdc_client::{SalesforceClient, SfHttpClient};

mod query;
mod sobject;

/// Salesforce Tooling API client.
///
/// ```rust,ignore
/// use fast_sfdc_tooling::{MetadataContainer, ToolingClient};
///
/// let client = ToolingClient::new("https://myorg.my.salesforce.com", "00D...")?;
/// let id = client
///     .create("MetadataContainer", &MetadataContainer { id: None, name: "fsf-1".into() })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ToolingClient {
    client: SalesforceClient,
}

impl ToolingClient {
    /// Create a client with its own transport.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> crate::Result<Self> {
        let client = SalesforceClient::new(instance_url, access_token)?;
        Ok(Self { client })
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

    /// Get the underlying SalesforceClient.
    pub fn inner(&self) -> &SalesforceClient {
        &self.client
    }

    pub fn instance_url(&self) -> &str {
        self.client.instance_url()
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
