//! Session-bound client with typed JSON helpers.
//!
//! `SalesforceClient` pairs the shared [`SfHttpClient`] with one session
//! (instance URL, token, API version). It is cheap to build, so callers
//! create one per dispatched call instead of mutating a long-lived one.

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::client::SfHttpClient;
use crate::error::Result;
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::security::soql;
use crate::DEFAULT_API_VERSION;

/// HTTP client bound to one session.
///
/// The access token is redacted in Debug output.
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Bind an existing transport to an instance URL and access token.
    pub fn from_http(
        http: SfHttpClient,
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Create a client with its own default transport.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::from_http(
            SfHttpClient::default_client()?,
            instance_url,
            access_token,
        ))
    }

    /// Set the API version (e.g., "45.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The shared transport.
    pub fn http(&self) -> &SfHttpClient {
        &self.http
    }

    /// Build the full URL for a path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }

    /// Tooling API URL, e.g. `tooling_url("sobjects/ApexClassMember")`.
    pub fn tooling_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/data/v{}/tooling/{}",
            self.instance_url, self.api_version, path
        )
    }

    /// Metadata API SOAP endpoint.
    pub fn metadata_url(&self) -> String {
        format!("{}/services/Soap/m/{}", self.instance_url, self.api_version)
    }

    /// Apex API SOAP endpoint.
    pub fn apex_url(&self) -> String {
        format!("{}/services/Soap/s/{}", self.instance_url, self.api_version)
    }

    /// Create a GET request builder with authentication.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.access_token)
    }

    /// Create a POST request builder with authentication.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.access_token)
    }

    /// Create a PATCH request builder with authentication.
    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.http.patch(url).bearer_auth(&self.access_token)
    }

    /// Create a DELETE request builder with authentication.
    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.http.delete(url).bearer_auth(&self.access_token)
    }

    /// Execute a request, mapping non-2xx responses to errors.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    /// Execute a request and hand back whatever status came back.
    pub async fn execute_raw(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute_raw(&request).await
    }

    /// GET request with JSON response deserialization.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let request = self.get(&self.url(url));
        self.http.send_json(request).await
    }

    /// POST request with JSON body and response.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.post(&self.url(url)).json(body)?;
        self.http.send_json(request).await
    }

    /// POST request to Tooling API with JSON body and response.
    pub async fn tooling_post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.post_json(&self.tooling_url(path), body).await
    }

    /// PATCH request with JSON body. Salesforce answers 204 on success.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn patch_json<B: Serialize>(&self, url: &str, body: &B) -> Result<()> {
        let request = self.patch(&self.url(url)).json(body)?;
        self.http.execute(request).await?;
        Ok(())
    }

    /// PATCH request to Tooling API.
    pub async fn tooling_patch<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.patch_json(&self.tooling_url(path), body).await
    }

    /// DELETE request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn delete_request(&self, url: &str) -> Result<()> {
        let request = self.delete(&self.url(url));
        self.http.execute(request).await?;
        Ok(())
    }

    /// DELETE request to Tooling API.
    pub async fn tooling_delete(&self, path: &str) -> Result<()> {
        self.delete_request(&self.tooling_url(path)).await
    }

    /// Run a SOQL query against the Tooling API.
    ///
    /// Runs of spaces are collapsed before the query is URL-encoded.
    pub async fn tooling_query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let normalized = soql::collapse_spaces(soql);
        let url = format!(
            "{}?q={}",
            self.tooling_url("query"),
            urlencoding::encode(&normalized)
        );
        self.get_json(&url).await
    }
}

/// Result of a SOQL query.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// URL to fetch next batch of results.
    #[serde(rename = "nextRecordsUrl", default)]
    pub next_records_url: Option<String>,

    /// The records.
    pub records: Vec<T>,
}
