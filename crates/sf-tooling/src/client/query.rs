use fast_sfdc_client::QueryResult;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::Result;

impl super::ToolingClient {
    /// Execute a SOQL query against the Tooling API.
    ///
    /// Returns the first page only. Values interpolated into the query must
    /// be escaped with `fast_sfdc_client::security::soql::escape_string`.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        self.client.tooling_query(soql).await.map_err(Into::into)
    }
}
