//! Tooling object operations.

use fast_sfdc_client::security::soql;
use fast_sfdc_tooling::{
    AuraDefinition, ContainerAsyncRequest, ContainerAsyncRequestStatus, LightningComponentResource,
    MetadataContainer, QueryResult, ToolingRecord,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::connector::{Connector, Protocol};
use crate::error::{Error, ErrorKind, Result};
use crate::poll::{poll_until, JobHandle, JobKind};

/// Fields the PATCH endpoint refuses to receive.
const READ_ONLY_ON_EDIT: [&str; 3] = ["Id", "MetadataContainerId", "AuraDefinitionBundleId"];

#[derive(Debug, Deserialize)]
struct IdOnly {
    #[serde(rename = "Id")]
    id: String,
}

fn edit_body<R: ToolingRecord>(record: &R) -> Result<Value> {
    let mut body = serde_json::to_value(record)
        .map_err(|e| Error::with_source(ErrorKind::Tooling(e.to_string()), e))?;
    if let Value::Object(fields) = &mut body {
        for field in READ_ONLY_ON_EDIT {
            fields.remove(field);
        }
    }
    Ok(body)
}

fn existing_id<R: ToolingRecord>(record: &R) -> Option<&str> {
    record.record_id().filter(|id| !id.is_empty())
}

impl Connector {
    /// Update the record when it carries an id, create it otherwise.
    /// Returns the record's id either way.
    pub async fn upsert_obj<R: ToolingRecord>(&self, tooling_type: &str, record: &R) -> Result<String> {
        if existing_id(record).is_some() {
            self.edit_obj(tooling_type, record).await
        } else {
            self.create_obj(tooling_type, record).await
        }
    }

    /// `POST /sobjects/{type}`; returns the new id.
    #[instrument(skip(self, record))]
    pub async fn create_obj<R: ToolingRecord>(&self, tooling_type: &str, record: &R) -> Result<String> {
        self.execute(Protocol::Rest, "create_obj", |session| {
            let client = self.tooling(&session);
            async move { client.create(tooling_type, record).await.map_err(Error::from) }
        })
        .await
    }

    /// `PATCH /sobjects/{type}/{id}`; returns the record's own id.
    #[instrument(skip(self, record))]
    pub async fn edit_obj<R: ToolingRecord>(&self, tooling_type: &str, record: &R) -> Result<String> {
        let id = existing_id(record)
            .ok_or_else(|| Error::new(ErrorKind::Tooling(format!("{tooling_type} record has no Id to edit"))))?;
        let body = edit_body(record)?;

        self.execute(Protocol::Rest, "edit_obj", |session| {
            let client = self.tooling(&session);
            let body = &body;
            async move { client.update(tooling_type, id, body).await.map_err(Error::from) }
        })
        .await?;
        Ok(id.to_string())
    }

    #[instrument(skip(self))]
    pub async fn delete_obj(&self, tooling_type: &str, id: &str) -> Result<()> {
        self.execute(Protocol::Rest, "delete_obj", |session| {
            let client = self.tooling(&session);
            async move { client.delete(tooling_type, id).await.map_err(Error::from) }
        })
        .await
    }

    pub async fn upsert_aura_obj(&self, record: &AuraDefinition) -> Result<String> {
        self.upsert_obj("AuraDefinition", record).await
    }

    pub async fn upsert_lwc_obj(&self, record: &LightningComponentResource) -> Result<String> {
        self.upsert_obj("LightningComponentResource", record).await
    }

    /// Run a Tooling SOQL query.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        self.execute(Protocol::Rest, "query", |session| {
            let client = self.tooling(&session);
            async move { client.query(soql).await.map_err(Error::from) }
        })
        .await
    }

    /// Create a `MetadataContainer` and return its id.
    pub async fn create_metadata_container(&self, name: &str) -> Result<String> {
        let container = MetadataContainer {
            id: None,
            name: name.to_string(),
        };
        self.create_obj("MetadataContainer", &container).await
    }

    /// Start compiling the members of a container.
    pub async fn create_container_async_request(&self, container_id: &str) -> Result<JobHandle> {
        let request = ContainerAsyncRequest::compile(container_id);
        let id = self.create_obj("ContainerAsyncRequest", &request).await?;
        Ok(JobHandle::new(id, JobKind::ContainerAsyncRequest))
    }

    /// Poll a container compile until it leaves `Queued`.
    #[instrument(skip(self, handle, cancel), fields(job = %handle.id()))]
    pub async fn poll_deployment_status(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<ContainerAsyncRequestStatus> {
        let id = handle.id_for(JobKind::ContainerAsyncRequest)?;
        let statement = format!(
            "SELECT Id, State, DeployDetails, ErrorMsg FROM ContainerAsyncRequest WHERE Id = '{}'",
            soql::escape_string(id)
        );

        let statement = &statement;
        poll_until(
            handle,
            &self.poll_settings().container,
            cancel,
            || async move {
                let result: QueryResult<ContainerAsyncRequestStatus> = self.query(statement).await?;
                result
                    .records
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::new(ErrorKind::NotFound(format!("ContainerAsyncRequest {id}"))))
            },
            |status: &ContainerAsyncRequestStatus| status.state.is_terminal(),
            |status: &ContainerAsyncRequestStatus| debug!(state = %status.state, "Container request state"),
        )
        .await
    }

    /// The Aura definition of `def_type` (e.g. `COMPONENT`) in a bundle.
    pub async fn find_aura_by_name_and_def_type(
        &self,
        bundle_name: &str,
        def_type: &str,
    ) -> Result<Option<AuraDefinition>> {
        let statement = format!(
            "SELECT Id, AuraDefinitionBundleId FROM AuraDefinition WHERE AuraDefinitionBundle.DeveloperName = '{}' AND DefType = '{}'",
            soql::escape_string(bundle_name),
            soql::escape_string(def_type)
        );
        let result: QueryResult<AuraDefinition> = self.query(&statement).await?;
        Ok(result.records.into_iter().next())
    }

    /// A resource of a Lightning web component bundle by format and,
    /// optionally, file path.
    pub async fn find_lwc_by_name_and_def_type(
        &self,
        bundle_name: &str,
        format: &str,
        file_path: Option<&str>,
    ) -> Result<Option<LightningComponentResource>> {
        let mut statement = format!(
            "SELECT Id FROM LightningComponentResource WHERE LightningComponentBundle.DeveloperName = '{}' AND Format = '{}'",
            soql::escape_string(bundle_name),
            soql::escape_string(format)
        );
        if let Some(file_path) = file_path {
            statement.push_str(&format!(" AND FilePath = '{}'", soql::escape_string(file_path)));
        }
        let result: QueryResult<LightningComponentResource> = self.query(&statement).await?;
        Ok(result.records.into_iter().next())
    }

    pub async fn find_lwc_bundle_id(&self, bundle_name: &str) -> Result<String> {
        let statement = format!(
            "SELECT Id FROM LightningComponentBundle WHERE DeveloperName = '{}'",
            soql::escape_string(bundle_name)
        );
        let result: QueryResult<IdOnly> = self.query(&statement).await?;
        result
            .records
            .into_iter()
            .next()
            .map(|record| record.id)
            .ok_or_else(|| Error::new(ErrorKind::NotFound(format!("LightningComponentBundle {bundle_name}"))))
    }
}
