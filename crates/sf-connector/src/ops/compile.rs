//! Creating and compiling components.

use fast_sfdc_tooling::{
    AuraDefinition, AuraDefinitionBundle, ContainerAsyncRequestStatus, DeployMessage,
    LightningComponentBundle, LightningComponentResource, MetadataMember,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::connector::Connector;
use crate::error::{Error, ErrorKind, Result};
use crate::kind::{ComponentMetadata, CreationStrategy, MetadataKind};

/// Container names are limited to 32 characters.
fn unique_container_name() -> String {
    let mut name = format!("fsf-{}", uuid::Uuid::new_v4().simple());
    name.truncate(32);
    name
}

/// A component created by [`Connector::create_metadata`].
#[derive(Debug, Clone)]
pub struct CreatedComponent {
    pub kind: MetadataKind,
    pub name: String,
    /// Source sent to the org.
    pub body: String,
    pub metadata: ComponentMetadata,
    /// Id of the bundle's member record. `None` for compiled kinds.
    pub remote_id: Option<String>,
    /// Terminal container request of a compiled kind.
    pub compile: Option<ContainerAsyncRequestStatus>,
}

impl CreatedComponent {
    /// Where the source belongs below the project's `src` folder.
    pub fn relative_path(&self) -> String {
        self.kind.relative_path(&self.name)
    }
}

impl Connector {
    /// Compile one member through a fresh metadata container.
    ///
    /// The container is deleted afterwards whatever the outcome. Component
    /// failures surface as [`ErrorKind::ComponentFailure`] carrying the
    /// first failure's problem text unchanged.
    #[instrument(skip(self, member), fields(full_name = ?member.full_name))]
    pub async fn compile(
        &self,
        tooling_type: &str,
        member: MetadataMember,
    ) -> Result<ContainerAsyncRequestStatus> {
        let container_id = self.create_metadata_container(&unique_container_name()).await?;
        let outcome = self.compile_in(&container_id, tooling_type, member).await;

        if let Err(err) = self.delete_obj("MetadataContainer", &container_id).await {
            warn!(container = %container_id, error = %err, "Failed to delete metadata container");
        }

        let status = outcome?;
        if let Some(first) = status.component_failures().first() {
            return Err(Error::new(ErrorKind::ComponentFailure {
                problem: failure_problem(first),
                failures: status.component_failures().to_vec(),
            }));
        }
        if status.state.is_failure() {
            return Err(Error::new(ErrorKind::JobFailed(Box::new(status))));
        }
        Ok(status)
    }

    async fn compile_in(
        &self,
        container_id: &str,
        tooling_type: &str,
        member: MetadataMember,
    ) -> Result<ContainerAsyncRequestStatus> {
        let member = MetadataMember {
            metadata_container_id: Some(container_id.to_string()),
            ..member
        };
        self.upsert_obj(tooling_type, &member).await?;
        let handle = self.create_container_async_request(container_id).await?;
        self.poll_deployment_status(&handle, &self.child_token()).await
    }

    /// Create a new component of `kind` from its starter template.
    ///
    /// Triggers need the sObject they fire on.
    #[instrument(skip(self))]
    pub async fn create_metadata(
        &self,
        kind: MetadataKind,
        name: &str,
        sobject: Option<&str>,
    ) -> Result<CreatedComponent> {
        if name.trim().is_empty() {
            return Err(Error::config(format!("{kind} name is empty")));
        }
        if kind.requires_sobject() && sobject.is_none_or(|s| s.trim().is_empty()) {
            return Err(Error::config(format!("{kind} needs an sObject name")));
        }

        let api_version = self.session_state().config().await.api_version;
        let body = kind.template(name, sobject);
        let metadata = kind.metadata(name, api_version);

        let (remote_id, compile) = match kind.strategy() {
            CreationStrategy::Compiled => {
                let member = MetadataMember {
                    body: body.clone(),
                    full_name: Some(name.to_string()),
                    metadata: Some(metadata_value(&metadata)?),
                    ..Default::default()
                };
                (None, Some(self.compile(kind.tooling_type(), member).await?))
            }
            CreationStrategy::AuraBundle => {
                (Some(self.create_aura_bundle(name, &body, &metadata).await?), None)
            }
            CreationStrategy::LwcBundle => (Some(self.create_lwc_bundle(name, &body).await?), None),
        };

        info!(%kind, name, "Component created");
        Ok(CreatedComponent {
            kind,
            name: name.to_string(),
            body,
            metadata,
            remote_id,
            compile,
        })
    }

    async fn create_aura_bundle(&self, name: &str, body: &str, metadata: &ComponentMetadata) -> Result<String> {
        let bundle = AuraDefinitionBundle {
            api_version: Some(f64::from(metadata.api_version)),
            description: metadata.description.clone(),
            developer_name: Some(name.to_string()),
            master_label: Some(name.to_string()),
            ..Default::default()
        };
        let bundle_id = self.upsert_obj("AuraDefinitionBundle", &bundle).await?;

        let definition = AuraDefinition {
            source: Some(body.to_string()),
            aura_definition_bundle_id: Some(bundle_id.clone()),
            def_type: Some("COMPONENT".to_string()),
            format: Some("XML".to_string()),
            ..Default::default()
        };
        let created = self.upsert_aura_obj(&definition).await;
        self.discard_orphan("AuraDefinitionBundle", &bundle_id, created).await
    }

    async fn create_lwc_bundle(&self, name: &str, body: &str) -> Result<String> {
        let bundle = LightningComponentBundle {
            full_name: Some(name.to_string()),
            metadata: Some(Value::Object(Default::default())),
            ..Default::default()
        };
        let bundle_id = self.upsert_obj("LightningComponentBundle", &bundle).await?;

        let resource = LightningComponentResource {
            file_path: Some(format!("lwc/{name}/{name}.js")),
            source: Some(body.to_string()),
            lightning_component_bundle_id: Some(bundle_id.clone()),
            format: Some("js".to_string()),
            ..Default::default()
        };
        let created = self.upsert_lwc_obj(&resource).await;
        self.discard_orphan("LightningComponentBundle", &bundle_id, created).await
    }

    /// Delete the bundle when its member could not be created.
    async fn discard_orphan(
        &self,
        bundle_type: &str,
        bundle_id: &str,
        member: Result<String>,
    ) -> Result<String> {
        if member.is_err() {
            if let Err(err) = self.delete_obj(bundle_type, bundle_id).await {
                warn!(bundle = %bundle_id, error = %err, "Failed to delete orphaned bundle");
            }
        }
        member
    }
}

/// Problem text of a component failure, or the best description the server left.
fn failure_problem(failure: &DeployMessage) -> String {
    [&failure.problem, &failure.problem_type, &failure.full_name]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| "Component failed to compile".to_string())
}

fn metadata_value(metadata: &ComponentMetadata) -> Result<Value> {
    serde_json::to_value(metadata).map_err(|e| Error::with_source(ErrorKind::Tooling(e.to_string()), e))
}
