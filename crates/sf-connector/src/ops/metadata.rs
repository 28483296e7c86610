//! Metadata and Apex SOAP operations.

use std::path::Path;
use std::time::Duration;

use fast_sfdc_metadata::{
    AnonymousExecution, DeployOptions, DeployResult, DescribeMetadataResult, PackageManifest,
    RetrieveResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::connector::{Connector, Protocol};
use crate::error::{Error, ErrorKind, Result};
use crate::poll::{poll_until, JobHandle, JobKind, PollCadence};

impl Connector {
    /// Start a retrieve for the `package.xml` at `package_xml`.
    #[instrument(skip(self, package_xml), fields(path = %package_xml.as_ref().display()))]
    pub async fn retrieve_metadata(&self, package_xml: impl AsRef<Path>) -> Result<JobHandle> {
        let contents = tokio::fs::read_to_string(package_xml.as_ref()).await?;
        let manifest = PackageManifest::from_xml(&contents)?;
        self.submit_retrieve(&manifest).await
    }

    /// Start a retrieve of the one component stored at `file_path`.
    ///
    /// The parent directory picks the metadata types (`classes`, `aura`, ...)
    /// and the file stem is the member name.
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub async fn retrieve_single_metadata(&self, file_path: impl AsRef<Path>) -> Result<JobHandle> {
        let file_path = file_path.as_ref();
        let folder = file_path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::config(format!("{} has no parent folder", file_path.display())))?;
        let member = file_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::config(format!("{} has no file name", file_path.display())))?;

        let describe = self.describe_metadata().await?;
        let manifest = describe
            .types_in_directory(folder)
            .fold(PackageManifest::new(), |manifest, metadata_type| {
                manifest.add_type(metadata_type.xml_name.clone(), vec![member.to_string()])
            });
        if manifest.types.is_empty() {
            return Err(Error::new(ErrorKind::NotFound(format!(
                "no metadata type is stored in '{folder}'"
            ))));
        }
        self.submit_retrieve(&manifest).await
    }

    async fn submit_retrieve(&self, manifest: &PackageManifest) -> Result<JobHandle> {
        let id = self
            .execute(Protocol::Soap, "retrieve", |session| {
                let client = self.metadata(&session);
                async move { client.retrieve(manifest).await.map_err(Error::from) }
            })
            .await?;
        Ok(JobHandle::new(id, JobKind::MetadataRetrieve))
    }

    /// Poll a retrieve until `done`. The result carries the base64 zip.
    #[instrument(skip(self, handle, cancel), fields(job = %handle.id()))]
    pub async fn poll_retrieve_metadata_status(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<RetrieveResult> {
        let id = handle.id_for(JobKind::MetadataRetrieve)?;

        poll_until(
            handle,
            &self.poll_settings().retrieve,
            cancel,
            || async move {
                self.execute(Protocol::Soap, "checkRetrieveStatus", |session| {
                    let client = self.metadata(&session);
                    async move { client.check_retrieve_status(id, true).await.map_err(Error::from) }
                })
                .await
            },
            |result: &RetrieveResult| result.done,
            |result: &RetrieveResult| {
                if result.done {
                    info!("Retrieve completed");
                } else {
                    info!(status = ?result.status, "Checking retrieve status");
                }
            },
        )
        .await
    }

    /// Start a deploy of a base64-encoded zip.
    #[instrument(skip(self, zip_base64, options), fields(bytes = zip_base64.len()))]
    pub async fn deploy_metadata(&self, zip_base64: &str, options: &DeployOptions) -> Result<JobHandle> {
        let id = self
            .execute(Protocol::Soap, "deploy", |session| {
                let client = self.metadata(&session);
                async move { client.deploy_base64(zip_base64, options).await.map_err(Error::from) }
            })
            .await?;
        Ok(JobHandle::new(id, JobKind::MetadataDeploy))
    }

    /// Poll a deploy until `done`.
    ///
    /// `progress` sees every status, the final one included. `interval`
    /// overrides the configured deploy cadence.
    #[instrument(skip(self, handle, progress, cancel), fields(job = %handle.id()))]
    pub async fn poll_deploy_metadata_status(
        &self,
        handle: &JobHandle,
        mut progress: Option<&mut (dyn FnMut(&DeployResult) + Send)>,
        interval: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<DeployResult> {
        let id = handle.id_for(JobKind::MetadataDeploy)?;
        let mut options = self.poll_settings().deploy;
        if let Some(interval) = interval {
            options.cadence = PollCadence::Fixed(interval);
        }

        poll_until(
            handle,
            &options,
            cancel,
            || async move {
                self.execute(Protocol::Soap, "checkDeployStatus", |session| {
                    let client = self.metadata(&session);
                    async move { client.check_deploy_status(id, true).await.map_err(Error::from) }
                })
                .await
            },
            |result: &DeployResult| result.done,
            |result: &DeployResult| {
                if let Some(progress) = progress.as_deref_mut() {
                    progress(result);
                }
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn describe_metadata(&self) -> Result<DescribeMetadataResult> {
        self.execute(Protocol::Soap, "describeMetadata", |session| {
            let client = self.metadata(&session);
            async move { client.describe_metadata().await.map_err(Error::from) }
        })
        .await
    }

    /// Run anonymous Apex. The debug log is returned next to the result.
    #[instrument(skip(self, script), fields(bytes = script.len()))]
    pub async fn execute_anonymous(&self, script: &str) -> Result<AnonymousExecution> {
        self.execute(Protocol::Soap, "executeAnonymous", |session| {
            let client = self.metadata(&session);
            async move { client.execute_anonymous(script).await.map_err(Error::from) }
        })
        .await
    }
}
