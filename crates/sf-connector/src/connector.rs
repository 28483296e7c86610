//! The connector and its request dispatcher.

use std::future::Future;
use std::sync::Arc;

use fast_sfdc_auth::{ConnectionConfig, Credentials, Session};
use fast_sfdc_client::{ClientConfig, SfHttpClient};
use fast_sfdc_metadata::MetadataClient;
use fast_sfdc_tooling::ToolingClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::Result;
use crate::poll::PollSettings;
use crate::session::SessionState;

/// Wire protocol of a dispatched call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Rest,
    Soap,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Protocol::Rest => "REST",
            Protocol::Soap => "SOAP",
        })
    }
}

/// Authenticated access to one org.
///
/// Owns its session; several connectors can live in one process. Every
/// remote call goes through [`execute`](Self::execute).
///
/// ```rust,ignore
/// use fast_sfdc_connector::{Connector, ConnectionConfig};
///
/// let connector = Connector::new(ConnectionConfig::from_file(".vscode/fastsfdc.json")?)?;
/// let id = connector.create_metadata_container("fsf-scratch").await?;
/// ```
#[derive(Debug)]
pub struct Connector {
    http: SfHttpClient,
    session: SessionState,
    poll: PollSettings,
    shutdown: CancellationToken,
}

impl Connector {
    /// A connector with the default transport settings.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        Self::with_client_config(config, ClientConfig::default())
    }

    /// A connector with custom transport settings. The login and every API
    /// call share one connection pool.
    pub fn with_client_config(config: ConnectionConfig, client_config: ClientConfig) -> Result<Self> {
        let http = SfHttpClient::new(client_config)?;
        Ok(Self {
            session: SessionState::new(http.clone(), config),
            http,
            poll: PollSettings::default(),
            shutdown: CancellationToken::new(),
        })
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn poll_settings(&self) -> &PollSettings {
        &self.poll
    }

    pub fn session_state(&self) -> &SessionState {
        &self.session
    }

    /// Log in now with the selected profile.
    pub async fn connect(&self) -> Result<Arc<Session>> {
        self.session.connect().await
    }

    /// Replace the configuration; the next call logs in with it.
    pub async fn switch_profile(&self, config: ConnectionConfig) {
        self.session.switch_profile(config).await
    }

    /// A token cancelled when [`shutdown`](Self::shutdown) is called.
    pub fn child_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Cancel every poll started from this connector.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Run `call` with a live session.
    ///
    /// An unreachable host fails at once. A rejected session is dropped, a
    /// new one is created, and `call` runs exactly once more; whatever that
    /// second attempt returns is the result.
    pub async fn execute<T, F, Fut>(&self, protocol: Protocol, operation: &str, call: F) -> Result<T>
    where
        F: Fn(Arc<Session>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = self.session.ensure_session().await?;
        match call(session.clone()).await {
            Err(err) if err.is_unreachable() => {
                warn!(%protocol, operation, error = %err, "Host unreachable");
                Err(err)
            }
            Err(err) if err.is_unauthorized() => {
                info!(%protocol, operation, "Session rejected; logging in again");
                self.session.invalidate(&session).await;
                let fresh = self.session.ensure_session().await?;
                call(fresh).await
            }
            result => result,
        }
    }

    pub(crate) fn tooling(&self, session: &Session) -> ToolingClient {
        ToolingClient::from_http(
            self.http.clone(),
            session.instance_url(),
            session.access_token(),
            session.api_version(),
        )
    }

    pub(crate) fn metadata(&self, session: &Session) -> MetadataClient {
        MetadataClient::from_http(
            self.http.clone(),
            session.instance_url(),
            session.access_token(),
            session.api_version(),
        )
    }
}
