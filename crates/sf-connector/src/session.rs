//! Session state: the connection configuration and the active session.
//!
//! The session is the only mutable state shared between pipelines. Reads
//! take the read guard; a login happens under the write guard after a second
//! look, so concurrent callers share one login.

use std::sync::Arc;

use fast_sfdc_auth::{ConnectionConfig, Credentials, Session, SoapLogin};
use fast_sfdc_client::SfHttpClient;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::error::Result;

struct Slot {
    config: Arc<ConnectionConfig>,
    session: Option<Arc<Session>>,
}

/// Holds the configuration and lazily creates the session.
pub struct SessionState {
    login: SoapLogin,
    slot: RwLock<Slot>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState").finish_non_exhaustive()
    }
}

impl SessionState {
    /// No login happens until the first [`ensure_session`](Self::ensure_session).
    pub fn new(http: SfHttpClient, config: ConnectionConfig) -> Self {
        Self {
            login: SoapLogin::new(http),
            slot: RwLock::new(Slot {
                config: Arc::new(config),
                session: None,
            }),
        }
    }

    pub async fn config(&self) -> Arc<ConnectionConfig> {
        self.slot.read().await.config.clone()
    }

    /// The held session, if any. Never logs in.
    pub async fn current(&self) -> Option<Arc<Session>> {
        self.slot.read().await.session.clone()
    }

    /// Return the held session, logging in first when there is none.
    pub async fn ensure_session(&self) -> Result<Arc<Session>> {
        if let Some(session) = self.current().await {
            return Ok(session);
        }

        let mut slot = self.slot.write().await;
        if let Some(session) = &slot.session {
            return Ok(session.clone());
        }
        let session = Arc::new(self.login.login(&slot.config).await?);
        info!(profile = %session.profile(), instance_url = %session.instance_url(), "Session established");
        slot.session = Some(session.clone());
        Ok(session)
    }

    /// Log in now, replacing any held session.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<Arc<Session>> {
        let mut slot = self.slot.write().await;
        let session = Arc::new(self.login.login(&slot.config).await?);
        info!(profile = %session.profile(), "Connected");
        slot.session = Some(session.clone());
        Ok(session)
    }

    /// Drop `stale` if it is still the held session.
    ///
    /// Returns false when another caller already replaced it; the newer
    /// session is kept.
    pub async fn invalidate(&self, stale: &Arc<Session>) -> bool {
        let mut slot = self.slot.write().await;
        match &slot.session {
            Some(held) if Arc::ptr_eq(held, stale) => {
                slot.session = None;
                debug!("Session invalidated");
                true
            }
            _ => false,
        }
    }

    /// Drop the held session unconditionally.
    pub async fn reset(&self) {
        self.slot.write().await.session = None;
    }

    /// Replace the configuration and drop the session. The next request logs
    /// in with the new selection.
    pub async fn switch_profile(&self, config: ConnectionConfig) {
        let mut slot = self.slot.write().await;
        debug!(profile = ?config.current_credential, "Switching credential profile");
        slot.config = Arc::new(config);
        slot.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{config, http, mount_login};
    use fast_sfdc_auth::CredentialProfile;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lazy_login_and_reuse() {
        let server = MockServer::start().await;
        let logins = mount_login(&server).await;
        let state = SessionState::new(http(), config(&server.uri()));

        assert!(state.current().await.is_none());
        let first = state.ensure_session().await.unwrap();
        let second = state.ensure_session().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.access_token(), "SESSION-1");
        assert_eq!(first.instance_url(), server.uri());
        assert_eq!(logins.count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_only_drops_the_stale_session() {
        let server = MockServer::start().await;
        let logins = mount_login(&server).await;
        let state = SessionState::new(http(), config(&server.uri()));

        let stale = state.ensure_session().await.unwrap();
        assert!(state.invalidate(&stale).await);
        let fresh = state.ensure_session().await.unwrap();
        assert_eq!(fresh.access_token(), "SESSION-2");

        // A late pipeline still holding the first session must not drop the
        // second one.
        assert!(!state.invalidate(&stale).await);
        assert!(Arc::ptr_eq(&state.current().await.unwrap(), &fresh));
        assert_eq!(logins.count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/Soap/u/45.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(crate::test_support::login_body(&server.uri(), "SESSION-1"))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let state = Arc::new(SessionState::new(http(), config(&server.uri())));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move { state.ensure_session().await })
            })
            .collect();
        let mut sessions = Vec::new();
        for task in tasks {
            sessions.push(task.await.unwrap().unwrap());
        }

        assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
    }

    #[tokio::test]
    async fn test_switch_profile_defers_login() {
        let server = MockServer::start().await;
        let logins = mount_login(&server).await;
        let state = SessionState::new(http(), config(&server.uri()));
        state.ensure_session().await.unwrap();

        let mut other = config(&server.uri());
        other.credentials.insert(
            "qa".to_string(),
            CredentialProfile::new(server.uri(), "qa@example.com", "secret"),
        );
        state.switch_profile(other.with_current("qa")).await;

        assert!(state.current().await.is_none());
        assert_eq!(logins.count(), 1);
        assert_eq!(state.config().await.current_credential.as_deref(), Some("qa"));

        let session = state.ensure_session().await.unwrap();
        assert_eq!(session.profile(), "qa");
        assert_eq!(logins.count(), 2);
    }

    #[tokio::test]
    async fn test_connect_forces_login() {
        let server = MockServer::start().await;
        let logins = mount_login(&server).await;
        let state = SessionState::new(http(), config(&server.uri()));

        state.ensure_session().await.unwrap();
        let session = state.connect().await.unwrap();
        assert_eq!(session.access_token(), "SESSION-2");
        assert_eq!(logins.count(), 2);

        state.reset().await;
        assert!(state.current().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_profile_fails_before_network() {
        let server = MockServer::start().await;
        let logins = mount_login(&server).await;
        let state = SessionState::new(http(), config(&server.uri()).with_current("missing"));

        let err = state.ensure_session().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)), "{err:?}");
        assert_eq!(logins.count(), 0);
    }
}
