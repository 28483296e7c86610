//! Credentials trait and the session produced by a login.

/// Anything that can authenticate a request against an org.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the access token (session id).
    fn access_token(&self) -> &str;

    /// Get the API version (e.g., "45.0").
    fn api_version(&self) -> &str;

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().is_empty() && !self.access_token().is_empty()
    }
}

/// An authenticated session.
///
/// Created by a successful login, never refreshed in place: when the server
/// rejects it, the holder discards it and logs in again. The session id is
/// redacted in Debug output.
#[derive(Clone)]
pub struct Session {
    profile: String,
    instance_url: String,
    session_id: String,
    api_version: String,
    user_id: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("profile", &self.profile)
            .field("instance_url", &self.instance_url)
            .field("session_id", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl Session {
    /// Build a session from its parts.
    pub fn new(
        profile: impl Into<String>,
        instance_url: impl Into<String>,
        session_id: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            profile: profile.into(),
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            session_id: session_id.into(),
            api_version: api_version.into(),
            user_id: None,
        }
    }

    /// Attach the user id reported by the login.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Name of the credential profile this session was created from.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Id of the logged-in user, when the login reported one.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl Credentials for Session {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.session_id
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}
