//! Connection configuration: API version and named credential profiles.
//!
//! The configuration is JSON, camelCase:
//!
//! ```json
//! {
//!   "apiVersion": 45,
//!   "credentials": {
//!     "dev": { "url": "https://login.salesforce.com", "username": "me@example.com", "password": "pw+token" }
//!   },
//!   "currentCredential": "dev"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: u32 = 45;

/// Login host used by [`ConnectionConfig::from_env`] when `SF_LOGIN_URL` is unset.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// One named set of login credentials.
///
/// The password is redacted in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialProfile {
    /// Login host, e.g. `https://test.salesforce.com`. A bare host name is
    /// treated as https.
    pub url: String,
    pub username: String,
    /// Password with the security token appended, if the org requires one.
    pub password: String,
}

impl std::fmt::Debug for CredentialProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProfile")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl CredentialProfile {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        for (field, value) in [
            ("url", &self.url),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!(
                    "credential profile '{name}' has an empty {field}"
                )));
            }
        }
        Ok(())
    }
}

/// Connection configuration.
///
/// Treated as immutable once loaded; switching profiles replaces the whole
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Integer API version, e.g. `45`. Accepts `45`, `45.0`, `"45"` or `"45.0"`.
    #[serde(
        default = "default_api_version",
        deserialize_with = "deserialize_api_version"
    )]
    pub api_version: u32,

    /// Credential profiles by name.
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialProfile>,

    /// Name of the profile used to log in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_credential: Option<String>,
}

fn default_api_version() -> u32 {
    DEFAULT_API_VERSION
}

fn deserialize_api_version<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Float(f64),
        Text(String),
    }

    let parsed = match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Some(v),
        Raw::Float(v) if v.fract() == 0.0 && v > 0.0 && v < f64::from(u32::MAX) => Some(v as u32),
        Raw::Float(_) => None,
        Raw::Text(s) => {
            let s = s.trim();
            s.strip_suffix(".0").unwrap_or(s).parse().ok()
        }
    };
    parsed.ok_or_else(|| serde::de::Error::custom("apiVersion must be a whole number such as 45"))
}

impl ConnectionConfig {
    /// A configuration with a single profile, selected.
    pub fn single(name: impl Into<String>, profile: CredentialProfile, api_version: u32) -> Self {
        let name = name.into();
        let mut credentials = BTreeMap::new();
        credentials.insert(name.clone(), profile);
        Self {
            api_version,
            credentials,
            current_credential: Some(name),
        }
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Build a single-profile configuration from environment variables.
    ///
    /// Required: `SF_USERNAME`, `SF_PASSWORD`.
    /// Optional: `SF_LOGIN_URL` (default production login), `SF_API_VERSION`.
    pub fn from_env() -> Result<Self> {
        let username = std::env::var("SF_USERNAME")
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_USERNAME".to_string())))?;
        let password = std::env::var("SF_PASSWORD")
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_PASSWORD".to_string())))?;
        let url = std::env::var("SF_LOGIN_URL").unwrap_or_else(|_| PRODUCTION_LOGIN_URL.to_string());
        let api_version = match std::env::var("SF_API_VERSION") {
            Ok(raw) => {
                let trimmed = raw.trim();
                trimmed
                    .strip_suffix(".0")
                    .unwrap_or(trimmed)
                    .parse()
                    .map_err(|_| Error::config(format!("SF_API_VERSION '{raw}' is not a version number")))?
            }
            Err(_) => DEFAULT_API_VERSION,
        };

        Ok(Self::single(
            "default",
            CredentialProfile::new(url, username, password),
            api_version,
        ))
    }

    /// The API version as sent on the wire, e.g. `"45.0"`.
    pub fn api_version_string(&self) -> String {
        format!("{}.0", self.api_version)
    }

    /// The selected profile and its name.
    ///
    /// Fails with a configuration error when no profile is selected, the
    /// selected name is unknown, or a required field is empty.
    pub fn selected_profile(&self) -> Result<(&str, &CredentialProfile)> {
        let name = self
            .current_credential
            .as_deref()
            .ok_or_else(|| Error::config("no credential profile selected (currentCredential)"))?;
        let profile = self
            .credentials
            .get(name)
            .ok_or_else(|| Error::config(format!("credential profile '{name}' does not exist")))?;
        profile.validate(name)?;
        Ok((name, profile))
    }

    /// Check the configuration without touching the network.
    pub fn validate(&self) -> Result<()> {
        if self.api_version == 0 {
            return Err(Error::config("apiVersion must be positive"));
        }
        self.selected_profile().map(|_| ())
    }

    /// Copy of this configuration with another profile selected.
    pub fn with_current(mut self, name: impl Into<String>) -> Self {
        self.current_credential = Some(name.into());
        self
    }
}
