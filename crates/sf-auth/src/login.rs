//! Username/password login through the partner SOAP API.
//!
//! `POST {host}/services/Soap/u/{NN.0}` with a `login` envelope. The
//! response carries the session id and a `serverUrl` whose origin is the
//! instance URL every later call goes to.

use fast_sfdc_client::security::xml::escape;
use fast_sfdc_client::{xml, SfHttpClient};
use tracing::{debug, instrument, warn};

use crate::config::ConnectionConfig;
use crate::credentials::{Credentials, Session};
use crate::error::{Error, ErrorKind, Result};

/// Performs the login exchange over a shared transport.
#[derive(Debug, Clone)]
pub struct SoapLogin {
    http: SfHttpClient,
}

impl SoapLogin {
    pub fn new(http: SfHttpClient) -> Self {
        Self { http }
    }

    /// Log in with the selected profile of `config`.
    ///
    /// Configuration problems are reported before any request is sent.
    #[instrument(skip(self, config), fields(profile = tracing::field::Empty))]
    pub async fn login(&self, config: &ConnectionConfig) -> Result<Session> {
        config.validate()?;
        let (name, profile) = config.selected_profile()?;
        tracing::Span::current().record("profile", name);

        let api_version = config.api_version_string();
        let url = login_url(&profile.url, &api_version)?;
        let request = self
            .http
            .post(url)
            .xml(login_envelope(&profile.username, &profile.password))
            .soap_action("login");

        let response = self.http.execute_raw(&request).await.map_err(|err| {
            if err.is_unreachable() {
                warn!(host = %profile.url, "Login host unreachable");
            }
            Error::from(err)
        })?;
        let status = response.status();
        let body = response.text().await?;

        if let Some(fault) = xml::soap_fault(&body) {
            return Err(Error::new(ErrorKind::LoginRejected {
                code: fault.code().to_string(),
                message: fast_sfdc_client::sanitize_error_message(&fault.fault_string),
            }));
        }
        if !(200..300).contains(&status) {
            return Err(Error::new(ErrorKind::Http(format!(
                "login returned HTTP {status}"
            ))));
        }

        let session = parse_login_response(name, &api_version, &body)?;
        debug!(instance_url = %session.instance_url(), "Logged in");
        Ok(session)
    }
}

/// `{host}/services/Soap/u/{version}`, defaulting a bare host to https.
pub fn login_url(host: &str, api_version: &str) -> Result<String> {
    let host = host.trim().trim_end_matches('/');
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    let parsed = url::Url::parse(&with_scheme)
        .map_err(|e| Error::with_source(ErrorKind::Config(format!("invalid login url '{host}'")), e))?;
    if parsed.host_str().is_none() {
        return Err(Error::config(format!("login url '{host}' has no host")));
    }
    Ok(format!(
        "{}/services/Soap/u/{}",
        with_scheme.trim_end_matches('/'),
        api_version
    ))
}

/// The partner `login` envelope.
pub fn login_envelope(username: &str, password: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xmlns:env="http://schemas.xmlsoap.org/soap/envelope/">
  <env:Body>
    <n1:login xmlns:n1="urn:partner.soap.sforce.com">
      <n1:username>{}</n1:username>
      <n1:password>{}</n1:password>
    </n1:login>
  </env:Body>
</env:Envelope>"#,
        escape(username),
        escape(password)
    )
}

/// Build a [`Session`] from a `loginResponse` document.
pub fn parse_login_response(profile: &str, api_version: &str, body: &str) -> Result<Session> {
    let result = xml::element(body, "result")
        .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing result".to_string())))?;
    let session_id = xml::text(result, "sessionId")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing sessionId".to_string())))?;
    let server_url = xml::text(result, "serverUrl")
        .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing serverUrl".to_string())))?;

    let instance_url = instance_url_from_server_url(&server_url)?;
    let mut session = Session::new(profile, instance_url, session_id, api_version);
    if let Some(user_id) = xml::text(result, "userId") {
        session = session.with_user_id(user_id);
    }
    Ok(session)
}

/// Scheme, host and port of the SOAP `serverUrl`.
pub fn instance_url_from_server_url(server_url: &str) -> Result<String> {
    let parsed = url::Url::parse(server_url.trim()).map_err(|e| {
        Error::with_source(
            ErrorKind::InvalidResponse(format!("serverUrl is not a URL: {server_url}")),
            e,
        )
    })?;
    if parsed.host_str().is_none() {
        return Err(Error::new(ErrorKind::InvalidResponse(format!(
            "serverUrl has no host: {server_url}"
        ))));
    }
    Ok(parsed.origin().ascii_serialization())
}
