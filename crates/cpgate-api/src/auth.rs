// Management API authentication
//
// API-key login against `/web_api/login`. The server answers with a session
// id (`sid`) that authorizes every later command through the `X-chkp-sid`
// header. Session lifetime is enforced server-side only.

use std::fmt;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::client::ManagementClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse};

/// Header carrying the session id on authenticated commands.
pub const SID_HEADER: &str = "X-chkp-sid";

/// Vendor-issued session identifier.
///
/// Wraps the raw token as a secret so it never shows up in `Debug` output
/// or logs. The value is forwarded byte-for-byte; it is never rewritten.
#[derive(Clone)]
pub struct SessionId(SecretString);

impl SessionId {
    pub fn new(sid: impl Into<String>) -> Self {
        Self(SecretString::from(sid.into()))
    }

    /// The raw token, for cookies and headers.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Header value with the sensitive flag set.
    pub(crate) fn header_value(&self) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(self.expose())
            .map_err(|e| Error::InvalidSessionId(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId([REDACTED])")
    }
}

impl PartialEq for SessionId {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionId {}

impl ManagementClient {
    /// Open a session with an API key scoped to a management domain.
    ///
    /// No session header is sent. On success the caller owns the returned
    /// `sid`; this client keeps no session state of its own.
    pub async fn login(
        &self,
        api_key: &SecretString,
        domain: &str,
    ) -> Result<LoginResponse, Error> {
        debug!(domain, "logging in");

        let body = LoginRequest {
            api_key: api_key.expose_secret(),
            domain,
        };
        let resp: LoginResponse = self.post("login", &body, None).await?;

        info!(
            domain,
            api_version = resp.api_server_version.as_deref().unwrap_or("unknown"),
            "login successful"
        );
        Ok(resp)
    }
}
