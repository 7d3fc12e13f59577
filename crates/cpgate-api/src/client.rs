// Management Web API HTTP client
//
// Wraps `reqwest::Client` with `/web_api/{command}` URL construction,
// session header injection, and vendor error extraction. Every command is
// a JSON POST; typed wrappers live below and in `auth.rs`.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::auth::{SID_HEADER, SessionId};
use crate::error::Error;
use crate::models::{
    AddSimpleGatewayRequest, AddedObject, ErrorBody, PublishRequest, PublishResponse,
    ShowGatewaysRequest,
};
use crate::transport::TransportConfig;

/// A successful command reply: the parsed body plus the HTTP status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Raw HTTP client for a single management server.
///
/// Holds no session state: the session id is an explicit argument on every
/// authenticated call, so one client can serve any number of sessions.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ManagementClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// The `base_url` is the server root including the port
    /// (e.g. `https://mgmt.example.net:443`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/web_api/{command}`
    pub(crate) fn command_url(&self, command: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/web_api/{command}");
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send one command and return the parsed body with its status.
    ///
    /// Non-2xx replies become [`Error::Api`] carrying the vendor's own
    /// `message`/`code` when the body has them; a non-JSON error body still
    /// yields the original status with no message.
    pub async fn request(
        &self,
        method: Method,
        command: &str,
        body: &(impl Serialize + Sync),
        session: Option<&SessionId>,
    ) -> Result<ApiResponse, Error> {
        let url = self.command_url(command)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url).json(body);
        if let Some(sid) = session {
            builder = builder.header(SID_HEADER, sid.header_value()?);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let err: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            debug!(status = status.as_u16(), code = ?err.code, "command rejected");
            return Err(Error::Api {
                status: status.as_u16(),
                code: err.code,
                message: err.message.filter(|m| !m.is_empty()),
            });
        }

        let body = serde_json::from_str(&text).map_err(|e| {
            let preview = text.chars().take(200).collect::<String>();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text.clone(),
            }
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// POST a command and deserialize the reply into `T`.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        command: &str,
        body: &(impl Serialize + Sync),
        session: Option<&SessionId>,
    ) -> Result<T, Error> {
        let resp = self.request(Method::POST, command, body, session).await?;
        T::deserialize(&resp.body).map_err(|e| Error::Deserialization {
            message: format!("unexpected `{command}` reply: {e}"),
            body: resp.body.to_string(),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `show-gateways-and-servers` at full detail.
    ///
    /// Returned untyped: the body (an `objects` array plus paging fields)
    /// is relayed to the console as-is.
    pub async fn show_gateways_and_servers(
        &self,
        session: &SessionId,
        domain: &str,
    ) -> Result<Value, Error> {
        let body = ShowGatewaysRequest::full(domain);
        let resp = self
            .request(Method::POST, "show-gateways-and-servers", &body, Some(session))
            .await?;
        Ok(resp.body)
    }

    /// `add-simple-gateway`. The object stays staged until published.
    pub async fn add_simple_gateway(
        &self,
        session: &SessionId,
        request: &AddSimpleGatewayRequest,
    ) -> Result<AddedObject, Error> {
        let added: AddedObject = self
            .post("add-simple-gateway", request, Some(session))
            .await?;
        info!(name = %request.name, uid = %added.uid, "gateway staged");
        Ok(added)
    }

    /// `publish`: commit the session's staged changes in `domain`.
    pub async fn publish(&self, session: &SessionId, domain: &str) -> Result<PublishResponse, Error> {
        let resp: PublishResponse = self
            .post("publish", &PublishRequest { domain }, Some(session))
            .await?;
        info!(domain, task_id = resp.task_id.as_deref().unwrap_or("-"), "publish accepted");
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Option<ManagementClient> {
        let url = Url::parse(base).ok()?;
        Some(ManagementClient::with_client(reqwest::Client::new(), url))
    }

    #[test]
    fn command_url_joins_web_api_prefix() {
        let Some(c) = client("https://mgmt.example.net:443/") else {
            panic!("base url should parse");
        };
        let url = c.command_url("publish").map(|u| u.to_string()).unwrap_or_default();
        assert_eq!(url, "https://mgmt.example.net/web_api/publish");
    }

    #[test]
    fn command_url_keeps_non_default_port() {
        let Some(c) = client("https://10.0.0.5:4434") else {
            panic!("base url should parse");
        };
        let url = c.command_url("login").map(|u| u.to_string()).unwrap_or_default();
        assert_eq!(url, "https://10.0.0.5:4434/web_api/login");
    }
}
