// ── HTTP console backend ──
//
// Talks to a running cpgate proxy the way a browser would: a cookie jar
// keeps the session cookies set by `/login` and replays them on every
// later call.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use cpgate_core::{ConsoleBackend, CreateReply, Gateway, LoginReply, RemoteError};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// `base_url` may carry a path prefix such as `/api/checkpoint`.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    fn url(&self, route: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(route)
            .map_err(|e| RemoteError::new(None, format!("invalid proxy URL: {e}")))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let resp = request
            .send()
            .await
            .map_err(|e| RemoteError::new(None, format!("proxy unreachable: {e}")))?;
        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::new(Some(status.as_u16()), format!("invalid reply: {e}")))?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| status.to_string(), str::to_owned);
            return Err(RemoteError::new(Some(status.as_u16()), message));
        }

        T::deserialize(&body)
            .map_err(|e| RemoteError::new(Some(status.as_u16()), format!("invalid reply: {e}")))
    }
}

impl ConsoleBackend for HttpBackend {
    async fn login(&self, api_key: &SecretString, domain: &str) -> Result<LoginReply, RemoteError> {
        let url = self.url("login")?;
        debug!(%url, domain, "console login");
        let body = json!({ "apiKey": api_key.expose_secret(), "domain": domain });
        self.send(self.http.post(url).json(&body)).await
    }

    async fn list_gateways(&self) -> Result<Value, RemoteError> {
        let url = self.url("gateways")?;
        debug!(%url, "console list");
        self.send(self.http.get(url)).await
    }

    async fn create_gateway(&self, gateway: &Gateway) -> Result<CreateReply, RemoteError> {
        let url = self.url("create-gateway")?;
        debug!(%url, name = %gateway.name, "console create");
        self.send(self.http.post(url).json(gateway)).await
    }
}
