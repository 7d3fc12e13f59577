// ── Proxy service ──
//
// Login, list, and create relayed to the management server with an
// explicit `Session`. Every failure leaves as a `ProxyError`. Listing is
// single-flight per session; creating is create-then-publish, reported as
// one outcome.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use cpgate_api::{AddSimpleGatewayRequest, ManagementClient, SessionId};

use crate::error::{Operation, ProxyError};
use crate::model::Gateway;
use crate::session::Session;

// ── Request / reply shapes of the local endpoints ────────────────────

/// Body of `POST /login`. Both fields are optional so that a missing one
/// is a validation error rather than a decode failure.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("domain", &self.domain)
            .finish()
    }
}

/// Reply to a successful `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginReply {
    pub message: String,
    pub sid: String,
    pub domain: String,
}

/// Reply to `POST /create-gateway`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReply {
    pub message: String,
    pub uid: String,
    #[serde(default = "published_default")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_error: Option<String>,
}

fn published_default() -> bool {
    true
}

// ── Create outcome ───────────────────────────────────────────────────

/// Whether the staged object was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Published { task_id: Option<String> },
    /// Created and staged, but the publish call failed.
    NotPublished { status: u16, message: String },
}

/// Result of the create-then-publish sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub uid: String,
    pub name: String,
    pub publish: PublishStatus,
}

impl CreateOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self.publish, PublishStatus::Published { .. })
    }

    /// The reply body for the local endpoint.
    pub fn to_reply(&self) -> CreateReply {
        match &self.publish {
            PublishStatus::Published { .. } => CreateReply {
                message: "Gateway created successfully".into(),
                uid: self.uid.clone(),
                published: true,
                publish_error: None,
            },
            PublishStatus::NotPublished { message, .. } => CreateReply {
                message: "Gateway created but changes were not published".into(),
                uid: self.uid.clone(),
                published: false,
                publish_error: Some(message.clone()),
            },
        }
    }
}

// ── Service ──────────────────────────────────────────────────────────

type Listing = Shared<BoxFuture<'static, Result<Value, ProxyError>>>;

/// One in-flight listing per (sid, domain).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FlightKey {
    sid: String,
    domain: String,
}

impl FlightKey {
    fn of(session: &Session) -> Self {
        Self {
            sid: session.sid().expose().to_owned(),
            domain: session.domain().to_owned(),
        }
    }
}

/// The proxy layer. Cheaply cloneable; share one per server.
#[derive(Clone)]
pub struct ProxyService {
    inner: Arc<ProxyInner>,
}

struct ProxyInner {
    client: ManagementClient,
    listings: DashMap<FlightKey, Listing>,
}

impl ProxyService {
    pub fn new(client: ManagementClient) -> Self {
        Self {
            inner: Arc::new(ProxyInner {
                client,
                listings: DashMap::new(),
            }),
        }
    }

    /// Open a management session.
    ///
    /// Missing inputs fail before any network traffic. Vendor rejections keep
    /// their status and message.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ProxyError> {
        let api_key = request
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProxyError::required("apiKey", "API key is required"))?;
        let domain = request
            .domain
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ProxyError::required("domain", "Domain is required"))?;

        let api_key = SecretString::from(api_key.to_owned());
        let resp = self
            .inner
            .client
            .login(&api_key, domain)
            .await
            .map_err(|e| ProxyError::from_api(e, Operation::Login))?;

        Ok(Session::new(SessionId::new(resp.sid), domain))
    }

    /// List gateways and servers at full detail; the vendor body verbatim.
    ///
    /// Concurrent calls for the same session share one vendor request.
    pub async fn list_gateways(&self, session: &Session) -> Result<Value, ProxyError> {
        let key = FlightKey::of(session);
        let listing = match self.inner.listings.entry(key.clone()) {
            Entry::Occupied(entry) => {
                debug!(domain = session.domain(), "joining in-flight gateway listing");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let client = self.inner.client.clone();
                let session = session.clone();
                let listing = async move {
                    client
                        .show_gateways_and_servers(session.sid(), session.domain())
                        .await
                        .map_err(|e| ProxyError::from_api(e, Operation::ListGateways))
                }
                .boxed()
                .shared();
                entry.insert(listing.clone());
                listing
            }
        };

        let result = listing.clone().await;
        self.inner
            .listings
            .remove_if(&key, |_, current| current.ptr_eq(&listing));
        result
    }

    /// Create a gateway from `gateway` and publish it.
    ///
    /// A publish failure does not undo the create: the outcome reports the
    /// new uid with [`PublishStatus::NotPublished`]. Either way, the next
    /// listing for this session goes to the vendor afresh.
    pub async fn create_gateway(
        &self,
        session: &Session,
        gateway: &Gateway,
    ) -> Result<CreateOutcome, ProxyError> {
        let name = gateway.name.trim();
        if name.is_empty() {
            return Err(ProxyError::required("name", "Gateway name is required"));
        }

        let request = AddSimpleGatewayRequest {
            name: name.to_owned(),
            ipv4_address: non_empty(gateway.ipv4_address.as_deref()),
            ipv6_address: non_empty(gateway.ipv6_address.as_deref()),
            comments: non_empty(gateway.comments.as_deref()),
            domain: session.domain().to_owned(),
        };

        let added = self
            .inner
            .client
            .add_simple_gateway(session.sid(), &request)
            .await
            .map_err(|e| ProxyError::from_api(e, Operation::CreateGateway))?;

        let publish = match self
            .inner
            .client
            .publish(session.sid(), session.domain())
            .await
        {
            Ok(resp) => PublishStatus::Published {
                task_id: resp.task_id,
            },
            Err(e) => {
                let err = ProxyError::from_api(e, Operation::Publish);
                warn!(uid = %added.uid, error = %err, "gateway created but publish failed");
                PublishStatus::NotPublished {
                    status: err.status(),
                    message: err.message(),
                }
            }
        };

        // A listing still in flight predates the new object; later
        // listings must not join it.
        self.inner.listings.remove(&FlightKey::of(session));

        info!(uid = %added.uid, name, published = matches!(publish, PublishStatus::Published { .. }), "gateway created");
        Ok(CreateOutcome {
            uid: added.uid,
            name: request.name,
            publish,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_debug_hides_key() {
        let req = LoginRequest {
            api_key: Some("top-secret".into()),
            domain: Some("Global".into()),
        };
        let rendered = format!("{req:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("Global"));
    }

    #[test]
    fn unpublished_outcome_reply() {
        let outcome = CreateOutcome {
            uid: "g2".into(),
            name: "fw1_copy".into(),
            publish: PublishStatus::NotPublished {
                status: 409,
                message: "locked by another session".into(),
            },
        };
        assert!(!outcome.is_published());
        let reply = outcome.to_reply();
        assert!(!reply.published);
        assert_eq!(reply.uid, "g2");
        assert_eq!(reply.publish_error.as_deref(), Some("locked by another session"));
    }

    #[test]
    fn create_reply_defaults_to_published() {
        let reply: Result<CreateReply, _> =
            serde_json::from_str(r#"{"message":"Gateway created successfully","uid":"g2"}"#);
        assert_eq!(reply.map(|r| r.published).ok(), Some(true));
    }
}
