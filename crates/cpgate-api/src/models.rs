// Wire types for the Management Web API commands this crate speaks.
//
// Only the fields the console needs are typed. Command bodies skip absent
// optionals so the server never sees explicit nulls.

use serde::{Deserialize, Serialize};

/// Body of `POST /web_api/login` with API-key authentication.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    #[serde(rename = "api-key")]
    pub api_key: &'a str,
    pub domain: &'a str,
}

/// Successful login reply. Only `sid` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub sid: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "session-timeout", default)]
    pub session_timeout: Option<u64>,
    #[serde(rename = "api-server-version", default)]
    pub api_server_version: Option<String>,
    #[serde(rename = "read-only", default)]
    pub read_only: Option<bool>,
}

/// Body of `POST /web_api/show-gateways-and-servers`.
#[derive(Debug, Clone, Serialize)]
pub struct ShowGatewaysRequest {
    pub details_level: String,
    pub domain: String,
}

impl ShowGatewaysRequest {
    /// Full-detail listing for a domain.
    pub fn full(domain: impl Into<String>) -> Self {
        Self {
            details_level: "full".into(),
            domain: domain.into(),
        }
    }
}

/// Body of `POST /web_api/add-simple-gateway`.
///
/// Further optional vendor fields slot in here as additional
/// `skip_serializing_if` members.
#[derive(Debug, Clone, Serialize)]
pub struct AddSimpleGatewayRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub domain: String,
}

/// Reply to an object-creating command.
#[derive(Debug, Clone, Deserialize)]
pub struct AddedObject {
    pub uid: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /web_api/publish`.
#[derive(Debug, Serialize)]
pub(crate) struct PublishRequest<'a> {
    pub domain: &'a str,
}

/// Reply to `publish`. The server returns the id of the commit task.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishResponse {
    #[serde(rename = "task-id", default)]
    pub task_id: Option<String>,
}

/// Error body shape: `{"code": "...", "message": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn add_gateway_omits_absent_fields() {
        let req = AddSimpleGatewayRequest {
            name: "fw1_copy".into(),
            ipv4_address: Some("1.2.3.4".into()),
            ipv6_address: None,
            comments: None,
            domain: "SMC User".into(),
        };
        let value = serde_json::to_value(&req).unwrap_or_default();
        assert_eq!(
            value,
            json!({ "name": "fw1_copy", "ipv4_address": "1.2.3.4", "domain": "SMC User" })
        );
    }

    #[test]
    fn login_request_uses_hyphenated_key() {
        let req = LoginRequest {
            api_key: "k",
            domain: "d",
        };
        let value = serde_json::to_value(&req).unwrap_or_default();
        assert_eq!(value, json!({ "api-key": "k", "domain": "d" }));
    }

    #[test]
    fn login_response_tolerates_missing_extras() {
        let resp: Result<LoginResponse, _> = serde_json::from_value(json!({ "sid": "abc" }));
        match resp {
            Ok(r) => {
                assert_eq!(r.sid, "abc");
                assert!(r.session_timeout.is_none());
            }
            Err(e) => panic!("login response should parse: {e}"),
        }
    }
}
