#![allow(clippy::unwrap_used)]
// Integration tests for `ManagementClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cpgate_api::{AddSimpleGatewayRequest, Error, ManagementClient, SessionId};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ManagementClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ManagementClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn sid() -> SessionId {
    SessionId::new("sid-123")
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/web_api/login"))
        .and(body_json(json!({ "api-key": "key-1", "domain": "Global" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sid": "sid-123",
            "uid": "c6b1f1f0",
            "session-timeout": 600,
            "api-server-version": "1.9"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = SecretString::from("key-1".to_string());
    let resp = client.login(&key, "Global").await.unwrap();

    assert_eq!(resp.sid, "sid-123");
    assert_eq!(resp.session_timeout, Some(600));
    assert_eq!(resp.api_server_version.as_deref(), Some("1.9"));
}

#[tokio::test]
async fn test_login_failure_keeps_vendor_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/web_api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "err_login_failed",
            "message": "Authentication to server failed."
        })))
        .mount(&server)
        .await;

    let key = SecretString::from("wrong".to_string());
    let result = client.login(&key, "Global").await;

    match result {
        Err(Error::Api {
            status,
            code,
            message,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(code.as_deref(), Some("err_login_failed"));
            assert_eq!(message.as_deref(), Some("Authentication to server failed."));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Gateway tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_show_gateways_sends_session_and_returns_body_verbatim() {
    let (server, client) = setup().await;

    let reply = json!({
        "objects": [
            { "uid": "g1", "name": "fw1", "type": "simple-gateway", "ipv4-address": "1.2.3.4" }
        ],
        "from": 1,
        "to": 1,
        "total": 1
    });

    Mock::given(method("POST"))
        .and(path("/web_api/show-gateways-and-servers"))
        .and(header("X-chkp-sid", "sid-123"))
        .and(body_json(json!({ "details_level": "full", "domain": "Global" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&reply))
        .expect(1)
        .mount(&server)
        .await;

    let body = client
        .show_gateways_and_servers(&sid(), "Global")
        .await
        .unwrap();

    assert_eq!(body, reply);
}

#[tokio::test]
async fn test_add_simple_gateway_posts_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/web_api/add-simple-gateway"))
        .and(header("X-chkp-sid", "sid-123"))
        .and(body_json(json!({
            "name": "fw1_copy",
            "ipv4_address": "1.2.3.5",
            "comments": "cloned",
            "domain": "Global"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "uid": "g2", "name": "fw1_copy" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = AddSimpleGatewayRequest {
        name: "fw1_copy".into(),
        ipv4_address: Some("1.2.3.5".into()),
        ipv6_address: None,
        comments: Some("cloned".into()),
        domain: "Global".into(),
    };
    let added = client.add_simple_gateway(&sid(), &request).await.unwrap();

    assert_eq!(added.uid, "g2");
}

#[tokio::test]
async fn test_publish_returns_task_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/web_api/publish"))
        .and(header("X-chkp-sid", "sid-123"))
        .and(body_json(json!({ "domain": "Global" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task-id": "t-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.publish(&sid(), "Global").await.unwrap();

    assert_eq!(resp.task_id.as_deref(), Some("t-1"));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_vendor_500_message_is_forwarded() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "bad cert" })))
        .mount(&server)
        .await;

    let err = client
        .show_gateways_and_servers(&sid(), "Global")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.vendor_message(), Some("bad cert"));
}

#[tokio::test]
async fn test_vendor_error_without_message_keeps_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "code": "x" })))
        .mount(&server)
        .await;

    let err = client
        .show_gateways_and_servers(&sid(), "Global")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.vendor_message(), None);
}

#[tokio::test]
async fn test_non_json_error_body_keeps_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client.publish(&sid(), "Global").await.unwrap_err();

    assert!(matches!(err, Error::Api { status: 502, message: None, .. }));
}

#[tokio::test]
async fn test_malformed_success_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/web_api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let key = SecretString::from("key-1".to_string());
    let err = client.login(&key, "Global").await.unwrap_err();

    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = ManagementClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
    );

    let err = client.publish(&sid(), "Global").await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert_eq!(err.status(), None);
}
