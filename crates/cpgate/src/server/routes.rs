//! Handlers for the three proxy endpoints and the health probe.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};
use tracing::debug;

use cpgate_core::{CreateReply, Gateway, LoginReply, LoginRequest, ProxyService};

use super::error::ErrorResponse;
use super::session::{SessionCookies, with_session};

/// `GET /health`: liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// `POST /login`: open a management session and hand it back as cookies.
pub async fn login(
    State(proxy): State<ProxyService>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginReply>), ErrorResponse> {
    let Json(request) = body?;
    let session = proxy.login(&request).await?;

    let reply = LoginReply {
        message: "Authentication successful".into(),
        sid: session.sid().expose().to_owned(),
        domain: session.domain().to_owned(),
    };
    Ok((with_session(jar, &session), Json(reply)))
}

/// `GET /gateways`: the management server's listing, verbatim.
pub async fn list_gateways(
    State(proxy): State<ProxyService>,
    SessionCookies(session): SessionCookies,
) -> Result<Json<Value>, ErrorResponse> {
    let body = proxy.list_gateways(&session).await?;
    Ok(Json(body))
}

/// `POST /create-gateway`: create and publish.
///
/// Answers 200 when published and 202 when the object was created but the
/// publish failed.
pub async fn create_gateway(
    State(proxy): State<ProxyService>,
    SessionCookies(session): SessionCookies,
    body: Result<Json<Gateway>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateReply>), ErrorResponse> {
    let Json(gateway) = body?;
    let outcome = proxy.create_gateway(&session, &gateway).await?;

    let status = if outcome.is_published() {
        StatusCode::OK
    } else {
        StatusCode::ACCEPTED
    };
    debug!(uid = %outcome.uid, %status, "create-gateway answered");
    Ok((status, Json(outcome.to_reply())))
}
