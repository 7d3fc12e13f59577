//! The local proxy server.
//!
//! Exposes login, list, and create under both `/` and `/api/checkpoint`,
//! plus `/health`. Every error body is `{ "message": ... }`.

pub mod error;
pub mod routes;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use cpgate_core::ProxyService;

/// Prefix the original browser console used for the proxy routes.
pub const API_PREFIX: &str = "/api/checkpoint";

/// Build the application router around a shared proxy service.
pub fn router(proxy: ProxyService) -> Router {
    let api = Router::new()
        .route("/login", post(routes::login))
        .route("/gateways", get(routes::list_gateways))
        .route("/create-gateway", post(routes::create_gateway));

    Router::new()
        .merge(api.clone())
        .nest(API_PREFIX, api)
        .route("/health", get(routes::health))
        .with_state(proxy)
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, proxy: ProxyService) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "cpgate proxy listening");
    }
    axum::serve(listener, router(proxy))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
