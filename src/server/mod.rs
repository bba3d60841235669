//! Development authentication API.
//!
//! Serves the endpoints the web client consumes from an in-memory account
//! registry: registration, form login issuing bearer tokens, the current
//! account, and password changes. Error bodies follow the `{"detail": ...}`
//! shape the client's error formatter understands.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::Request,
    routing::{get, post},
    Json, Router,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Span};

pub mod handlers;
mod openapi;
pub mod state;

pub use openapi::{openapi, ApiDoc};
pub use state::{ApiState, DEFAULT_TOKEN_TTL};

/// Builds the API router around `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health).options(handlers::health))
        .route("/openapi.json", get(openapi_json))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/users/me/", get(handlers::me))
        .route(
            "/api/users/me/password",
            post(handlers::change_password),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive())
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to bind the port or serve
pub async fn new(port: u16, token_ttl: Duration) -> Result<()> {
    let listener = TcpListener::bind(format!("[::]:{port}")).await?;

    info!("Listening on [::]:{}, token ttl {:?}", port, token_ttl);

    serve(listener, Arc::new(ApiState::new(token_ttl))).await
}

/// Serves the API on an already bound listener.
/// # Errors
/// Return error if the server fails
pub async fn serve(listener: TcpListener, state: Arc<ApiState>) -> Result<()> {
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Gracefully shutdown");
            }
        })
        .await?;

    Ok(())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}

fn make_span(request: &Request<Body>) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
    )
}
