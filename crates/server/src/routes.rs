use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{extract, health, import_draft};
use crate::{AppState, Config};

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/extract", post(extract))
        .route("/drafts/import", post(import_draft))
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(match &config.cors_origin {
        Some(origin) => cors.allow_origin(origin.parse::<HeaderValue>()?),
        None => cors.allow_origin(Any),
    })
}

/// Builds the application router with its middleware stack.
pub fn app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(config)?)
        .layer(TimeoutLayer::new(config.request_timeout()));

    Ok(Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(middleware)
        .with_state(state))
}
