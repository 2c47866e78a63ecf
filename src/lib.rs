//! User registry is a small HTTP API storing user accounts and emails.
#![forbid(unsafe_code)]

mod database;
mod middleware;
mod router;

pub mod config;
pub mod error;
pub mod response;
pub mod telemetry;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::{Router, middleware as AxumMiddleware};
use error::ServerError;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

pub use database::Database;

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: axum::http::Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use axum::http::header;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read and deserialize a JSON response body.
#[cfg(test)]
pub async fn read_body<T: serde::de::DeserializeOwned>(
    response: axum::http::Response<axum::body::Body>,
) -> T {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub users: user::Users,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        );

    router::users::router()
        // Anything else answers `404`.
        .fallback(router::not_found)
        .with_state(state)
        // Broken JSON bodies are refused before routing.
        .layer(AxumMiddleware::from_fn(middleware::reject_malformed_json))
        .layer(middleware)
}

/// Connect to the database and build the application state.
pub async fn initialize_state(
    config: Arc<config::Configuration>,
) -> Result<(AppState, Database), Box<dyn std::error::Error>> {
    let db = Database::new(config.database_url()?, config.postgres.pool_size)
        .await?;

    // execute migrations scripts on start.
    db.migrate().await?;

    let users = user::Users::new(Arc::new(user::UserRepository::new(
        db.postgres.clone(),
    )));

    Ok((AppState { config, users }, db))
}
