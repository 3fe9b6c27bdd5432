//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness and database check
//! - [`users`] - registration, profiles, subscriptions
//! - [`tags`] - tag reference data
//! - [`ingredients`] - ingredient reference data and search
//! - [`recipes`] - recipes, favorites, shopping cart
//!
//! Every route runs behind [`authenticate`](crate::auth::authenticate), so
//! handlers see the acting user through the `CurrentUser` extractors.

pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::authenticate;
use crate::core::ServerState;

/// HTTP access log
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(users::router())
        .merge(tags::router())
        .merge(ingredients::router())
        .merge(recipes::router())
}

/// Requests running longer than `timeout_ms` are answered with 408
fn timeout_layer(timeout_ms: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_millis(timeout_ms),
    )
}

/// The complete application: routes, authentication and tower-http layers
pub fn app(state: ServerState) -> Router {
    let timeout = timeout_layer(state.config.request_timeout_ms);

    build_app()
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
        .layer(timeout)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
