//! HTTP API: routes, handlers and the shared response envelope.

pub mod common;
pub mod transaction;

use crate::api::common::ApiResponse;
use crate::middleware::{auth::require_auth, rate_limit::rate_limit};
use crate::server::AppState;
use axum::{Json, Router, middleware, routing::get};

async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::ok("ok"))
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/transactions/resume",
            get(transaction::handlers::get_resume),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}
