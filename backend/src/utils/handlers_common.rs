//! Helpers shared by the API handlers.

use crate::api::common::service_error_to_http;
use crate::errors::{LightningError, ServiceError};
use crate::services::node_manager::{LightningClient, NodeRegistry};
use crate::utils::jwt::Claims;
use axum::http::StatusCode;
use std::sync::Arc;

/// Looks up the node a request's claims grant access to.
pub fn resolve_node(
    registry: &NodeRegistry,
    claims: &Claims,
) -> Result<Arc<dyn LightningClient>, (StatusCode, String)> {
    registry.get(&claims.node_id).ok_or_else(|| {
        tracing::warn!("No node registered for id {} (user {})", claims.node_id, claims.sub);
        service_error_to_http(ServiceError::NotFound {
            entity: "Node".to_string(),
            identifier: claims.node_id.clone(),
        })
    })
}

/// Logs a node failure and converts it into an HTTP error response.
pub fn handle_node_error(error: LightningError, context: &str) -> (StatusCode, String) {
    tracing::error!("Failed to {}: {}", context, error);
    service_error_to_http(error.into())
}
