//! Bearer token authentication.

use crate::api::common::service_error_to_http;
use crate::errors::ServiceError;
use crate::server::AppState;
use crate::utils::jwt::verify_token;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Validates the bearer JWT and exposes its claims to handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| {
            service_error_to_http(ServiceError::PermissionDenied {
                message: "Missing bearer token".to_string(),
            })
        })?;

    let claims = verify_token(token, &state.jwt_secret).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        service_error_to_http(ServiceError::PermissionDenied {
            message: "Invalid or expired token".to_string(),
        })
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
