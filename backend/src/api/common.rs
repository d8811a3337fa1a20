//! Response envelope and error conversion shared by all endpoints.
//!
//! Every response is wrapped in [`ApiResponse`]:
//! - `success`: whether the request succeeded
//! - `data`: payload on success
//! - `message`: human-readable message
//! - `error`: machine-readable `error_type` plus optional field details
//! - `timestamp`: RFC 3339 time the response was produced
//!
//! # Error Handling Flow
//! 1. Services return [`LightningError`](crate::errors::LightningError) or `ServiceError`
//! 2. `service_error_to_http` converts to the status code and JSON body
//! 3. Validation errors are formatted with per-field details

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Request timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful response with default message
    pub fn ok(data: T) -> Self {
        Self::success(data, "Request successful")
    }

    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        details: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn error_body(response: &ApiResponse<()>) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| {
        format!(r#"{{"success":false,"message":"{}"}}"#, response.message.escape_default())
    })
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, error_type, message) = match error {
        ServiceError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
        ),
        ServiceError::PermissionDenied { message } => {
            (StatusCode::UNAUTHORIZED, "permission_denied", message)
        }
        ServiceError::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "Too many requests, please try again later".to_string(),
        ),
        ServiceError::ExternalService { message } => {
            (StatusCode::BAD_GATEWAY, "external_service_error", message)
        }
    };

    let error_response = ApiResponse::<()>::error(message, error_type, None);
    (status, error_body(&error_response))
}

/// Formats validator::ValidationErrors into field-specific error details
pub fn validation_errors_to_field_errors(errors: validator::ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
            })
        })
        .collect()
}

/// Helper to create validation error response
pub fn validation_error_response(errors: validator::ValidationErrors) -> (StatusCode, String) {
    let field_errors = validation_errors_to_field_errors(errors);
    let error_response =
        ApiResponse::<()>::error("Validation failed", "validation_error", Some(field_errors));
    (StatusCode::BAD_REQUEST, error_body(&error_response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_become_bad_gateway() {
        let (status, body) = service_error_to_http(ServiceError::ExternalService {
            message: "node unreachable".into(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let parsed: ApiResponse<()> = serde_json::from_str(&body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message, "node unreachable");
        assert_eq!(parsed.error.unwrap().error_type, "external_service_error");
    }

    #[test]
    fn not_found_names_the_entity() {
        let (status, body) = service_error_to_http(ServiceError::NotFound {
            entity: "Node".into(),
            identifier: "alpha".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Node 'alpha' not found"));
    }

    #[test]
    fn success_omits_error() {
        let body = serde_json::to_value(ApiResponse::ok(5)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 5);
        assert!(body.get("error").is_none());
    }
}
