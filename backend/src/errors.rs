//! Error types shared across the node adapters, services and API layer.

use thiserror::Error;

/// Errors reported by a Lightning node adapter.
#[derive(Debug, Error)]
pub enum LightningError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid continuation token: {0}")]
    InvalidToken(String),

    #[error("Node lookup failed for {0}")]
    NodeLookup(String),
}

impl From<tonic::Status> for LightningError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Unavailable | tonic::Code::DeadlineExceeded => {
                LightningError::NetworkError(status.message().to_string())
            }
            _ => LightningError::RpcError(status.message().to_string()),
        }
    }
}

/// Service-layer errors surfaced through the HTTP API.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("{entity} '{identifier}' not found")]
    NotFound { entity: String, identifier: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Too many requests")]
    RateLimited,

    #[error("External service error: {message}")]
    ExternalService { message: String },
}

impl From<LightningError> for ServiceError {
    fn from(error: LightningError) -> Self {
        match error {
            LightningError::InvalidToken(message) => ServiceError::Validation { message },
            other => ServiceError::ExternalService {
                message: other.to_string(),
            },
        }
    }
}

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
