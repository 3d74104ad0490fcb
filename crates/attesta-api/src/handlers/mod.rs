//! HTTP handlers and error mapping.

pub mod certificates;
pub mod issuers;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use attesta_core::Error;
use attesta_crypto::CryptoError;

use crate::services::ServiceError;

/// An HTTP-mappable error: status code plus a machine-readable error code
/// and a human-readable description.
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    description: String,
}

impl ApiError {
    pub fn bad_request(error: &'static str, description: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
            description: description.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "error": self.error,
                "error_description": self.description,
            })),
        )
            .into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            // Caller-supplied material was unusable.
            ServiceError::Crypto(
                CryptoError::InvalidKeyLength { .. }
                | CryptoError::UnsupportedKeyFormat(_)
                | CryptoError::MalformedBundle(_),
            ) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "invalid_input",
                description: err.to_string(),
            },
            // Well-formed request, but the key does not open the bundle or
            // the content fails authentication.
            ServiceError::Crypto(
                CryptoError::UnwrapFailure | CryptoError::AuthenticationFailure,
            ) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: "decryption_failed",
                description: err.to_string(),
            },
            ServiceError::Crypto(CryptoError::EncryptionFailure) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "encryption_failed",
                description: err.to_string(),
            },
            ServiceError::Backend(Error::NotFound(_)) => Self {
                status: StatusCode::NOT_FOUND,
                error: "not_found",
                description: err.to_string(),
            },
            ServiceError::Backend(Error::InvalidInput(_) | Error::Config(_)) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "invalid_input",
                description: err.to_string(),
            },
            // Object storage or ledger unreachable/misbehaving.
            ServiceError::Backend(Error::Store(_) | Error::Anchor(_)) => Self {
                status: StatusCode::BAD_GATEWAY,
                error: "backend_unavailable",
                description: err.to_string(),
            },
            ServiceError::Backend(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "internal_error",
                description: err.to_string(),
            },
        }
    }
}
