//! Service Error Taxonomy
//!
//! Every user-visible failure of the three service roles maps onto one
//! `ServiceError` variant, which knows how to render itself as an HTTP
//! response with a `{"error": "..."}` JSON body.
//!
//! Background propagation failures (cache invalidation, peer replication)
//! are absent here: they are logged and swallowed at the call
//! site and never reach the original caller.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The requested id is absent from the target store.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Purchase attempted on a book with no remaining stock.
    #[error("Book out of stock")]
    OutOfStock,

    #[error("{0}")]
    InvalidRequest(String),

    /// Generic server-side failure with a caller-facing message.
    #[error("{0}")]
    Internal(&'static str),

    /// A downstream service answered with a structured error response.
    /// Carried verbatim so a proxy can forward it unchanged.
    #[error("downstream responded with status {status}")]
    Downstream {
        status: u16,
        body: serde_json::Value,
    },

    /// Network-level failure on an inter-service call.
    #[error("downstream unreachable: {0}")]
    Unreachable(String),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::OutOfStock | ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Downstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ServiceError::Internal(_) | ServiceError::Unreachable(_) | ServiceError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ServiceError::NotFound(_) => true,
            ServiceError::Downstream { status, .. } => *status == 404,
            _ => false,
        }
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ServiceError::Downstream { body, .. } => (status, Json(body)).into_response(),
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ServiceError::NotFound("Book");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Book not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_out_of_stock_is_rejected_request() {
        let err = ServiceError::OutOfStock;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Book out of stock");
    }

    #[test]
    fn test_downstream_status_is_passed_through() {
        let err = ServiceError::Downstream {
            status: 404,
            body: json!({ "error": "Book not found" }),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.is_not_found());

        let err = ServiceError::Downstream {
            status: 400,
            body: json!({ "error": "Book out of stock" }),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_request_renders_json_body() {
        let response = ServiceError::InvalidRequest("Invalid replicated order".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Invalid replicated order" }));
    }

    #[test]
    fn test_unreachable_is_server_error() {
        let err = ServiceError::Unreachable("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
