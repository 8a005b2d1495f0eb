//! Cartwright — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use cartwright_core::error::CartError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `CartError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub CartError);

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            CartError::CartNotFound(_) => (StatusCode::NOT_FOUND, "cart_not_found"),
            CartError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "product_not_found"),
            CartError::LineItemNotFound { .. } => (StatusCode::NOT_FOUND, "line_item_not_found"),
            CartError::ProductAlreadyInCart { .. } => {
                (StatusCode::CONFLICT, "product_already_in_cart")
            }
            CartError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            CartError::ConcurrencyConflict { .. } => {
                (StatusCode::CONFLICT, "concurrency_conflict")
            }
            CartError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    fn status_of(err: CartError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_cart_not_found_maps_to_404() {
        assert_eq!(
            status_of(CartError::CartNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_product_not_found_maps_to_404() {
        assert_eq!(
            status_of(CartError::ProductNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_line_item_not_found_maps_to_404() {
        assert_eq!(
            status_of(CartError::LineItemNotFound {
                cart_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_product_already_in_cart_maps_to_409() {
        assert_eq!(
            status_of(CartError::ProductAlreadyInCart {
                cart_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(CartError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_concurrency_conflict_maps_to_409() {
        assert_eq!(
            status_of(CartError::ConcurrencyConflict {
                cart_id: Uuid::new_v4(),
                expected: 1,
                actual: 2,
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_storage_maps_to_500() {
        assert_eq!(
            status_of(CartError::Storage("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
