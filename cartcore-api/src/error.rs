//! Mapping domain errors onto HTTP responses.
//!
//! Taxonomy: validation errors are 400, missing things are 404,
//! insufficient stock is a 409 conflict, authorization failures are 401/403,
//! and backend faults are 500. Every failure body is the same structured
//! envelope: `{"success": false, "message": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cartcore::errors::{
    CartError, CatalogError, CheckoutError, PaymentError, StoreError, ValidationError,
};
use serde::Serialize;

/// Wire envelope for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable description of the failure.
    pub message: String,
}

/// An HTTP-mapped failure.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    /// 403 with the given message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// 409 with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    /// 500 with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// The mapped status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::ProductNotFound(_) => Self::not_found(err.to_string()),
            CatalogError::InsufficientStock { .. } => Self::conflict(err.to_string()),
            CatalogError::Backend(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::EmptyCart | CheckoutError::Validation(_) => {
                Self::bad_request(err.to_string())
            }
            CheckoutError::ProductMissing { .. } => Self::not_found(err.to_string()),
            CheckoutError::InsufficientStock { .. } => Self::conflict(err.to_string()),
            CheckoutError::Catalog(_) | CheckoutError::Store(_) => Self::internal(err.to_string()),
        }
    }
}
