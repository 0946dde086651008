use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

/// Shown for every placement failure. The internal reason is only logged.
pub const PLACE_ORDER_FAILED: &str = "Could not place order. Please review quantities and try again.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(String),

    #[error("Cart limit reached")]
    CartFull,

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::EmptyCart | AppError::InsufficientStock(_) => {
                (StatusCode::CONFLICT, PLACE_ORDER_FAILED.to_string())
            }
            AppError::CartFull => (StatusCode::CONFLICT, self.to_string()),
            AppError::OrmError(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData { error: message }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_failures_hide_the_reason() {
        let (status, message) =
            AppError::InsufficientStock("gbc-001".into()).status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, PLACE_ORDER_FAILED);
        assert!(!message.contains("gbc-001"));

        let (status, message) = AppError::EmptyCart.status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, PLACE_ORDER_FAILED);
    }

    #[test]
    fn storage_errors_are_generic() {
        let err = AppError::OrmError(sea_orm::DbErr::Custom("relation \"orders\" missing".into()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal Server Error");
    }
}
