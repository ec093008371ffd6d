use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::checkout::CheckoutError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Payment setup unavailable: {0}")]
    PaymentSetup(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::OrderRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PaymentSetup(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Maps checkout failures to user-facing responses. The three step failures
/// imply different remediation, so they must stay distinguishable without
/// leaking raw processor responses to the customer.
impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidRequest(message) => AppError::Validation(message),
            CheckoutError::Auth(e) => {
                tracing::error!("processor authentication failed: {}", e);
                AppError::PaymentSetup("could not reach the payment provider".to_string())
            }
            CheckoutError::OrderCreation(e) => {
                tracing::error!("processor rejected order: {}", e);
                AppError::OrderRejected("invalid order details".to_string())
            }
            CheckoutError::PaymentKey(e) => {
                tracing::error!("payment key generation failed: {}", e);
                AppError::PaymentSetup("payment setup unavailable".to_string())
            }
        }
    }
}
