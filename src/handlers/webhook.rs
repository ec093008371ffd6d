use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::AppError;
use crate::webhook::DispatchOutcome;
use crate::AppState;

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Processor webhook endpoint. The body is taken as raw bytes because the
/// signature covers the payload exactly as sent. Every verified payload is
/// acknowledged with 200 so the processor stops re-delivering; only a
/// signature failure returns 401, and only a storage failure returns 500.
pub async fn processor_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = state
        .dispatcher
        .dispatch(&body, signature)
        .await
        .map_err(|e| {
            error!("webhook processing failed: {}", e);
            AppError::Internal("webhook processing failed".to_string())
        })?;

    match outcome {
        DispatchOutcome::Rejected => Err(AppError::Unauthorized(
            "invalid webhook signature".to_string(),
        )),
        _ => Ok(Json(json!({"received": true}))),
    }
}
