use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::domain::money::to_minor_units;
use crate::domain::{CheckoutRequest, MerchantOrder};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub processor_order_id: i64,
    pub iframe_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Creates a pending merchant order, stands up the hosted payment session,
/// and records the processor order id before handing the redirect URL back.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let amount_cents =
        to_minor_units(request.total()).map_err(|e| AppError::Validation(e.to_string()))?;

    let order = MerchantOrder::new(amount_cents, state.config.currency.clone());
    let order_id = order.id;
    state.store.insert(order).await.map_err(|e| {
        error!("failed to persist order: {}", e);
        AppError::Internal("could not create order".to_string())
    })?;

    let session = state
        .checkout
        .create_checkout_session(order_id, &request)
        .await
        .map_err(AppError::from)?;

    // The processor reference must be durable before the customer is
    // redirected, or the eventual webhook cannot be matched back.
    state
        .store
        .attach_processor_order(order_id, session.processor_order_id)
        .await
        .map_err(|e| {
            error!("failed to record processor order id: {}", e);
            AppError::Internal("could not finalize order".to_string())
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id,
            processor_order_id: session.processor_order_id,
            iframe_url: session.iframe_url,
            expires_at: session.expires_at,
        }),
    ))
}
