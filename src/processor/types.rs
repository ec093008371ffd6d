//! Wire types for the processor's JSON API. Field names match the processor's
//! schema exactly; these structs never leak past the client and the
//! orchestrator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AuthRequest {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub name: String,
    pub amount_cents: i64,
    pub description: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct OrderRequest {
    pub auth_token: String,
    pub delivery_needed: bool,
    pub amount_cents: i64,
    pub currency: String,
    pub merchant_order_id: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
}

/// The processor requires every billing field to be a present, non-null
/// string. Optional fields are filled with the "NA" sentinel upstream.
#[derive(Debug, Clone, Serialize)]
pub struct BillingData {
    pub apartment: String,
    pub building: String,
    pub city: String,
    pub country: String,
    pub email: String,
    pub first_name: String,
    pub floor: String,
    pub last_name: String,
    pub phone_number: String,
    pub state: String,
    pub street: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentKeyRequest {
    pub auth_token: String,
    pub amount_cents: i64,
    pub expiration: u32,
    pub order_id: i64,
    pub billing_data: BillingData,
    pub currency: String,
    pub integration_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentKeyResponse {
    pub token: String,
}
