use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::processor::types::{
    AuthRequest, AuthResponse, OrderRequest, OrderResponse, PaymentKeyRequest, PaymentKeyResponse,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("auth request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("processor returned {status} for auth token request: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid auth response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum OrderCreationError {
    #[error("order creation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("processor returned {status} for order creation: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid order creation response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum PaymentKeyError {
    #[error("payment key request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("processor returned {status} for payment key request: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid payment key response: {0}")]
    InvalidResponse(String),
}

/// HTTP client for the processor's three checkout endpoints. Stateless
/// request/response mapping only; retry decisions belong to the caller, since
/// blindly retrying order creation risks duplicate processor-side orders.
#[derive(Clone)]
pub struct ProcessorClient {
    client: Client,
    base_url: String,
}

impl ProcessorClient {
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        ProcessorClient { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Exchanges the merchant API key for a short-lived bearer token.
    pub async fn authenticate(&self, api_key: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .post(self.endpoint("/auth/tokens"))
            .json(&AuthRequest {
                api_key: api_key.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::Status { status, body });
        }

        let parsed: AuthResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        if parsed.token.is_empty() {
            return Err(AuthError::InvalidResponse("empty token".to_string()));
        }

        Ok(parsed.token)
    }

    /// Registers the order with the processor, returning its order id.
    pub async fn create_order(&self, request: &OrderRequest) -> Result<i64, OrderCreationError> {
        let response = self
            .client
            .post(self.endpoint("/ecommerce/orders"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OrderCreationError::Status { status, body });
        }

        let parsed: OrderResponse = serde_json::from_str(&body)
            .map_err(|e| OrderCreationError::InvalidResponse(e.to_string()))?;

        Ok(parsed.id)
    }

    /// Generates a payment token bound to an existing processor order.
    pub async fn create_payment_key(
        &self,
        request: &PaymentKeyRequest,
    ) -> Result<String, PaymentKeyError> {
        let response = self
            .client
            .post(self.endpoint("/acceptance/payment_keys"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PaymentKeyError::Status { status, body });
        }

        let parsed: PaymentKeyResponse = serde_json::from_str(&body)
            .map_err(|e| PaymentKeyError::InvalidResponse(e.to_string()))?;

        if parsed.token.is_empty() {
            return Err(PaymentKeyError::InvalidResponse("empty token".to_string()));
        }

        Ok(parsed.token)
    }
}
