//! Checkout orchestration: the strict three-step sequence that stands up a
//! hosted payment session for one checkout attempt.

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::money::{to_minor_units, MoneyError};
use crate::domain::{CheckoutRequest, FulfillmentMethod, PaymentSessionResult};
use crate::processor::types::{BillingData, OrderItem, OrderRequest, PaymentKeyRequest};
use crate::processor::{AuthError, OrderCreationError, PaymentKeyError, ProcessorClient};

/// The processor requires all billing fields present as strings.
const BILLING_FIELD_PLACEHOLDER: &str = "NA";
const PAYMENT_KEY_EXPIRATION_SECS: u32 = 3600;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("invalid checkout request: {0}")]
    InvalidRequest(String),
    #[error("processor authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("processor order creation failed: {0}")]
    OrderCreation(#[from] OrderCreationError),
    #[error("payment key generation failed: {0}")]
    PaymentKey(#[from] PaymentKeyError),
}

impl From<MoneyError> for CheckoutError {
    fn from(err: MoneyError) -> Self {
        CheckoutError::InvalidRequest(err.to_string())
    }
}

pub struct CheckoutService {
    processor: ProcessorClient,
    api_key: String,
    integration_id: String,
    currency: String,
    base_url: String,
}

impl CheckoutService {
    pub fn new(processor: ProcessorClient, config: &Config) -> Self {
        Self {
            processor,
            api_key: config.processor_api_key.clone(),
            integration_id: config.processor_integration_id.clone(),
            currency: config.currency.clone(),
            base_url: config.processor_base_url.clone(),
        }
    }

    /// Runs authenticate, order creation, and payment key generation in
    /// order, aborting on the first failure. Later steps are never invoked
    /// after a failure, and no step is retried here: the customer retries
    /// checkout from scratch, which avoids duplicate processor-side orders.
    pub async fn create_checkout_session(
        &self,
        order_id: Uuid,
        request: &CheckoutRequest,
    ) -> Result<PaymentSessionResult, CheckoutError> {
        request
            .validate()
            .map_err(|e| CheckoutError::InvalidRequest(e.to_string()))?;

        // Converted once; the same integer amount goes to both the order
        // creation and the payment key calls.
        let amount_cents = to_minor_units(request.total())?;
        let items = request
            .items
            .iter()
            .map(|item| {
                Ok(OrderItem {
                    name: item.name.clone(),
                    amount_cents: to_minor_units(item.unit_price)?,
                    description: item
                        .description
                        .clone()
                        .unwrap_or_else(|| BILLING_FIELD_PLACEHOLDER.to_string()),
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, MoneyError>>()?;

        info!(order = %order_id, amount_cents, "starting checkout session");

        let auth_token = self.processor.authenticate(&self.api_key).await?;

        let processor_order_id = self
            .processor
            .create_order(&OrderRequest {
                auth_token: auth_token.clone(),
                delivery_needed: request.fulfillment == FulfillmentMethod::Delivery,
                amount_cents,
                currency: self.currency.clone(),
                merchant_order_id: order_id.to_string(),
                items,
            })
            .await?;

        info!(order = %order_id, processor_order_id, "processor order created");

        let payment_token = self
            .processor
            .create_payment_key(&PaymentKeyRequest {
                auth_token,
                amount_cents,
                expiration: PAYMENT_KEY_EXPIRATION_SECS,
                order_id: processor_order_id,
                billing_data: billing_data(request),
                currency: self.currency.clone(),
                integration_id: self.integration_id.clone(),
            })
            .await?;

        info!(order = %order_id, processor_order_id, "payment session ready");

        Ok(PaymentSessionResult {
            iframe_url: format!(
                "{}/acceptance/iframes/{}?payment_token={}",
                self.base_url.trim_end_matches('/'),
                self.integration_id,
                payment_token
            ),
            processor_order_id,
            payment_token,
            expires_at: Utc::now() + Duration::seconds(i64::from(PAYMENT_KEY_EXPIRATION_SECS)),
        })
    }
}

fn billing_data(request: &CheckoutRequest) -> BillingData {
    let or_placeholder = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(BILLING_FIELD_PLACEHOLDER)
            .to_string()
    };

    let name = request.sanitized_customer_name();
    let (first_name, last_name) = match name.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (name, BILLING_FIELD_PLACEHOLDER.to_string()),
    };

    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| placeholder_email(&request.phone));

    BillingData {
        apartment: or_placeholder(&request.apartment),
        building: or_placeholder(&request.building),
        city: or_placeholder(&request.city),
        country: or_placeholder(&request.country),
        email,
        first_name,
        floor: or_placeholder(&request.floor),
        last_name,
        phone_number: request.phone.clone(),
        state: or_placeholder(&request.state),
        street: or_placeholder(&request.street),
    }
}

/// Deterministic placeholder for customers who gave no email. The processor
/// schema requires one; this is a documented stand-in, not verification.
fn placeholder_email(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{}@placeholder.invalid", digits)
}
