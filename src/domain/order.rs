//! Order domain entities.
//! Framework-agnostic representation of a checkout attempt and the merchant
//! order it produces.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{
    sanitize_string, validate_max_len, validate_required, ValidationError, ValidationResult,
    CUSTOMER_NAME_MAX_LEN, ITEM_NAME_MAX_LEN, MAX_LINE_ITEMS, PHONE_MAX_LEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentMethod {
    Delivery,
    Pickup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// Unit price in major currency units.
    pub unit_price: Decimal,
    pub quantity: u32,
    pub description: Option<String>,
}

impl LineItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// One checkout attempt. Created per attempt and discarded once orchestration
/// completes; only the resulting processor references outlive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub street: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub apartment: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub fulfillment: FulfillmentMethod,
    pub items: Vec<LineItem>,
}

impl CheckoutRequest {
    /// Total amount in major units, always the sum of line-item subtotals.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    pub fn validate(&self) -> ValidationResult {
        validate_required("customer_name", &self.customer_name)?;
        validate_max_len("customer_name", &self.customer_name, CUSTOMER_NAME_MAX_LEN)?;
        validate_required("phone", &self.phone)?;
        validate_max_len("phone", &self.phone, PHONE_MAX_LEN)?;

        if self.items.is_empty() {
            return Err(ValidationError::new("items", "must contain at least one item"));
        }

        if self.items.len() > MAX_LINE_ITEMS {
            return Err(ValidationError::new(
                "items",
                format!("must contain at most {} items", MAX_LINE_ITEMS),
            ));
        }

        for item in &self.items {
            validate_required("items.name", &item.name)?;
            validate_max_len("items.name", &item.name, ITEM_NAME_MAX_LEN)?;

            if item.unit_price <= Decimal::ZERO {
                return Err(ValidationError::new("items.unit_price", "must be positive"));
            }

            if item.quantity == 0 {
                return Err(ValidationError::new("items.quantity", "must be at least 1"));
            }
        }

        if self.fulfillment == FulfillmentMethod::Delivery {
            let street = self.street.as_deref().unwrap_or("");
            let city = self.city.as_deref().unwrap_or("");
            validate_required("street", street)?;
            validate_required("city", city)?;
        }

        Ok(())
    }

    /// Display name with control characters and stray whitespace removed.
    pub fn sanitized_customer_name(&self) -> String {
        sanitize_string(&self.customer_name)
    }
}

/// Payment state of a merchant order. Written only by the status reconciler;
/// everything else reads or requests a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    PaymentFailed,
    Delivered,
    DeliveryFailed,
}

impl OrderStatus {
    /// A settled order never moves again on payment events.
    pub fn is_settled(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

/// The locally tracked order record. The processor order id is attached after
/// the processor-side order is created so webhook events can be matched back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantOrder {
    pub id: Uuid,
    pub status: OrderStatus,
    pub amount_cents: i64,
    pub currency: String,
    pub processor_order_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MerchantOrder {
    pub fn new(amount_cents: i64, currency: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: OrderStatus::Pending,
            amount_cents,
            currency,
            processor_order_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of a successful checkout orchestration. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSessionResult {
    pub iframe_url: String,
    pub processor_order_id: i64,
    pub payment_token: String,
    pub expires_at: DateTime<Utc>,
}
