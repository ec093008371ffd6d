//! Inbound webhook payloads, parsed once into a tagged union.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const TRANSACTION_TYPE: &str = "TRANSACTION";
pub const DELIVERY_STATUS_TYPE: &str = "DELIVERY_STATUS";

#[derive(Error, Debug)]
pub enum EventParseError {
    #[error("malformed webhook payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    obj: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionOrder {
    pub id: i64,
    #[serde(default)]
    pub merchant_order_id: Option<String>,
}

/// Payment outcome notification for one processor order.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEvent {
    pub success: bool,
    pub pending: bool,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    pub order: TransactionOrder,
    #[serde(default)]
    pub txn_response_code: Option<Value>,
    #[serde(default)]
    pub integration_id: Option<i64>,
}

/// A verified webhook body, classified by its declared type. Unrecognized
/// types are preserved so they can be logged and acknowledged.
#[derive(Debug)]
pub enum WebhookEvent {
    Transaction(TransactionEvent),
    DeliveryStatus(Value),
    Unknown(String),
}

impl WebhookEvent {
    pub fn parse(body: &[u8]) -> Result<Self, EventParseError> {
        let raw: RawEvent = serde_json::from_slice(body)?;

        match raw.kind.as_str() {
            TRANSACTION_TYPE => Ok(WebhookEvent::Transaction(serde_json::from_value(raw.obj)?)),
            DELIVERY_STATUS_TYPE => Ok(WebhookEvent::DeliveryStatus(raw.obj)),
            _ => Ok(WebhookEvent::Unknown(raw.kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction_event() {
        let body = br#"{
            "type": "TRANSACTION",
            "obj": {
                "success": true,
                "pending": false,
                "amount_cents": 25000,
                "currency": "EGP",
                "order": {"id": 9911, "merchant_order_id": "abc-123"},
                "txn_response_code": "APPROVED",
                "integration_id": 123456
            }
        }"#;

        let event = WebhookEvent::parse(body).unwrap();
        match event {
            WebhookEvent::Transaction(tx) => {
                assert!(tx.success);
                assert!(!tx.pending);
                assert_eq!(tx.amount_cents, 25000);
                assert_eq!(tx.order.id, 9911);
                assert_eq!(tx.order.merchant_order_id.as_deref(), Some("abc-123"));
            }
            other => panic!("expected transaction event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_transaction_without_merchant_order_id() {
        let body = br#"{
            "type": "TRANSACTION",
            "obj": {"success": false, "pending": false, "order": {"id": 7}}
        }"#;

        let event = WebhookEvent::parse(body).unwrap();
        match event {
            WebhookEvent::Transaction(tx) => {
                assert!(tx.order.merchant_order_id.is_none());
            }
            other => panic!("expected transaction event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_delivery_status_event() {
        let body = br#"{"type": "DELIVERY_STATUS", "obj": {"status": "Scheduled"}}"#;

        assert!(matches!(
            WebhookEvent::parse(body).unwrap(),
            WebhookEvent::DeliveryStatus(_)
        ));
    }

    #[test]
    fn test_parse_unknown_type() {
        let body = br#"{"type": "SOMETHING_ELSE", "obj": {}}"#;

        match WebhookEvent::parse(body).unwrap() {
            WebhookEvent::Unknown(kind) => assert_eq!(kind, "SOMETHING_ELSE"),
            other => panic!("expected unknown event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(WebhookEvent::parse(b"not json").is_err());
    }

    #[test]
    fn test_parse_transaction_missing_outcome_fields() {
        let body = br#"{"type": "TRANSACTION", "obj": {"order": {"id": 1}}}"#;

        assert!(WebhookEvent::parse(body).is_err());
    }
}
