//! Routes inbound webhook deliveries: authenticate first, then classify and
//! hand off. An unverified payload never reaches any handler.

use std::sync::Arc;
use tracing::{info, warn};

use crate::services::reconciler::{OrderStatusReconciler, ReconcileError, ReconcileOutcome};
use crate::webhook::event::WebhookEvent;
use crate::webhook::signature::verify_signature;

#[derive(Debug)]
pub enum DispatchOutcome {
    /// Signature missing or invalid; the payload is untrusted.
    Rejected,
    /// Transaction event handed to the reconciler.
    Routed(ReconcileOutcome),
    /// Authentic delivery-status event; logged, no order state is touched.
    DeliveryStatusAcknowledged,
    /// Authentic event of a type this system has no handler for.
    UnknownAcknowledged(String),
    /// Authentic but unparseable body; acknowledged, since re-delivery of the
    /// same bytes cannot succeed either.
    Malformed,
}

pub struct WebhookDispatcher {
    hmac_secret: String,
    reconciler: Arc<OrderStatusReconciler>,
}

impl WebhookDispatcher {
    pub fn new(hmac_secret: String, reconciler: Arc<OrderStatusReconciler>) -> Self {
        Self {
            hmac_secret,
            reconciler,
        }
    }

    /// `body` must be the payload exactly as received on the wire; the
    /// signature covers those bytes, not a re-serialized copy.
    pub async fn dispatch(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<DispatchOutcome, ReconcileError> {
        let Some(signature) = signature else {
            warn!("webhook delivery without signature header");
            return Ok(DispatchOutcome::Rejected);
        };

        if !verify_signature(body, signature, &self.hmac_secret) {
            warn!("webhook delivery with invalid signature");
            return Ok(DispatchOutcome::Rejected);
        }

        let event = match WebhookEvent::parse(body) {
            Ok(event) => event,
            Err(e) => {
                warn!("authenticated webhook with malformed body: {}", e);
                return Ok(DispatchOutcome::Malformed);
            }
        };

        match event {
            WebhookEvent::Transaction(tx) => {
                let outcome = self.reconciler.apply_transaction_event(&tx).await?;
                Ok(DispatchOutcome::Routed(outcome))
            }
            WebhookEvent::DeliveryStatus(obj) => {
                info!(payload = %obj, "delivery status event acknowledged");
                Ok(DispatchOutcome::DeliveryStatusAcknowledged)
            }
            WebhookEvent::Unknown(kind) => {
                info!(kind = %kind, "unhandled webhook event type acknowledged");
                Ok(DispatchOutcome::UnknownAcknowledged(kind))
            }
        }
    }
}
