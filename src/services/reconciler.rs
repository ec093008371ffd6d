//! Applies verified payment-outcome events to locally tracked orders.
//!
//! The processor delivers webhooks at least once and possibly concurrently,
//! so every transition is idempotent and applied under a per-order lock.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::OrderStatus;
use crate::store::{OrderStore, StoreError};
use crate::webhook::event::TransactionEvent;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("order store failure: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The order moved to a new status.
    Applied(OrderStatus),
    /// Duplicate delivery of an already-settled outcome; nothing changed.
    AlreadySettled(OrderStatus),
    /// Payment still in flight at the processor; acknowledged, no transition.
    InFlight,
    /// No locally tracked order matches the event's references.
    Unmatched,
}

pub struct OrderStatusReconciler {
    store: Arc<dyn OrderStore>,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl OrderStatusReconciler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn apply_transaction_event(
        &self,
        event: &TransactionEvent,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let Some(order_id) = self.resolve_order(event).await? else {
            warn!(
                processor_order_id = event.order.id,
                merchant_order_id = ?event.order.merchant_order_id,
                "transaction event for unknown order"
            );
            return Ok(ReconcileOutcome::Unmatched);
        };

        if event.success && event.pending {
            info!(order = %order_id, "payment still pending at processor");
            return Ok(ReconcileOutcome::InFlight);
        }

        let lock = self.order_lock(order_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock so concurrent deliveries observe each
        // other's transitions.
        let Some(order) = self.store.get(order_id).await? else {
            return Ok(ReconcileOutcome::Unmatched);
        };

        if event.amount_cents != 0 && event.amount_cents != order.amount_cents {
            warn!(
                order = %order_id,
                event_amount = event.amount_cents,
                order_amount = order.amount_cents,
                "transaction event amount differs from tracked order"
            );
        }

        let target = if event.success {
            OrderStatus::Paid
        } else {
            OrderStatus::PaymentFailed
        };

        if order.status.is_settled() {
            // Duplicate delivery, or a late failure after a recorded success.
            // Either way the settled status wins.
            info!(order = %order_id, status = ?order.status, "ignoring event for settled order");
            return Ok(ReconcileOutcome::AlreadySettled(order.status));
        }

        self.store.set_status(order_id, target).await?;
        info!(order = %order_id, status = ?target, "order status updated");

        Ok(ReconcileOutcome::Applied(target))
    }

    /// Matches the event to a merchant order: the merchant order id the
    /// processor echoes back, falling back to the processor order id recorded
    /// at checkout.
    async fn resolve_order(
        &self,
        event: &TransactionEvent,
    ) -> Result<Option<Uuid>, ReconcileError> {
        if let Some(merchant_ref) = event.order.merchant_order_id.as_deref() {
            if let Ok(id) = Uuid::parse_str(merchant_ref) {
                if self.store.get(id).await?.is_some() {
                    return Ok(Some(id));
                }
            }
        }

        Ok(self
            .store
            .find_by_processor_order(event.order.id)
            .await?
            .map(|order| order.id))
    }

    async fn order_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MerchantOrder;
    use crate::store::InMemoryOrderStore;
    use crate::webhook::event::TransactionOrder;

    fn event(success: bool, pending: bool, order: &MerchantOrder) -> TransactionEvent {
        TransactionEvent {
            success,
            pending,
            amount_cents: order.amount_cents,
            currency: Some(order.currency.clone()),
            order: TransactionOrder {
                id: order.processor_order_id.unwrap_or(0),
                merchant_order_id: Some(order.id.to_string()),
            },
            txn_response_code: None,
            integration_id: None,
        }
    }

    async fn seeded() -> (OrderStatusReconciler, Arc<InMemoryOrderStore>, MerchantOrder) {
        let store = Arc::new(InMemoryOrderStore::new());
        let mut order = MerchantOrder::new(25000, "EGP".to_string());
        order.processor_order_id = Some(9911);
        store.insert(order.clone()).await.unwrap();

        let reconciler = OrderStatusReconciler::new(store.clone());
        (reconciler, store, order)
    }

    #[tokio::test]
    async fn test_success_event_marks_order_paid() {
        let (reconciler, store, order) = seeded().await;

        let outcome = reconciler
            .apply_transaction_event(&event(true, false, &order))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Paid));
        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_duplicate_success_event_is_noop() {
        let (reconciler, store, order) = seeded().await;
        let ev = event(true, false, &order);

        reconciler.apply_transaction_event(&ev).await.unwrap();
        let outcome = reconciler.apply_transaction_event(&ev).await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::AlreadySettled(OrderStatus::Paid)
        );
        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_failure_after_success_does_not_regress() {
        let (reconciler, store, order) = seeded().await;

        reconciler
            .apply_transaction_event(&event(true, false, &order))
            .await
            .unwrap();
        let outcome = reconciler
            .apply_transaction_event(&event(false, false, &order))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::AlreadySettled(OrderStatus::Paid)
        );
        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_failure_event_marks_order_failed() {
        let (reconciler, store, order) = seeded().await;

        let outcome = reconciler
            .apply_transaction_event(&event(false, false, &order))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Applied(OrderStatus::PaymentFailed)
        );
        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::PaymentFailed);
    }

    #[tokio::test]
    async fn test_pending_success_is_ignored() {
        let (reconciler, store, order) = seeded().await;

        let outcome = reconciler
            .apply_transaction_event(&event(true, true, &order))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::InFlight);
        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_reference_is_unmatched() {
        let (reconciler, _store, order) = seeded().await;

        let mut ev = event(true, false, &order);
        ev.order.merchant_order_id = Some("not-a-known-order".to_string());
        ev.order.id = 777;

        let outcome = reconciler.apply_transaction_event(&ev).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Unmatched);
    }

    #[tokio::test]
    async fn test_matches_by_processor_order_id_when_merchant_ref_missing() {
        let (reconciler, store, order) = seeded().await;

        let mut ev = event(true, false, &order);
        ev.order.merchant_order_id = None;

        let outcome = reconciler.apply_transaction_event(&ev).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Paid));
        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_concurrent_success_events_settle_once() {
        let (reconciler, store, order) = seeded().await;
        let reconciler = Arc::new(reconciler);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let reconciler = reconciler.clone();
            let ev = event(true, false, &order);
            handles.push(tokio::spawn(async move {
                reconciler.apply_transaction_event(&ev).await.unwrap()
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if let ReconcileOutcome::Applied(_) = handle.await.unwrap() {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }
}
