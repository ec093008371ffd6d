//! In-memory OrderStore adapter. The shipped default and the test double;
//! swapping in a database-backed adapter is a matter of implementing the same
//! port.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{MerchantOrder, OrderStatus};
use crate::store::{OrderStore, StoreError};

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<Uuid, MerchantOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: MerchantOrder) -> Result<(), StoreError> {
        self.orders.write().await.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<MerchantOrder>, StoreError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_by_processor_order(
        &self,
        processor_order_id: i64,
    ) -> Result<Option<MerchantOrder>, StoreError> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|order| order.processor_order_id == Some(processor_order_id))
            .cloned())
    }

    async fn attach_processor_order(
        &self,
        id: Uuid,
        processor_order_id: i64,
    ) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        order.processor_order_id = Some(processor_order_id);
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }
}
