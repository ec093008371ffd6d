//! Storage port for the one record this core owns: the merchant order and its
//! payment status.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{MerchantOrder, OrderStatus};

pub use memory::InMemoryOrderStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("order {0} not found")]
    NotFound(Uuid),
    #[error("order store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: MerchantOrder) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<MerchantOrder>, StoreError>;

    async fn find_by_processor_order(
        &self,
        processor_order_id: i64,
    ) -> Result<Option<MerchantOrder>, StoreError>;

    /// Records the processor-assigned order id after checkout step 2.
    async fn attach_processor_order(
        &self,
        id: Uuid,
        processor_order_id: i64,
    ) -> Result<(), StoreError>;

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<(), StoreError>;
}
