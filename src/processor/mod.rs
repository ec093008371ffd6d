pub mod client;
pub mod types;

pub use client::{AuthError, OrderCreationError, PaymentKeyError, ProcessorClient};
