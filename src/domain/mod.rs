pub mod money;
pub mod order;

pub use order::{
    CheckoutRequest, FulfillmentMethod, LineItem, MerchantOrder, OrderStatus, PaymentSessionResult,
};
