pub mod dispatcher;
pub mod event;
pub mod signature;

pub use dispatcher::{DispatchOutcome, WebhookDispatcher};
pub use event::{TransactionEvent, WebhookEvent};
pub use signature::verify_signature;
