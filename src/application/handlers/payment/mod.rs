//! Payment use cases.
//!
//! - `CreatePaymentHandler` - create a PIX charge and map it to the payer
//! - `GetPaymentHandler` - local record plus live gateway view
//! - `SyncPaymentHandler` - force local state to match the gateway
//! - `ListPaymentsHandler` - filtered, bounded listing
//! - `ProcessWebhookHandler` - thin shell over the reconciliation engine

mod create_payment;
mod get_payment;
mod list_payments;
mod process_webhook;
mod sync_payment;

pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler};
pub use get_payment::{GetPaymentHandler, GetPaymentQuery, PaymentComparison};
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery, MAX_PAGE_SIZE};
pub use process_webhook::ProcessWebhookHandler;
pub use sync_payment::{SyncPaymentCommand, SyncPaymentHandler, SyncResult};
