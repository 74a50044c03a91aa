use tokio::sync::mpsc;

use crate::domain::entities::payment_transaction::PaymentTransaction;

use super::product_lookup_datasource::StoreProduct;

/// Event delivered by the platform payment queue to its observers.
#[derive(Debug, Clone)]
pub enum PaymentQueueEvent {
    /// A batch of transactions changed state. Batches are delivered in
    /// order and may contain transactions belonging to other operations.
    UpdatedTransactions(Vec<PaymentTransaction>),
    /// The "restore completed transactions" request finished.
    RestoreFinished,
    /// The "restore completed transactions" request failed.
    RestoreFailed { message: String },
}

/// Port onto the platform payment queue, implemented by the embedding
/// application.
///
/// Observer registration is modeled as a channel subscription: dropping the
/// returned receiver deregisters the observer. Payment submission cannot be
/// cancelled once enqueued, so there is no abort operation.
pub trait PaymentQueueDatasource: Send + Sync {
    /// Whether the current user is allowed to make payments at all.
    fn can_make_payments(&self) -> bool;

    /// Registers an observer. Every subsequent queue event is delivered to
    /// the returned receiver until it is dropped.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<PaymentQueueEvent>;

    /// Enqueues a payment for the given product.
    fn add_payment(&self, product: &StoreProduct);

    /// Asks the platform to re-deliver all previously completed
    /// transactions for the current account.
    fn restore_completed_transactions(&self);
}
