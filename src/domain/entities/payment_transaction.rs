use super::iap_product_id::IapProductId;

/// State of a platform payment transaction, as reported through the
/// payment-queue port. One-way progression ending in
/// `Purchased`/`Restored`/`Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTransactionState {
    Purchasing,
    Purchased,
    Failed,
    Restored,
    Deferred,
}

/// A platform-owned record of one purchase attempt's progress. The library
/// only observes and classifies these; it never creates or mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTransaction {
    pub product_id: IapProductId,
    pub state: PaymentTransactionState,
    /// Platform-reported failure cause, present when `state` is `Failed`.
    pub error: Option<String>,
}
