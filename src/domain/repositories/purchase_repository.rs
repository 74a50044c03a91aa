use async_trait::async_trait;

use crate::{
    domain::entities::{iap_product_id::IapProductId, payment_transaction::PaymentTransaction},
    errors::StoreError,
};

/// Purchase and restore operations against the platform payment queue.
/// Each call drives one complete attempt; attempts never overlap on the
/// same product (enforced by the manager).
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    fn is_authorized_for_payments(&self) -> bool;

    /// Purchases one product, resolving when the corresponding transaction
    /// reaches a terminal state.
    async fn purchase(&self, product_id: &IapProductId) -> Result<(), StoreError>;

    /// Restores all previously completed transactions, resolving with every
    /// transaction the platform re-delivered.
    async fn restore(&self) -> Result<Vec<PaymentTransaction>, StoreError>;
}
