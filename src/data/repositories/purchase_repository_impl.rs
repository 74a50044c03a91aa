use std::{collections::BTreeSet, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{error, info};

use crate::{
    domain::{
        datasources::{
            payment_queue_datasource::{PaymentQueueDatasource, PaymentQueueEvent},
            product_lookup_datasource::ProductLookupDatasource,
        },
        entities::{
            iap_product_id::IapProductId,
            payment_transaction::{PaymentTransaction, PaymentTransactionState},
        },
        repositories::purchase_repository::PurchaseRepository,
    },
    errors::StoreError,
};

pub struct PurchaseRepositoryImpl<Q, L> {
    payment_queue: Arc<Q>,
    product_lookup: L,
    operation_timeout: Duration,
}

impl<Q, L> PurchaseRepositoryImpl<Q, L> {
    pub(crate) fn new(payment_queue: Arc<Q>, product_lookup: L, operation_timeout: Duration) -> Self {
        Self {
            payment_queue,
            product_lookup,
            operation_timeout,
        }
    }
}

#[async_trait]
impl<Q, L> PurchaseRepository for PurchaseRepositoryImpl<Q, L>
where
    Q: PaymentQueueDatasource,
    L: ProductLookupDatasource,
{
    fn is_authorized_for_payments(&self) -> bool {
        self.payment_queue.can_make_payments()
    }

    async fn purchase(&self, product_id: &IapProductId) -> Result<(), StoreError> {
        let bridge = TransactionBridge {
            payment_queue: self.payment_queue.as_ref(),
            product_lookup: &self.product_lookup,
            product_id: product_id.clone(),
        };
        with_timeout(self.operation_timeout, bridge.run()).await
    }

    async fn restore(&self) -> Result<Vec<PaymentTransaction>, StoreError> {
        let bridge = RestoreBridge {
            payment_queue: self.payment_queue.as_ref(),
        };
        with_timeout(self.operation_timeout, bridge.run()).await
    }
}

/// Defensive bound on how long a bridge may wait for the platform. Not
/// present in classic storefront flows, where an abandoned transaction can
/// leave a caller suspended forever.
async fn with_timeout<T>(
    timeout: Duration,
    operation: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}

/// One purchase attempt. Consumed by [`TransactionBridge::run`]; the queue
/// subscription is dropped with the bridge, which deregisters the observer
/// on every exit path. Resolution is exactly-once by construction: the
/// event loop returns at the first terminal transaction for the requested
/// product and never observes later batches.
struct TransactionBridge<'a, Q, L> {
    payment_queue: &'a Q,
    product_lookup: &'a L,
    product_id: IapProductId,
}

impl<Q, L> TransactionBridge<'_, Q, L>
where
    Q: PaymentQueueDatasource,
    L: ProductLookupDatasource,
{
    async fn run(self) -> Result<(), StoreError> {
        let response = self
            .product_lookup
            .lookup(&BTreeSet::from([self.product_id.clone()]))
            .await?;
        info!("Loaded list of products");
        if response.invalid_identifiers.contains(&self.product_id) {
            return Err(StoreError::InvalidIdentifier {
                product_id: self.product_id.0.clone(),
            });
        }
        // A product the catalog neither returned nor flagged would leave
        // the attempt dangling, so it is treated as invalid too.
        let Some(product) = response
            .products
            .iter()
            .find(|product| product.product_id == self.product_id)
        else {
            return Err(StoreError::InvalidIdentifier {
                product_id: self.product_id.0.clone(),
            });
        };

        // Observe before submitting so no update batch can be missed.
        let mut events = self.payment_queue.subscribe();
        info!("Buying {}...", self.product_id);
        self.payment_queue.add_payment(product);

        while let Some(event) = events.recv().await {
            let PaymentQueueEvent::UpdatedTransactions(batch) = event else {
                continue;
            };
            for transaction in batch
                .iter()
                .filter(|transaction| transaction.product_id == self.product_id)
            {
                match transaction.state {
                    PaymentTransactionState::Purchased | PaymentTransactionState::Restored => {
                        return Ok(());
                    }
                    PaymentTransactionState::Failed => {
                        return Err(StoreError::TransactionFailed {
                            message: transaction.error.clone().unwrap_or_default(),
                        });
                    }
                    PaymentTransactionState::Purchasing | PaymentTransactionState::Deferred => {}
                }
            }
        }
        Err(queue_closed())
    }
}

/// One restore-all attempt. Accumulates every re-delivered transaction and
/// resolves on the queue-level finished signal, a terminal event distinct
/// from per-transaction state matching.
struct RestoreBridge<'a, Q> {
    payment_queue: &'a Q,
}

impl<Q: PaymentQueueDatasource> RestoreBridge<'_, Q> {
    async fn run(self) -> Result<Vec<PaymentTransaction>, StoreError> {
        let mut events = self.payment_queue.subscribe();
        info!("Restoring transactions");
        self.payment_queue.restore_completed_transactions();

        let mut restored = Vec::new();
        while let Some(event) = events.recv().await {
            match event {
                PaymentQueueEvent::UpdatedTransactions(batch) => restored.extend(batch),
                PaymentQueueEvent::RestoreFinished => {
                    info!("Restored transactions");
                    return Ok(restored);
                }
                PaymentQueueEvent::RestoreFailed { message } => {
                    error!("Transactions restore failed: {message}");
                    return Err(StoreError::RequestFailed { message });
                }
            }
        }
        Err(queue_closed())
    }
}

fn queue_closed() -> StoreError {
    StoreError::RequestFailed {
        message: "payment queue closed before the operation finished".to_owned(),
    }
}
