use std::{collections::HashMap, sync::Arc};

use tokio::sync::watch;
use tracing::info;

use crate::{
    config::IapConfig,
    data::{
        datasources::verify_receipt_datasource::VerifyReceiptDatasourceImpl,
        repositories::{
            purchase_repository_impl::PurchaseRepositoryImpl,
            receipt_repository_impl::ReceiptRepositoryImpl,
        },
    },
    domain::{
        datasources::{
            payment_queue_datasource::PaymentQueueDatasource,
            product_lookup_datasource::ProductLookupDatasource,
            receipt_store_datasource::ReceiptStoreDatasource,
        },
        entities::{
            app_receipt::AppReceipt, iap_product_id::IapProductId,
            iap_purchase_state::IapPurchaseState,
        },
        repositories::{
            purchase_repository::PurchaseRepository, receipt_repository::ReceiptRepository,
        },
    },
    errors::StoreError,
};

enum PurchaseGate {
    AlreadyLoading,
    AlreadyPurchased,
    Start,
}

/// Facade over the storefront: keyed purchase-state store plus the
/// single-shot purchase, restore, and receipt-verification operations.
///
/// All writes to the state map go through the single `watch` sender, which
/// both serializes them and publishes a snapshot to subscribers; readers
/// never see a mutable reference.
pub struct IapManager<P, R> {
    purchase_repository: Arc<P>,
    receipt_repository: R,
    state: Arc<watch::Sender<HashMap<IapProductId, IapPurchaseState>>>,
}

impl<P, R> IapManager<P, R>
where
    P: PurchaseRepository + 'static,
    R: ReceiptRepository,
{
    /// Whether the platform allows this user to make payments at all.
    pub fn is_authorized_for_payments(&self) -> bool {
        self.purchase_repository.is_authorized_for_payments()
    }

    /// True while any product has a pending attempt.
    pub fn purchase_in_progress(&self) -> bool {
        self.state
            .borrow()
            .values()
            .any(|state| matches!(state, IapPurchaseState::Loading))
    }

    pub fn purchase_in_progress_for(&self, product_id: &IapProductId) -> bool {
        matches!(
            self.state.borrow().get(product_id),
            Some(IapPurchaseState::Loading)
        )
    }

    /// Snapshot of the full purchase-state map.
    pub fn purchase_state(&self) -> HashMap<IapProductId, IapPurchaseState> {
        self.state.borrow().clone()
    }

    /// Read-only view of the state map; a new snapshot is published on
    /// every change.
    pub fn subscribe_purchase_state(
        &self,
    ) -> watch::Receiver<HashMap<IapProductId, IapPurchaseState>> {
        self.state.subscribe()
    }

    /// Purchases one product.
    ///
    /// A product already `Loading` is left alone (no duplicate platform
    /// interaction); a product already `Purchased` is re-affirmed without
    /// contacting the platform. Otherwise the product enters `Loading` and
    /// a fresh purchase attempt runs; its terminal state is recorded in the
    /// map and returned. The attempt runs on a spawned task, so a caller
    /// that stops awaiting does not cancel the platform transaction and the
    /// late result still lands in the map.
    pub async fn purchase_product(&self, product_id: &IapProductId) -> Result<(), StoreError> {
        info!("Purchasing {product_id}");
        let mut gate = PurchaseGate::Start;
        self.state.send_if_modified(|map| match map.get(product_id) {
            Some(IapPurchaseState::Loading) => {
                gate = PurchaseGate::AlreadyLoading;
                false
            }
            Some(IapPurchaseState::Purchased) => {
                gate = PurchaseGate::AlreadyPurchased;
                // Republished unchanged so observers see the re-affirmation.
                true
            }
            _ => {
                map.insert(product_id.clone(), IapPurchaseState::Loading);
                gate = PurchaseGate::Start;
                true
            }
        });
        match gate {
            PurchaseGate::AlreadyLoading => {
                info!("{product_id} is already in progress");
                return Ok(());
            }
            PurchaseGate::AlreadyPurchased => {
                info!("{product_id} already purchased");
                return Ok(());
            }
            PurchaseGate::Start => {}
        }

        let repository = Arc::clone(&self.purchase_repository);
        let state = Arc::clone(&self.state);
        let product_id = product_id.clone();
        let attempt = tokio::spawn(async move {
            let result = repository.purchase(&product_id).await;
            let terminal = match &result {
                Ok(()) => IapPurchaseState::Purchased,
                Err(e) => IapPurchaseState::Failed(e.clone()),
            };
            state.send_modify(|map| {
                map.insert(product_id, terminal);
            });
            result
        });
        attempt.await.unwrap_or_else(|e| {
            Err(StoreError::RequestFailed {
                message: format!("purchase task failed: {e}"),
            })
        })
    }

    /// Restores all previously purchased products, recording each restored
    /// transaction's state and returning the product identifiers.
    pub async fn restore_purchases(&self) -> Result<Vec<IapProductId>, StoreError> {
        if !self.is_authorized_for_payments() {
            return Err(StoreError::NotAuthorizedForPayment);
        }
        let transactions = self.purchase_repository.restore().await?;
        self.state.send_modify(|map| {
            for transaction in &transactions {
                map.insert(
                    transaction.product_id.clone(),
                    IapPurchaseState::from_transaction(transaction),
                );
            }
        });
        Ok(transactions
            .into_iter()
            .map(|transaction| transaction.product_id)
            .collect())
    }

    /// Fetches and verifies the current receipt. The production/sandbox
    /// endpoint switch is handled internally.
    pub async fn get_app_receipt(&self) -> Result<AppReceipt, StoreError> {
        self.receipt_repository.get_app_receipt().await
    }
}

impl<Q, L, S>
    IapManager<
        PurchaseRepositoryImpl<Q, L>,
        ReceiptRepositoryImpl<S, VerifyReceiptDatasourceImpl>,
    >
where
    Q: PaymentQueueDatasource + 'static,
    L: ProductLookupDatasource + 'static,
    S: ReceiptStoreDatasource + 'static,
{
    pub fn new(config: IapConfig, payment_queue: Q, product_lookup: L, receipt_store: S) -> Self {
        let payment_queue = Arc::new(payment_queue);
        let (state, _) = watch::channel(HashMap::new());
        Self {
            purchase_repository: Arc::new(PurchaseRepositoryImpl::new(
                payment_queue,
                product_lookup,
                config.operation_timeout,
            )),
            receipt_repository: ReceiptRepositoryImpl::new(
                receipt_store,
                VerifyReceiptDatasourceImpl::new(config.shared_secret.clone()),
                config,
            ),
            state: Arc::new(state),
        }
    }
}
