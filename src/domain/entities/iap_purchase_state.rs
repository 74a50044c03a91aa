use crate::errors::StoreError;

use super::payment_transaction::{PaymentTransaction, PaymentTransactionState};

/// Published purchase status of one product.
///
/// A product transitions `Loading → {Purchased | Failed}`; it re-enters
/// `Loading` only when a new purchase or restore attempt is explicitly
/// started. The at-most-one-live-attempt rule is enforced by the manager,
/// not by this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IapPurchaseState {
    Loading,
    Purchased,
    Failed(StoreError),
}

impl IapPurchaseState {
    /// True while an attempt is pending or has already succeeded.
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Loading | Self::Purchased)
    }

    pub fn is_purchased(&self) -> bool {
        matches!(self, Self::Purchased)
    }

    /// Classifies a platform transaction into the published state.
    pub fn from_transaction(transaction: &PaymentTransaction) -> Self {
        match transaction.state {
            PaymentTransactionState::Purchased | PaymentTransactionState::Restored => {
                Self::Purchased
            }
            PaymentTransactionState::Failed => Self::Failed(StoreError::TransactionFailed {
                message: transaction.error.clone().unwrap_or_default(),
            }),
            PaymentTransactionState::Purchasing | PaymentTransactionState::Deferred => {
                Self::Loading
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::iap_product_id::IapProductId;

    fn transaction(state: PaymentTransactionState, error: Option<&str>) -> PaymentTransaction {
        PaymentTransaction {
            product_id: IapProductId::from("pro_unlock"),
            state,
            error: error.map(str::to_owned),
        }
    }

    #[test]
    fn classifies_terminal_states() {
        assert_eq!(
            IapPurchaseState::from_transaction(&transaction(
                PaymentTransactionState::Purchased,
                None
            )),
            IapPurchaseState::Purchased,
        );
        assert_eq!(
            IapPurchaseState::from_transaction(&transaction(
                PaymentTransactionState::Restored,
                None
            )),
            IapPurchaseState::Purchased,
        );
        assert_eq!(
            IapPurchaseState::from_transaction(&transaction(
                PaymentTransactionState::Failed,
                Some("card declined")
            )),
            IapPurchaseState::Failed(StoreError::TransactionFailed {
                message: "card declined".to_owned()
            }),
        );
    }

    #[test]
    fn classifies_pending_states_as_loading() {
        for state in [
            PaymentTransactionState::Purchasing,
            PaymentTransactionState::Deferred,
        ] {
            assert_eq!(
                IapPurchaseState::from_transaction(&transaction(state, None)),
                IapPurchaseState::Loading,
            );
        }
    }
}
