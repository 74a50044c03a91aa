use async_trait::async_trait;

use crate::{domain::entities::app_receipt::AppReceipt, errors::StoreError};

/// Obtains the current receipt and verifies it server-side, absorbing the
/// production/sandbox environment quirk internally.
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    async fn get_app_receipt(&self) -> Result<AppReceipt, StoreError>;
}
