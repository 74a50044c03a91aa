use async_trait::async_trait;

use crate::errors::StoreError;

/// Port onto the on-device receipt file and the OS-level refresh request,
/// implemented by the embedding application.
#[async_trait]
pub trait ReceiptStoreDatasource: Send + Sync {
    /// Reads the locally stored signed receipt. Fails when no receipt file
    /// is present.
    async fn read_local_receipt(&self) -> Result<Vec<u8>, StoreError>;

    /// Asks the OS to fetch a fresh receipt. On success the receipt is
    /// expected to be present for a subsequent [`Self::read_local_receipt`].
    async fn request_refresh(&self) -> Result<(), StoreError>;
}
