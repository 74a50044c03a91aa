use async_trait::async_trait;
use tracing::{error, info};

use crate::{
    config::IapConfig,
    data::datasources::verify_receipt_datasource::VerifyReceiptDatasource,
    domain::{
        datasources::receipt_store_datasource::ReceiptStoreDatasource,
        entities::{app_receipt::AppReceipt, verify_environment::VerifyEnvironment},
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::StoreError,
};

pub struct ReceiptRepositoryImpl<S, V> {
    receipt_store: S,
    verify_datasource: V,
    config: IapConfig,
}

impl<S, V> ReceiptRepositoryImpl<S, V> {
    pub(crate) fn new(receipt_store: S, verify_datasource: V, config: IapConfig) -> Self {
        Self {
            receipt_store,
            verify_datasource,
            config,
        }
    }
}

#[async_trait]
impl<S, V> ReceiptRepository for ReceiptRepositoryImpl<S, V>
where
    S: ReceiptStoreDatasource,
    V: VerifyReceiptDatasource,
{
    /// Fetches the receipt once, then walks the verification endpoints:
    /// production first, switching on every environment-mismatch response,
    /// until a definitive outcome. The loop is generic over mismatch
    /// direction but bounded by the number of distinct environments, so a
    /// backend that pathologically alternates statuses cannot spin it
    /// forever.
    async fn get_app_receipt(&self) -> Result<AppReceipt, StoreError> {
        let receipt = match tokio::time::timeout(
            self.config.operation_timeout,
            self.fetch_receipt(),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(StoreError::Timeout {
                    seconds: self.config.operation_timeout.as_secs(),
                })
            }
        };

        let mut environment = VerifyEnvironment::Production;
        for _ in 0..VerifyEnvironment::COUNT {
            match self
                .verify_datasource
                .verify(&receipt, environment.url(&self.config))
                .await
            {
                Ok(app_receipt) => return Ok(app_receipt),
                Err(StoreError::EnvironmentMismatch) => {
                    error!(
                        "Got environment-mismatch status. Switching to the {:?} environment",
                        environment.switched()
                    );
                    environment = environment.switched();
                }
                Err(other) => {
                    error!("Received error on receipt verification: {other}");
                    return Err(other);
                }
            }
        }
        Err(StoreError::NoValidEnvironment)
    }
}

impl<S: ReceiptStoreDatasource, V> ReceiptRepositoryImpl<S, V> {
    /// Local read first; a missing receipt triggers one OS refresh request
    /// followed by a re-read.
    async fn fetch_receipt(&self) -> Result<Vec<u8>, StoreError> {
        if let Ok(receipt) = self.receipt_store.read_local_receipt().await {
            return Ok(receipt);
        }
        info!("No local receipt; requesting a refresh");
        self.receipt_store
            .request_refresh()
            .await
            .map_err(|e| StoreError::ReceiptUnavailable {
                message: e.to_string(),
            })?;
        self.receipt_store
            .read_local_receipt()
            .await
            .map_err(|e| StoreError::ReceiptUnavailable {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;

    struct StubReceiptStore {
        /// Reads returned in order; replays the last entry once exhausted.
        reads: Mutex<Vec<Result<Vec<u8>, StoreError>>>,
        refresh: Result<(), StoreError>,
        read_count: AtomicUsize,
        refresh_count: AtomicUsize,
    }

    impl StubReceiptStore {
        fn with_local_receipt() -> Self {
            Self {
                reads: Mutex::new(vec![Ok(b"receipt-bytes".to_vec())]),
                refresh: Ok(()),
                read_count: AtomicUsize::new(0),
                refresh_count: AtomicUsize::new(0),
            }
        }

        fn refreshing(reads: Vec<Result<Vec<u8>, StoreError>>, refresh: Result<(), StoreError>) -> Self {
            Self {
                reads: Mutex::new(reads),
                refresh,
                read_count: AtomicUsize::new(0),
                refresh_count: AtomicUsize::new(0),
            }
        }
    }

    fn not_found() -> StoreError {
        StoreError::ReceiptUnavailable {
            message: "no receipt file".to_owned(),
        }
    }

    #[async_trait]
    impl ReceiptStoreDatasource for StubReceiptStore {
        async fn read_local_receipt(&self) -> Result<Vec<u8>, StoreError> {
            self.read_count.fetch_add(1, Ordering::SeqCst);
            let mut reads = self.reads.lock().unwrap();
            if reads.len() > 1 {
                reads.remove(0)
            } else {
                reads[0].clone()
            }
        }

        async fn request_refresh(&self) -> Result<(), StoreError> {
            self.refresh_count.fetch_add(1, Ordering::SeqCst);
            self.refresh.clone()
        }
    }

    /// Scripted verifier: pops one result per call and records the URL it
    /// was pointed at.
    struct StubVerifier {
        results: Mutex<Vec<Result<AppReceipt, StoreError>>>,
        urls: Mutex<Vec<String>>,
    }

    impl StubVerifier {
        fn scripted(results: Vec<Result<AppReceipt, StoreError>>) -> Self {
            Self {
                results: Mutex::new(results),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.urls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VerifyReceiptDatasource for StubVerifier {
        async fn verify(&self, _receipt: &[u8], url: &str) -> Result<AppReceipt, StoreError> {
            self.urls.lock().unwrap().push(url.to_owned());
            self.results.lock().unwrap().remove(0)
        }
    }

    fn receipt() -> AppReceipt {
        AppReceipt {
            original_application_version: "1.0".to_owned(),
            application_version: "2.0".to_owned(),
            in_app: vec![],
        }
    }

    fn config() -> IapConfig {
        let mut config = IapConfig::new("secret");
        config.production_verify_url = "https://production.test/verify".to_owned();
        config.sandbox_verify_url = "https://sandbox.test/verify".to_owned();
        config
    }

    #[tokio::test]
    async fn verifies_against_production_first() {
        let repository = ReceiptRepositoryImpl::new(
            StubReceiptStore::with_local_receipt(),
            StubVerifier::scripted(vec![Ok(receipt())]),
            config(),
        );
        assert_eq!(repository.get_app_receipt().await.unwrap(), receipt());
        assert_eq!(
            *repository.verify_datasource.urls.lock().unwrap(),
            vec!["https://production.test/verify".to_owned()],
        );
    }

    #[tokio::test]
    async fn switches_to_sandbox_on_mismatch_with_single_fetch() {
        let repository = ReceiptRepositoryImpl::new(
            StubReceiptStore::with_local_receipt(),
            StubVerifier::scripted(vec![Err(StoreError::EnvironmentMismatch), Ok(receipt())]),
            config(),
        );
        assert_eq!(repository.get_app_receipt().await.unwrap(), receipt());
        assert_eq!(
            *repository.verify_datasource.urls.lock().unwrap(),
            vec![
                "https://production.test/verify".to_owned(),
                "https://sandbox.test/verify".to_owned(),
            ],
        );
        // The receipt itself is fetched once and reused across endpoints.
        assert_eq!(repository.receipt_store.read_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_mismatch_is_bounded() {
        let repository = ReceiptRepositoryImpl::new(
            StubReceiptStore::with_local_receipt(),
            StubVerifier::scripted(vec![
                Err(StoreError::EnvironmentMismatch),
                Err(StoreError::EnvironmentMismatch),
            ]),
            config(),
        );
        assert_eq!(
            repository.get_app_receipt().await,
            Err(StoreError::NoValidEnvironment),
        );
        assert_eq!(repository.verify_datasource.calls(), 2);
    }

    #[tokio::test]
    async fn non_mismatch_error_terminates_immediately() {
        let repository = ReceiptRepositoryImpl::new(
            StubReceiptStore::with_local_receipt(),
            StubVerifier::scripted(vec![Err(StoreError::VerificationFailed { status: 21003 })]),
            config(),
        );
        assert_eq!(
            repository.get_app_receipt().await,
            Err(StoreError::VerificationFailed { status: 21003 }),
        );
        assert_eq!(repository.verify_datasource.calls(), 1);
    }

    #[tokio::test]
    async fn missing_local_receipt_triggers_refresh_then_reread() {
        let store = StubReceiptStore::refreshing(
            vec![Err(not_found()), Ok(b"fresh-receipt".to_vec())],
            Ok(()),
        );
        let repository =
            ReceiptRepositoryImpl::new(store, StubVerifier::scripted(vec![Ok(receipt())]), config());
        repository.get_app_receipt().await.unwrap();
        assert_eq!(repository.receipt_store.refresh_count.load(Ordering::SeqCst), 1);
        assert_eq!(repository.receipt_store.read_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_failure_surfaces_receipt_unavailable() {
        let store = StubReceiptStore::refreshing(
            vec![Err(not_found())],
            Err(StoreError::RequestFailed {
                message: "refresh denied".to_owned(),
            }),
        );
        let repository =
            ReceiptRepositoryImpl::new(store, StubVerifier::scripted(vec![]), config());
        assert!(matches!(
            repository.get_app_receipt().await,
            Err(StoreError::ReceiptUnavailable { .. }),
        ));
        assert_eq!(repository.verify_datasource.calls(), 0);
    }

    #[tokio::test]
    async fn read_failure_after_refresh_surfaces_receipt_unavailable() {
        let store = StubReceiptStore::refreshing(vec![Err(not_found())], Ok(()));
        let repository =
            ReceiptRepositoryImpl::new(store, StubVerifier::scripted(vec![]), config());
        assert!(matches!(
            repository.get_app_receipt().await,
            Err(StoreError::ReceiptUnavailable { .. }),
        ));
        assert_eq!(repository.receipt_store.read_count.load(Ordering::SeqCst), 2);
    }
}
