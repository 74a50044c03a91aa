use std::time::Duration;

use crate::constants::{PRODUCTION_VERIFY_URL, SANDBOX_VERIFY_URL};

/// Configuration injected into [`crate::manager::IapManager`].
///
/// Everything the library needs from its environment is carried here
/// explicitly; nothing is read from ambient global state.
#[derive(Debug, Clone)]
pub struct IapConfig {
    /// Shared secret sent as the `password` field of verification requests.
    pub shared_secret: String,
    /// Production receipt-verification endpoint.
    pub production_verify_url: String,
    /// Sandbox receipt-verification endpoint.
    pub sandbox_verify_url: String,
    /// Upper bound on how long a single platform interaction (purchase,
    /// restore, receipt fetch) may stay pending. Store flows include user
    /// interaction, so the default is generous.
    pub operation_timeout: Duration,
}

impl IapConfig {
    pub fn new(shared_secret: impl Into<String>) -> Self {
        Self {
            shared_secret: shared_secret.into(),
            production_verify_url: PRODUCTION_VERIFY_URL.to_owned(),
            sandbox_verify_url: SANDBOX_VERIFY_URL.to_owned(),
            operation_timeout: Duration::from_secs(300),
        }
    }
}
