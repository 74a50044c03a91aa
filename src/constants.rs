pub(crate) const PRODUCTION_VERIFY_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
pub(crate) const SANDBOX_VERIFY_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

/// Backend status code meaning the receipt belongs to the other
/// verification environment.
pub(crate) const STATUS_ENVIRONMENT_MISMATCH: i64 = 21007;
