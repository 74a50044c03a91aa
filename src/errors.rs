use thiserror::Error;

/// Error taxonomy for storefront operations.
///
/// Variants are `Clone` because a terminal error is both returned to the
/// caller and recorded in the published purchase-state map. Platform and
/// transport causes arrive through the datasource ports as opaque messages,
/// so they are carried as strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The platform reports that this user cannot make payments.
    #[error("not authorized for payment")]
    NotAuthorizedForPayment,

    /// The product lookup reported the identifier as unknown or invalid.
    #[error("invalid product identifier: {product_id}")]
    InvalidIdentifier { product_id: String },

    /// The payment queue reported the purchase transaction as failed.
    #[error("transaction failed: {message}")]
    TransactionFailed { message: String },

    /// A platform request or HTTP callout failed at the transport level.
    #[error("request failed: {message}")]
    RequestFailed { message: String },

    /// No local receipt was present and the refresh request did not
    /// produce one.
    #[error("receipt unavailable: {message}")]
    ReceiptUnavailable { message: String },

    /// The verification backend reported status 21007: the receipt was
    /// generated in the other environment. Internal sentinel, absorbed by
    /// the endpoint-retry loop and never surfaced to callers.
    #[error("receipt was generated for a different environment")]
    EnvironmentMismatch,

    /// The verification backend rejected the receipt with a non-zero,
    /// non-environment status code.
    #[error("receipt verification returned status {status}")]
    VerificationFailed { status: i64 },

    /// The verification response could not be decoded.
    #[error("malformed verification response: {message}")]
    MalformedResponse { message: String },

    /// The verification response carried no body at all.
    #[error("empty verification response")]
    EmptyResponse,

    /// Every known verification environment reported an environment
    /// mismatch for the same receipt.
    #[error("no verification environment accepted the receipt")]
    NoValidEnvironment,

    /// A platform interaction did not reach a terminal state in time.
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}
