use serde::Serialize;

/// Request body posted to the `verifyReceipt` endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
#[derive(Debug, Serialize)]
pub(crate) struct VerifyReceiptRequestModel {
    /// Base64-encoded receipt blob (standard alphabet, no line wrapping).
    #[serde(rename = "receipt-data")]
    pub(crate) receipt_data: String,
    /// The app's shared secret.
    pub(crate) password: String,
}
