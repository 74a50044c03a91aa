use super::iap_product_id::IapProductId;

/// One in-app purchase recorded in a verified receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InAppPurchase {
    pub product_id: IapProductId,
}

/// Decoded result of a successful receipt verification. Read-only value;
/// produced once per verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppReceipt {
    pub original_application_version: String,
    pub application_version: String,
    pub in_app: Vec<InAppPurchase>,
}
