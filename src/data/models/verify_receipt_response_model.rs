use serde::Deserialize;

use crate::domain::entities::{
    app_receipt::{AppReceipt, InAppPurchase},
    iap_product_id::IapProductId,
};

/// Response body returned by the `verifyReceipt` endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody
#[derive(Debug, Deserialize)]
pub(crate) struct VerifyReceiptResponseModel {
    /// `0` on success; `21007` when the receipt belongs to the sandbox
    /// environment; other non-zero values are application-level failures.
    pub(crate) status: i64,
    /// Decoded receipt, present when `status` is `0`.
    pub(crate) receipt: Option<AppReceiptModel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppReceiptModel {
    pub(crate) original_application_version: String,
    pub(crate) application_version: String,
    #[serde(default)]
    pub(crate) in_app: Vec<InAppPurchaseModel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InAppPurchaseModel {
    pub(crate) product_id: String,
}

impl From<AppReceiptModel> for AppReceipt {
    fn from(model: AppReceiptModel) -> Self {
        Self {
            original_application_version: model.original_application_version,
            application_version: model.application_version,
            in_app: model
                .in_app
                .into_iter()
                .map(|purchase| InAppPurchase {
                    product_id: IapProductId(purchase.product_id),
                })
                .collect(),
        }
    }
}
