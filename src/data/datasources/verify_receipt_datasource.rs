use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::CACHE_CONTROL;
use tracing::{debug, error};

use crate::{
    constants::STATUS_ENVIRONMENT_MISMATCH,
    data::models::{
        verify_receipt_request_model::VerifyReceiptRequestModel,
        verify_receipt_response_model::VerifyReceiptResponseModel,
    },
    domain::entities::app_receipt::AppReceipt,
    errors::StoreError,
};

/// Posts a receipt blob to one verification endpoint and decodes the
/// outcome. Environment selection and retry live in the receipt
/// repository; this datasource reports a mismatch as
/// [`StoreError::EnvironmentMismatch`] and does nothing else about it.
#[async_trait]
pub(crate) trait VerifyReceiptDatasource: Send + Sync {
    async fn verify(&self, receipt: &[u8], url: &str) -> Result<AppReceipt, StoreError>;
}

pub struct VerifyReceiptDatasourceImpl {
    client: reqwest::Client,
    shared_secret: String,
}

impl VerifyReceiptDatasourceImpl {
    pub(crate) fn new(shared_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            shared_secret,
        }
    }
}

#[async_trait]
impl VerifyReceiptDatasource for VerifyReceiptDatasourceImpl {
    async fn verify(&self, receipt: &[u8], url: &str) -> Result<AppReceipt, StoreError> {
        let body = VerifyReceiptRequestModel {
            receipt_data: STANDARD.encode(receipt),
            password: self.shared_secret.clone(),
        };
        let response = self
            .client
            .post(url)
            .header(CACHE_CONTROL, "no-cache")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Receipt verification callout failed to send: {e}");
                StoreError::RequestFailed {
                    message: e.to_string(),
                }
            })?;

        if !response.status().is_success() {
            return Err(StoreError::RequestFailed {
                message: format!(
                    "verification endpoint returned {}",
                    response.status()
                ),
            });
        }

        let bytes = response.bytes().await.map_err(|e| StoreError::RequestFailed {
            message: e.to_string(),
        })?;
        debug!("Received verification response ({} bytes)", bytes.len());
        parse_response(&bytes)
    }
}

/// Decodes a verification response body into an [`AppReceipt`].
pub(crate) fn parse_response(body: &[u8]) -> Result<AppReceipt, StoreError> {
    if body.is_empty() {
        return Err(StoreError::EmptyResponse);
    }
    let model: VerifyReceiptResponseModel =
        serde_json::from_slice(body).map_err(|e| StoreError::MalformedResponse {
            message: e.to_string(),
        })?;
    if model.status == STATUS_ENVIRONMENT_MISMATCH {
        return Err(StoreError::EnvironmentMismatch);
    }
    if model.status != 0 {
        return Err(StoreError::VerificationFailed {
            status: model.status,
        });
    }
    let receipt = model.receipt.ok_or_else(|| StoreError::MalformedResponse {
        message: "response is missing the receipt field".to_owned(),
    })?;
    Ok(receipt.into())
}
