use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::{domain::entities::iap_product_id::IapProductId, errors::StoreError};

/// Catalog record for a purchasable product. Only the identifier is needed
/// to enqueue a payment; pricing and localization stay on the platform side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreProduct {
    pub product_id: IapProductId,
}

/// Result of a product catalog lookup.
#[derive(Debug, Clone)]
pub struct ProductLookupResponse {
    pub products: Vec<StoreProduct>,
    /// Requested identifiers the catalog does not recognize.
    pub invalid_identifiers: Vec<IapProductId>,
}

/// Port onto the platform product catalog, implemented by the embedding
/// application.
#[async_trait]
pub trait ProductLookupDatasource: Send + Sync {
    /// Resolves the given identifiers against the catalog. A transport
    /// failure is reported as `Err`; unknown identifiers come back in
    /// `invalid_identifiers`.
    async fn lookup(
        &self,
        identifiers: &BTreeSet<IapProductId>,
    ) -> Result<ProductLookupResponse, StoreError>;
}
