//! Product documents.
//!
//! Products are weakly associated to a store by id only: the store id is
//! not checked at creation, and deleting a store leaves its products in
//! place.

use serde::{Deserialize, Serialize};

use store_hub_core::ProductId;

use crate::db::Record;

/// A product in a store's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Generated when the caller leaves it blank.
    #[serde(default = "ProductId::generate")]
    pub id: ProductId,
    /// Owning store's id; not checked for existence at creation.
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    /// Non-negative when present; `null` means no listed price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Base64 image payload, or empty for no image.
    #[serde(default)]
    pub image: String,
}

impl Record for Product {
    const COLLECTION: &'static str = "products";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Sparse update for a [`Product`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
}
