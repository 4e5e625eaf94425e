//! Product catalog: CRUD plus the filtered, sorted search.

use store_hub_core::{ProductId, validate_base64_image};

use crate::db::{FieldPatch, Filter, RecordStore, Sort, StoreError};
use crate::models::{Product, ProductPatch};

use super::{Result, ServiceError};

/// Fields a product search may sort on.
const SORT_FIELDS: &[&str] = &["id", "storeId", "productName", "description", "price"];

/// Parameters for a product search within one store.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Store to search in; required.
    pub store_id: String,
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Sort key, `-` prefix for descending. Defaults to `productName`.
    pub sort_by: Option<String>,
}

/// Service for the `products` collection.
pub struct ProductService<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> ProductService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such product exists.
    pub async fn get(&self, id: &str) -> Result<Product> {
        self.store
            .find_by_id::<Product>(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    /// Every product belonging to a store, in scan order.
    ///
    /// An unknown store id yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the backend fails.
    pub async fn by_store(&self, store_id: &str) -> Result<Vec<Product>> {
        Ok(self
            .store
            .find_many::<Product>(&Filter::eq("storeId", store_id), None)
            .await?)
    }

    /// Create a product.
    ///
    /// The store id is recorded as given and not checked for existence.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for a malformed image or a
    /// negative price.
    pub async fn create(&self, mut product: Product) -> Result<Product> {
        validate_base64_image(&product.image)
            .map_err(|err| ServiceError::validation(err.to_string()))?;
        if product.price.is_some_and(|p| p < 0.0 || p.is_nan()) {
            return Err(ServiceError::validation("price cannot be negative"));
        }
        if product.id.is_blank() {
            product.id = ProductId::generate();
        }

        match self.store.insert(&product).await {
            Ok(()) => Ok(product),
            Err(StoreError::DuplicateId(id)) => Err(ServiceError::conflict(format!(
                "product id '{id}' already exists"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a sparse patch to a product.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the product does not exist,
    /// [`ServiceError::Validation`] for a malformed image or negative
    /// price, and [`ServiceError::UpdateFailed`] when the product vanished
    /// between the existence check and the write.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        let current = self.get(id).await?;

        let mut fields = FieldPatch::new();
        fields.set_text("productName", patch.product_name.as_deref());
        fields.set_text("description", patch.description.as_deref());
        if let Some(price) = patch.price {
            if price < 0.0 || price.is_nan() {
                return Err(ServiceError::validation("price cannot be negative"));
            }
            fields.set_number("price", Some(price));
        }
        if let Some(image) = patch.image.as_deref().filter(|i| !i.trim().is_empty()) {
            validate_base64_image(image).map_err(|err| ServiceError::validation(err.to_string()))?;
            fields.set("image", image);
        }

        if fields.is_empty() {
            return Ok(current);
        }

        let matched = self.store.update_fields::<Product>(id, &fields).await?;
        if matched == 0 {
            return Err(ServiceError::update_failed("product", id));
        }
        self.store
            .find_by_id::<Product>(id)
            .await?
            .ok_or_else(|| ServiceError::update_failed("product", id))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such product exists.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.get(id).await?;
        self.store.delete_by_id::<Product>(id).await?;
        Ok(())
    }

    /// Search a store's products with optional name and price filters.
    ///
    /// Products without a price never match a price bound. Equal sort keys
    /// keep their scan order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the store id is blank or
    /// the sort key names no sortable field.
    pub async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        if query.store_id.trim().is_empty() {
            return Err(ServiceError::validation("store id must be provided"));
        }

        let key = query.sort_by.as_deref().unwrap_or("productName");
        let sort = Sort::parse(key, SORT_FIELDS)
            .map_err(|err| ServiceError::validation(err.to_string()))?;

        let mut filters = vec![Filter::eq("storeId", query.store_id.as_str())];
        if let Some(name) = query.name.as_deref().filter(|n| !n.trim().is_empty()) {
            filters.push(Filter::contains("productName", name));
        }
        if let Some(min) = query.min_price {
            filters.push(Filter::gte("price", min));
        }
        if let Some(max) = query.max_price {
            filters.push(Filter::lte("price", max));
        }

        Ok(self
            .store
            .find_many::<Product>(&Filter::and(filters), Some(&sort))
            .await?)
    }
}
