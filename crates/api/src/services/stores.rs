//! Store directory: CRUD, geo queries, and the running rating.

use store_hub_core::{Coordinates, Rating, RatingAverage, StoreId, validate_base64_image};

use crate::db::{FieldPatch, Filter, RecordStore, StoreError};
use crate::models::{Store, StorePatch, User};

use super::{Result, ServiceError};

/// Service for the `stores` collection.
pub struct StoreService<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> StoreService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List every store.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the backend fails.
    pub async fn list(&self) -> Result<Vec<Store>> {
        Ok(self.store.find_all::<Store>().await?)
    }

    /// Fetch one store by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such store exists.
    pub async fn get(&self, id: &str) -> Result<Store> {
        self.store
            .find_by_id::<Store>(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("store", id))
    }

    /// Find stores whose name contains the needle, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the needle is blank.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Store>> {
        if name.trim().is_empty() {
            return Err(ServiceError::validation("store name cannot be empty"));
        }
        Ok(self
            .store
            .find_many::<Store>(&Filter::contains("name", name), None)
            .await?)
    }

    /// Create a store.
    ///
    /// The owner must name an existing user; the rating always starts at
    /// zero regardless of what the caller sent.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the owner is missing or
    /// the image is malformed, [`ServiceError::InvalidReference`] when the
    /// owner does not exist, and [`ServiceError::Conflict`] when the email
    /// is already used by another store.
    pub async fn create(&self, mut store: Store) -> Result<Store> {
        let Some(owner) = store.owner_name.as_deref().filter(|o| !o.trim().is_empty()) else {
            return Err(ServiceError::validation("store owner must be provided"));
        };
        if self.store.find_by_id::<User>(owner).await?.is_none() {
            return Err(ServiceError::invalid_reference(format!(
                "owner '{owner}' does not exist"
            )));
        }
        validate_base64_image(&store.image)
            .map_err(|err| ServiceError::validation(err.to_string()))?;

        if !store.email.trim().is_empty() {
            let taken = self
                .store
                .find_one::<Store>(&Filter::eq("email", store.email.as_str()))
                .await?;
            if taken.is_some() {
                return Err(ServiceError::conflict("store email already exists"));
            }
        }

        store.rating = 0.0;
        store.rating_counter = 0;
        if store.id.is_blank() {
            store.id = StoreId::generate();
        }

        match self.store.insert(&store).await {
            Ok(()) => Ok(store),
            Err(StoreError::DuplicateId(id)) => {
                Err(ServiceError::conflict(format!("store id '{id}' already exists")))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a sparse patch to a store.
    ///
    /// Rating and owner cannot be patched; ratings move through
    /// [`Self::apply_rating`] only.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the store does not exist,
    /// [`ServiceError::Validation`] for a malformed image,
    /// [`ServiceError::Conflict`] when the new email belongs to another
    /// store, and [`ServiceError::UpdateFailed`] when the store vanished
    /// between the existence check and the write.
    pub async fn update(&self, id: &str, patch: StorePatch) -> Result<Store> {
        let current = self.get(id).await?;

        let mut fields = FieldPatch::new();
        fields.set_text("name", patch.name.as_deref());

        if let Some(email) = patch.email.as_deref().filter(|e| !e.trim().is_empty()) {
            let holder = self
                .store
                .find_one::<Store>(&Filter::eq("email", email))
                .await?;
            if holder.is_some_and(|other| other.id.as_str() != id) {
                return Err(ServiceError::conflict("store email already exists"));
            }
            fields.set("email", email);
        }
        if let Some(image) = patch.image.as_deref().filter(|i| !i.trim().is_empty()) {
            validate_base64_image(image).map_err(|err| ServiceError::validation(err.to_string()))?;
            fields.set("image", image);
        }
        if let Some(location) = &patch.location {
            fields.set_text("location.address", location.address.as_deref());
            fields.set_text("location.city", location.city.as_deref());
            fields.set_text("location.zipCode", location.zip_code.as_deref());
            if let Some(coordinates) = &location.coordinates {
                fields.set_number("location.coordinates.latitude", coordinates.latitude);
                fields.set_number("location.coordinates.longitude", coordinates.longitude);
            }
        }

        if fields.is_empty() {
            return Ok(current);
        }

        let matched = self.store.update_fields::<Store>(id, &fields).await?;
        if matched == 0 {
            return Err(ServiceError::update_failed("store", id));
        }
        self.store
            .find_by_id::<Store>(id)
            .await?
            .ok_or_else(|| ServiceError::update_failed("store", id))
    }

    /// Delete a store. Its products are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such store exists.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.get(id).await?;
        self.store.delete_by_id::<Store>(id).await?;
        Ok(())
    }

    /// The `top` stores closest to an origin point, nearest first.
    ///
    /// Distance ties keep scan order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the backend fails.
    pub async fn closest(&self, origin: Coordinates, top: usize) -> Result<Vec<Store>> {
        let stores = self.store.find_all::<Store>().await?;
        let mut ranked: Vec<(f64, Store)> = stores
            .into_iter()
            .map(|store| (origin.distance_km(&store.location.coordinates), store))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(top);
        Ok(ranked.into_iter().map(|(_, store)| store).collect())
    }

    /// Every store owned by the named user.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the backend fails.
    pub async fn by_owner(&self, owner_name: &str) -> Result<Vec<Store>> {
        Ok(self
            .store
            .find_many::<Store>(&Filter::eq("ownerName", owner_name), None)
            .await?)
    }

    /// Every store in the named city, in scan order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the backend fails.
    pub async fn by_city(&self, city: &str) -> Result<Vec<Store>> {
        Ok(self
            .store
            .find_many::<Store>(&Filter::eq("location.city", city), None)
            .await?)
    }

    /// The `top` best-rated stores in a city, highest rating first.
    ///
    /// Rating ties keep scan order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the backend fails.
    pub async fn recommended(&self, city: &str, top: usize) -> Result<Vec<Store>> {
        let mut stores = self.by_city(city).await?;
        stores.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        stores.truncate(top);
        Ok(stores)
    }

    /// Fold one rating into the store's running weighted mean.
    ///
    /// Read-modify-write without a transaction; concurrent ratings on the
    /// same store can drop one submission.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the rating is outside
    /// `[0, 5]`, [`ServiceError::NotFound`] when the store does not exist,
    /// and [`ServiceError::UpdateFailed`] when the store vanished between
    /// the read and the write.
    pub async fn apply_rating(&self, id: &str, value: f64) -> Result<Store> {
        let rating = Rating::new(value).map_err(|err| ServiceError::validation(err.to_string()))?;
        let mut current = self.get(id).await?;

        let mut folded = RatingAverage::from_parts(current.rating, current.rating_counter);
        folded.fold(rating);

        let mut fields = FieldPatch::new();
        fields.set("rating", folded.average);
        fields.set("ratingCounter", folded.count);

        let matched = self.store.update_fields::<Store>(id, &fields).await?;
        if matched == 0 {
            return Err(ServiceError::update_failed("store", id));
        }

        current.rating = folded.average;
        current.rating_counter = folded.count;
        Ok(current)
    }
}
