//! Store documents.

use serde::{Deserialize, Serialize};

use store_hub_core::{Coordinates, StoreId};

use crate::db::Record;

/// A store in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Generated when the caller leaves it blank.
    #[serde(default = "StoreId::generate")]
    pub id: StoreId,
    #[serde(default)]
    pub name: String,
    /// Running weighted mean of submitted ratings, always in `[0, 5]`.
    /// Never set directly; only the rating endpoint moves it.
    #[serde(default)]
    pub rating: f64,
    /// Number of ratings folded into `rating`.
    #[serde(default)]
    pub rating_counter: u64,
    #[serde(default)]
    pub location: Location,
    /// Unique across all stores.
    #[serde(default)]
    pub email: String,
    /// Username of the owning user; must exist at creation time.
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Base64 image payload, or empty for no image.
    #[serde(default)]
    pub image: String,
}

impl Record for Store {
    const COLLECTION: &'static str = "stores";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Embedded location owned by a [`Store`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub coordinates: Coordinates,
}

/// Sparse update for a [`Store`].
///
/// Rating fields are deliberately absent: ratings only move through the
/// rating endpoint. The owner is likewise fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub location: Option<LocationPatch>,
}

/// Sparse update for an embedded [`Location`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationPatch {
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub coordinates: Option<CoordinatesPatch>,
}

/// Sparse update for embedded [`Coordinates`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoordinatesPatch {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_id_gets_generated() {
        let store: Store = serde_json::from_value(json!({
            "name": "Corner Bakery",
            "ownerName": "alice"
        }))
        .unwrap();

        assert!(!store.id.as_str().is_empty());
        assert_eq!(store.rating_counter, 0);
        assert!((store.rating - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_camel_case() {
        let store: Store = serde_json::from_value(json!({"name": "Corner Bakery"})).unwrap();
        let value = serde_json::to_value(&store).unwrap();

        assert!(value.get("ratingCounter").is_some());
        assert!(value.get("ownerName").is_some());
        assert!(value["location"].get("zipCode").is_some());
        assert!(value["location"]["coordinates"].get("latitude").is_some());
    }

    #[test]
    fn test_patch_nested_coordinates() {
        let patch: StorePatch = serde_json::from_value(json!({
            "location": {"coordinates": {"latitude": 31.5}}
        }))
        .unwrap();

        let location = patch.location.unwrap();
        let coordinates = location.coordinates.unwrap();
        assert_eq!(coordinates.latitude, Some(31.5));
        assert!(coordinates.longitude.is_none());
        assert!(location.city.is_none());
    }
}
