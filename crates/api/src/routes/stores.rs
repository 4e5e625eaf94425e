//! Store routes: CRUD, geo queries, and ratings.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use store_hub_core::Coordinates;

use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{Store, StorePatch};
use crate::services::{ServiceError, StoreService};
use crate::state::AppState;

const DEFAULT_TOP: usize = 5;

/// Create the store routes router.
pub fn routes<S: RecordStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(list::<S>).post(create::<S>))
        .route("/search", get(search::<S>))
        .route("/closest", get(closest::<S>))
        .route("/city/{city}", get(by_city::<S>))
        .route("/recommended/{city}", get(recommended::<S>))
        .route("/owner/{owner_name}", get(by_owner::<S>))
        .route(
            "/{id}",
            get(show::<S>).put(update::<S>).delete(delete::<S>),
        )
        .route("/{id}/rating", axum::routing::put(rate::<S>))
}

async fn list<S: RecordStore>(State(state): State<AppState<S>>) -> Result<impl IntoResponse> {
    let stores = StoreService::new(state.store()).list().await?;
    Ok(Json(stores))
}

async fn create<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(store): Json<Store>,
) -> Result<impl IntoResponse> {
    let created = StoreService::new(state.store()).create(store).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Query string for the name search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

async fn search<S: RecordStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let found = StoreService::new(state.store())
        .search_by_name(&query.name)
        .await?;
    if found.is_empty() {
        return Err(ServiceError::not_found("store", query.name).into());
    }
    Ok(Json(found))
}

/// Query string for the closest-stores lookup.
#[derive(Debug, Deserialize)]
pub struct ClosestQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub top: Option<usize>,
}

async fn closest<S: RecordStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ClosestQuery>,
) -> Result<impl IntoResponse> {
    let origin = Coordinates::new(query.latitude, query.longitude);
    let stores = StoreService::new(state.store())
        .closest(origin, query.top.unwrap_or(DEFAULT_TOP))
        .await?;
    Ok(Json(stores))
}

async fn by_city<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(city): Path<String>,
) -> Result<impl IntoResponse> {
    let stores = StoreService::new(state.store()).by_city(&city).await?;
    Ok(Json(stores))
}

/// Query string for the city recommendation.
#[derive(Debug, Deserialize)]
pub struct RecommendedQuery {
    pub top: Option<usize>,
}

async fn recommended<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(city): Path<String>,
    Query(query): Query<RecommendedQuery>,
) -> Result<impl IntoResponse> {
    let stores = StoreService::new(state.store())
        .recommended(&city, query.top.unwrap_or(DEFAULT_TOP))
        .await?;
    Ok(Json(stores))
}

async fn by_owner<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(owner_name): Path<String>,
) -> Result<impl IntoResponse> {
    let stores = StoreService::new(state.store()).by_owner(&owner_name).await?;
    if stores.is_empty() {
        return Err(ServiceError::not_found("store", owner_name).into());
    }
    Ok(Json(stores))
}

async fn show<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let store = StoreService::new(state.store()).get(&id).await?;
    Ok(Json(store))
}

async fn update<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(patch): Json<StorePatch>,
) -> Result<impl IntoResponse> {
    let updated = StoreService::new(state.store()).update(&id, patch).await?;
    Ok(Json(updated))
}

async fn delete<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    StoreService::new(state.store()).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Query string for a rating submission.
#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub rating: f64,
}

async fn rate<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Query(query): Query<RatingQuery>,
) -> Result<impl IntoResponse> {
    let updated = StoreService::new(state.store())
        .apply_rating(&id, query.rating)
        .await?;
    Ok(Json(updated))
}
