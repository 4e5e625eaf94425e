//! Product routes: CRUD and the store-scoped search.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{Product, ProductPatch};
use crate::services::{ProductQuery, ProductService};
use crate::state::AppState;

/// Create the product routes router.
pub fn routes<S: RecordStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/", post(create::<S>))
        .route("/search", get(search::<S>))
        .route("/store/{store_id}", get(by_store::<S>))
        .route(
            "/{id}",
            get(show::<S>).put(update::<S>).delete(delete::<S>),
        )
}

async fn create<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(product): Json<Product>,
) -> Result<impl IntoResponse> {
    let created = ProductService::new(state.store()).create(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Query string for the product search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub store_id: String,
    pub product_name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: Option<String>,
}

async fn search<S: RecordStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let query = ProductQuery {
        store_id: query.store_id,
        name: query.product_name,
        min_price: query.min_price,
        max_price: query.max_price,
        sort_by: query.sort_by,
    };
    let found = ProductService::new(state.store()).search(&query).await?;
    Ok(Json(found))
}

async fn by_store<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(store_id): Path<String>,
) -> Result<impl IntoResponse> {
    let products = ProductService::new(state.store()).by_store(&store_id).await?;
    Ok(Json(products))
}

async fn show<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = ProductService::new(state.store()).get(&id).await?;
    Ok(Json(product))
}

async fn update<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<impl IntoResponse> {
    let updated = ProductService::new(state.store()).update(&id, patch).await?;
    Ok(Json(updated))
}

async fn delete<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    ProductService::new(state.store()).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
