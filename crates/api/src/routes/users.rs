//! User routes: registration, lookup, update, deletion, and login.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{User, UserPatch};
use crate::services::UserService;
use crate::state::AppState;

/// Create the user routes router.
pub fn routes<S: RecordStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(list::<S>).post(signup::<S>))
        .route(
            "/{username}",
            get(show::<S>).put(update::<S>).delete(delete::<S>),
        )
}

/// Create the auth routes router.
pub fn auth_routes<S: RecordStore + 'static>() -> Router<AppState<S>> {
    Router::new().route("/login", post(login::<S>))
}

async fn list<S: RecordStore>(State(state): State<AppState<S>>) -> Result<impl IntoResponse> {
    let users = UserService::new(state.store()).list().await?;
    Ok(Json(users))
}

async fn signup<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(user): Json<User>,
) -> Result<impl IntoResponse> {
    let created = UserService::new(state.store()).signup(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn show<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let user = UserService::new(state.store()).get(&username).await?;
    Ok(Json(user))
}

async fn update<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<impl IntoResponse> {
    let updated = UserService::new(state.store())
        .update(&username, patch)
        .await?;
    Ok(Json(updated))
}

async fn delete<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let profile = UserService::new(state.store()).delete(&username).await?;
    Ok(Json(profile))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

async fn login<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = UserService::new(state.store())
        .login(&body.username, &body.password)
        .await?;
    Ok(Json(user))
}
