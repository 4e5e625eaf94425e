//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Users
//! GET    /api/users                      - List users
//! POST   /api/users                      - Register a user (201)
//! GET    /api/users/{username}           - User detail
//! PUT    /api/users/{username}           - Partial update
//! DELETE /api/users/{username}           - Delete, returns the profile
//! POST   /api/auth/login                 - Login, stamps lastLogin
//!
//! # Stores
//! GET    /api/stores                     - List stores
//! POST   /api/stores                     - Create a store (201)
//! GET    /api/stores/search?name=        - Name substring search
//! GET    /api/stores/closest?latitude=&longitude=&top= - Nearest stores
//! GET    /api/stores/city/{city}         - Stores in a city
//! GET    /api/stores/recommended/{city}?top= - Best rated in a city
//! GET    /api/stores/owner/{ownerName}   - Stores owned by a user
//! GET    /api/stores/{id}                - Store detail
//! PUT    /api/stores/{id}                - Partial update
//! DELETE /api/stores/{id}                - Delete (204)
//! PUT    /api/stores/{id}/rating?rating= - Fold in one rating
//!
//! # Products
//! POST   /api/products                   - Create a product (201)
//! GET    /api/products/search?storeId=&productName=&minPrice=&maxPrice=&sortBy=
//! GET    /api/products/store/{storeId}   - Products of a store
//! GET    /api/products/{id}              - Product detail
//! PUT    /api/products/{id}              - Partial update
//! DELETE /api/products/{id}              - Delete (204)
//! ```

pub mod products;
pub mod stores;
pub mod users;

use axum::Router;

use crate::db::RecordStore;
use crate::state::AppState;

/// Assemble every API route under `/api`.
pub fn routes<S: RecordStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .nest("/api/users", users::routes())
        .nest("/api/auth", users::auth_routes())
        .nest("/api/stores", stores::routes())
        .nest("/api/products", products::routes())
}
