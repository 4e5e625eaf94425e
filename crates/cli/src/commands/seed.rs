//! Seed the database with demo data.
//!
//! Inserts a couple of users, their stores, and a handful of products so a
//! fresh environment has something to browse. Existing documents with the
//! same ids make the run fail; seed into an empty database.

use serde_json::json;
use tracing::info;

use store_hub_api::db::{self, PgStore, RecordStore};
use store_hub_api::models::{Product, Store, User};

/// Insert the demo documents.
///
/// # Errors
///
/// Returns an error if the database URL is missing, a document fails to
/// deserialize, or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let store = PgStore::new(pool);

    info!("Seeding users...");
    for doc in demo_users() {
        let user: User = serde_json::from_value(doc)?;
        store.insert(&user).await?;
    }

    info!("Seeding stores...");
    for doc in demo_stores() {
        let shop: Store = serde_json::from_value(doc)?;
        store.insert(&shop).await?;
    }

    info!("Seeding products...");
    for doc in demo_products() {
        let product: Product = serde_json::from_value(doc)?;
        store.insert(&product).await?;
    }

    info!("Seeding complete!");
    Ok(())
}

fn demo_users() -> Vec<serde_json::Value> {
    vec![
        json!({
            "username": "alice",
            "email": "alice@example.com",
            "passwordHash": "demo-only",
            "phone": "0590000001",
            "profile": {"firstName": "Alice", "lastName": "Hassan", "location": "Gaza"}
        }),
        json!({
            "username": "bob",
            "email": "bob@example.com",
            "passwordHash": "demo-only",
            "phone": "0590000002",
            "profile": {"firstName": "Bob", "lastName": "Salem", "location": "Rafah"}
        }),
    ]
}

fn demo_stores() -> Vec<serde_json::Value> {
    vec![
        json!({
            "id": "store-bakery",
            "name": "Corner Bakery",
            "email": "bakery@example.com",
            "ownerName": "alice",
            "location": {
                "address": "1 Main St",
                "city": "Gaza",
                "zipCode": "100",
                "coordinates": {"latitude": 31.5017, "longitude": 34.4668}
            }
        }),
        json!({
            "id": "store-market",
            "name": "Fish Market",
            "email": "market@example.com",
            "ownerName": "bob",
            "location": {
                "address": "7 Harbor Rd",
                "city": "Rafah",
                "zipCode": "200",
                "coordinates": {"latitude": 31.2968, "longitude": 34.2435}
            }
        }),
    ]
}

fn demo_products() -> Vec<serde_json::Value> {
    vec![
        json!({
            "id": "product-bread",
            "storeId": "store-bakery",
            "productName": "Sourdough Bread",
            "description": "Baked every morning",
            "price": 3.5
        }),
        json!({
            "id": "product-knafeh",
            "storeId": "store-bakery",
            "productName": "Knafeh",
            "description": "By the tray",
            "price": 12.0
        }),
        json!({
            "id": "product-sardines",
            "storeId": "store-market",
            "productName": "Sardines",
            "description": "Fresh catch, per kilo",
            "price": 8.0
        }),
    ]
}
