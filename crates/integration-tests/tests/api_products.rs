//! End-to-end tests for the product endpoints.

use axum::http::StatusCode;
use serde_json::{Value, json};

use store_hub_integration_tests::{delete, get, post, put, test_app};

fn product(store_id: &str, name: &str, price: Option<f64>) -> Value {
    json!({
        "storeId": store_id,
        "productName": name,
        "description": format!("{name} description"),
        "price": price
    })
}

async fn seed_catalog(app: &axum::Router) {
    for (name, price) in [
        ("Olive Oil", Some(10.0)),
        ("Bread", Some(5.0)),
        ("Honey", Some(20.0)),
        ("Sample", None),
    ] {
        let (status, _) = post(app, "/api/products", product("s-1", name, price)).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    post(app, "/api/products", product("s-2", "Olives", Some(8.0))).await;
}

#[tokio::test]
async fn test_create_and_fetch_product() {
    let app = test_app();

    let (status, created) = post(&app, "/api/products", product("s-1", "Bread", Some(3.5))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = get(&app, &format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["productName"], json!("Bread"));
    assert_eq!(fetched["price"], json!(3.5));
}

#[tokio::test]
async fn test_create_negative_price_is_400() {
    let app = test_app();

    let (status, _) = post(&app, "/api/products", product("s-1", "Bread", Some(-1.0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_listing_scopes_by_store() {
    let app = test_app();
    seed_catalog(&app).await;

    let (status, found) = get(&app, "/api/products/store/s-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 4);

    // Unknown store yields an empty list, not an error.
    let (status, found) = get(&app, "/api/products/store/ghost").await;
    assert_eq!(status, StatusCode::OK);
    assert!(found.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_descending_price_sort() {
    let app = test_app();
    seed_catalog(&app).await;

    let (status, found) = get(
        &app,
        "/api/products/search?storeId=s-1&minPrice=0&sortBy=-price",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let prices: Vec<f64> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![20.0, 10.0, 5.0]);
}

#[tokio::test]
async fn test_search_bounds_are_inclusive_and_skip_unpriced() {
    let app = test_app();
    seed_catalog(&app).await;

    let (status, found) = get(
        &app,
        "/api/products/search?storeId=s-1&minPrice=5&maxPrice=10",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["productName"].as_str().unwrap())
        .collect();
    // Default sort is productName ascending.
    assert_eq!(names, vec!["Bread", "Olive Oil"]);
}

#[tokio::test]
async fn test_search_name_filter_is_case_insensitive() {
    let app = test_app();
    seed_catalog(&app).await;

    let (status, found) = get(
        &app,
        "/api/products/search?storeId=s-1&productName=OLIVE",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_unknown_sort_key_is_400() {
    let app = test_app();
    seed_catalog(&app).await;

    let (status, _) = get(&app, "/api/products/search?storeId=s-1&sortBy=-secret").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_without_store_id_is_400() {
    let app = test_app();

    let (status, _) = get(&app, "/api/products/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_writes_zero_price_but_skips_blank_text() {
    let app = test_app();
    let (_, created) = post(&app, "/api/products", product("s-1", "Bread", Some(5.0))).await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = put(
        &app,
        &format!("/api/products/{id}"),
        json!({"price": 0.0, "productName": "   "}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], json!(0.0));
    assert_eq!(updated["productName"], json!("Bread"));
}

#[tokio::test]
async fn test_delete_returns_204() {
    let app = test_app();
    let (_, created) = post(&app, "/api/products", product("s-1", "Bread", None)).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = delete(&app, &format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
