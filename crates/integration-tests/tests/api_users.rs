//! End-to-end tests for the user endpoints.

use axum::http::StatusCode;
use serde_json::json;

use store_hub_integration_tests::{delete, get, post, put, test_app};

fn alice() -> serde_json::Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "passwordHash": "hash-1",
        "phone": "0590000001",
        "profile": {"firstName": "Alice", "lastName": "Hassan"}
    })
}

#[tokio::test]
async fn test_signup_returns_201_without_password() {
    let app = test_app();

    let (status, body) = post(&app, "/api/users", alice()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], json!("alice"));
    assert!(body.get("passwordHash").is_none());
    assert_eq!(body["roles"], json!(["user"]));
}

#[tokio::test]
async fn test_signup_duplicate_username_is_409() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;

    let mut second = alice();
    second["email"] = json!("other@example.com");
    let (status, body) = post(&app, "/api/users", second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("username"));

    // The original user is untouched.
    let (status, list) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_is_409() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;

    let mut second = alice();
    second["username"] = json!("bob");
    let (status, body) = post(&app, "/api/users", second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_signup_malformed_email_is_400() {
    let app = test_app();

    let mut bad = alice();
    bad["email"] = json!("not-an-email");
    let (status, _) = post(&app, "/api/users", bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_user_is_404() {
    let app = test_app();

    let (status, _) = get(&app, "/api/users/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_skips_blank_fields_and_patches_nested() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;

    let (status, body) = put(
        &app,
        "/api/users/alice",
        json!({
            "phone": "   ",
            "profile": {"bio": "baker", "lastName": ""}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["bio"], json!("baker"));
    // Blank values never overwrite.
    assert_eq!(body["profile"]["lastName"], json!("Hassan"));
    assert_eq!(body["phone"], json!("0590000001"));
}

#[tokio::test]
async fn test_update_with_empty_patch_returns_current_user() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;

    let (status, body) = put(&app, "/api/users/alice", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], json!("alice"));
}

#[tokio::test]
async fn test_update_email_taken_by_other_user_is_409() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;
    let mut bob = alice();
    bob["username"] = json!("bob");
    bob["email"] = json!("bob@example.com");
    post(&app, "/api/users", bob).await;

    let (status, _) = put(
        &app,
        "/api/users/bob",
        json!({"email": "alice@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_returns_profile() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;

    let (status, body) = delete(&app, "/api/users/alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], json!("Alice"));

    let (status, _) = get(&app, "/api/users/alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_success_stamps_last_login() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;

    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "hash-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["lastLogin"].is_null());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let app = test_app();
    post(&app, "/api/users", alice()).await;

    let (status, _) = post(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_blank_credentials_is_400() {
    let app = test_app();

    let (status, _) = post(
        &app,
        "/api/auth/login",
        json!({"username": "", "password": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
