// Integration tests for the HTTP surface
// Every request goes through the full route table against a temporary SQLite store

use jsonwebtoken::{encode, EncodingKey, Header};
use rusty_stock::auth::{hash_password, Claims, TokenManager};
use rusty_stock::config::ServerConfig;
use rusty_stock::handlers::token::TokenResponse;
use rusty_stock::routes;
use rusty_stock::state::AppState;
use rusty_stock::storage::{Database, InventoryItem};
use serde_json::Value;
use tempfile::TempDir;
use warp::http::StatusCode;

const TEST_JWT_SECRET: &str = "api-tests-signing-key-7c41e2b9d05f8a36";

// Goes through the same validation as a real deployment
fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|key| match key {
        "RUSTY_STOCK_JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

struct TestApp {
    _dir: TempDir,
    state: AppState,
}

async fn seeded_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("api.db").display());
    let db = Database::connect(&url, 2).await.unwrap();
    db.initialize().await.unwrap();

    db.create_user("testuser", &hash_password("testpassword").unwrap())
        .await
        .unwrap();
    db.add_item("Widget", 100).await.unwrap();
    db.add_item("Gadget", 50).await.unwrap();

    let state = AppState::from_config(db, &test_config());
    TestApp { _dir: dir, state }
}

async fn post_token(app: &TestApp, body: &str) -> warp::http::Response<warp::hyper::body::Bytes> {
    warp::test::request()
        .method("POST")
        .path("/token")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body.to_string())
        .reply(&routes::api(app.state.clone()))
        .await
}

async fn get_inv(app: &TestApp, auth: Option<&str>) -> warp::http::Response<warp::hyper::body::Bytes> {
    let mut request = warp::test::request().method("GET").path("/inv");
    if let Some(value) = auth {
        request = request.header("authorization", value);
    }
    request.reply(&routes::api(app.state.clone())).await
}

async fn login(app: &TestApp) -> String {
    let response = post_token(app, "username=testuser&password=testpassword").await;
    assert_eq!(response.status(), StatusCode::OK);
    let token: TokenResponse = serde_json::from_slice(response.body()).unwrap();
    token.access_token
}

fn assert_bearer_challenge(response: &warp::http::Response<warp::hyper::body::Bytes>) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["www-authenticate"], "Bearer");
}

#[tokio::test]
async fn test_token_exchange_succeeds() {
    let app = seeded_app().await;
    let response = post_token(&app, "username=testuser&password=testpassword").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(body["access_token"].as_str().map_or(false, |t| !t.is_empty()));
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn test_token_exchange_ignores_oauth_form_extras() {
    let app = seeded_app().await;
    let response = post_token(
        &app,
        "grant_type=password&username=testuser&password=testpassword&scope=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_inventory_with_token() {
    let app = seeded_app().await;
    let token = login(&app).await;

    let response = get_inv(&app, Some(&format!("Bearer {}", token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let items: Vec<InventoryItem> = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(items.len(), 2);
    let names: Vec<&str> = items.iter().map(|i| i.item_name.as_str()).collect();
    assert!(names.contains(&"Widget"));
    assert!(names.contains(&"Gadget"));

    let widget = items.iter().find(|i| i.item_name == "Widget").unwrap();
    assert_eq!(widget.quantity, 100);
}

#[tokio::test]
async fn test_inventory_without_header_is_unauthorized() {
    let app = seeded_app().await;
    let response = get_inv(&app, None).await;
    assert_bearer_challenge(&response);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = seeded_app().await;
    let response = post_token(&app, "username=testuser&password=wrongpassword").await;

    assert_bearer_challenge(&response);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(body.get("access_token").is_none());
}

#[tokio::test]
async fn test_unknown_user_looks_like_wrong_password() {
    let app = seeded_app().await;
    let wrong_password = post_token(&app, "username=testuser&password=wrongpassword").await;
    let unknown_user = post_token(&app, "username=ghost&password=testpassword").await;

    assert_bearer_challenge(&unknown_user);
    assert_eq!(wrong_password.body(), unknown_user.body());
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let app = seeded_app().await;
    let token = login(&app).await;

    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let mut sig: Vec<char> = signature.chars().collect();
    sig[3] = if sig[3] == 'x' { 'y' } else { 'x' };
    let tampered = format!("{}.{}", unsigned, sig.into_iter().collect::<String>());

    let response = get_inv(&app, Some(&format!("Bearer {}", tampered))).await;
    assert_bearer_challenge(&response);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = seeded_app().await;
    let issued_at = chrono::Utc::now().timestamp() - 3600;
    let expired = encode(
        &Header::default(),
        &Claims::new("testuser", issued_at, 60),
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let response = get_inv(&app, Some(&format!("Bearer {}", expired))).await;
    assert_bearer_challenge(&response);
}

#[tokio::test]
async fn test_token_for_missing_user_is_unauthorized() {
    let app = seeded_app().await;
    let token = TokenManager::from_config(&test_config())
        .issue("deleted-user")
        .unwrap();

    let response = get_inv(&app, Some(&format!("Bearer {}", token))).await;
    assert_bearer_challenge(&response);
}

#[tokio::test]
async fn test_auth_failures_are_indistinguishable() {
    let app = seeded_app().await;
    let token = login(&app).await;

    let missing = get_inv(&app, None).await;
    let wrong_scheme = get_inv(&app, Some(&format!("Basic {}", token))).await;
    let garbage = get_inv(&app, Some("Bearer not.a.token")).await;

    for response in [&wrong_scheme, &garbage] {
        assert_bearer_challenge(response);
        assert_eq!(response.body(), missing.body());
    }
}

#[tokio::test]
async fn test_missing_form_field_is_rejected() {
    let app = seeded_app().await;
    let response = post_token(&app, "username=testuser").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = seeded_app().await;
    let response = warp::test::request()
        .method("GET")
        .path("/token")
        .reply(&routes::api(app.state.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_has_security_headers() {
    let app = seeded_app().await;
    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes::api(app.state.clone()))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"OK");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["cache-control"], "no-store");
}
