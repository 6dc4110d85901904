//! HTTP-level tests over the in-process store.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_service_lib::infra::{MemoryStore, UnitOfWork};
use catalog_service_lib::service::{seed_admin, JwtTokens, Services};
use common::{AdminSeedConfig, JwtConfig};
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;

const SECRET: &str = "api-test-secret-key-at-least-32-chars!!";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestApp {
    router: Router,
    store: MemoryStore,
}

async fn app() -> TestApp {
    let store = MemoryStore::new();
    let uow: Arc<dyn UnitOfWork> = Arc::new(store.clone());
    let tokens = Arc::new(
        JwtTokens::new(&JwtConfig {
            secret: SECRET.to_string(),
            ..Default::default()
        })
        .unwrap(),
    );

    seed_admin(
        uow.clone(),
        &AdminSeedConfig {
            email: ADMIN_EMAIL.to_string(),
            username: "admin".to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
    )
    .await
    .unwrap();

    let services = Services::new(uow, tokens);
    let router = create_router(AppState::new(&services), Duration::from_secs(5));
    TestApp { router, store }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn attempt_login(app: &TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let (status, body) = attempt_login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

async fn register(app: &TestApp, email: &str, username: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": email, "username": username, "password": "password-123" })),
    )
    .await
}

#[tokio::test]
async fn test_health_reports_storage() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    app.store.set_available(false);
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_register_and_me() {
    let app = app().await;

    let (status, body) = register(&app, "a@x.com", "a").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "a");
    assert!(body.get("password_hash").is_none());

    let (status, body) = register(&app, "a@x.com", "b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let token = login(&app, "a@x.com", "password-123").await;
    let (status, body) = send(&app, Method::GET, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = app().await;
    register(&app, "a@x.com", "a").await;

    let (wrong_status, wrong_body) = attempt_login(&app, "a@x.com", "password-124").await;
    let (unknown_status, unknown_body) = attempt_login(&app, "z@x.com", "password-123").await;
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_accepts_password_form() {
    let app = app().await;
    register(&app, "a@x.com", "a").await;

    let form = |password: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "grant_type=password&username=a%40x.com&password={}",
                password
            )))
            .unwrap()
    };

    let response = app.router.clone().oneshot(form("password-123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let token = body["access_token"].as_str().unwrap();

    let (status, me) = send(&app, Method::GET, "/api/v1/users/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "a@x.com");

    let response = app.router.clone().oneshot(form("password-124")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_or_garbage_token_is_401() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/api/v1/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/api/v1/users/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Could not validate credentials");
}

#[tokio::test]
async fn test_non_admin_cannot_write_catalog() {
    let app = app().await;
    register(&app, "a@x.com", "a").await;
    let token = login(&app, "a@x.com", "password-123").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&token),
        Some(json!({ "name": "Tools" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/api/v1/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_category_product_lifecycle() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, tools) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&admin),
        Some(json!({ "name": "Tools", "description": "Hand tools" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tools_id = tools["id"].as_str().unwrap().to_string();

    let (status, product) = send(
        &app,
        Method::POST,
        "/api/v1/products",
        Some(&admin),
        Some(json!({
            "name": "Hammer",
            "description": "Claw hammer",
            "price": 19.99,
            "stock": 5,
            "category_id": tools_id,
            "tags": ["hand-tools"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["is_active"], true);
    let product_id = product["id"].as_str().unwrap().to_string();

    let category_uri = format!("/api/v1/categories/{}", tools_id);
    let (status, body) = send(&app, Method::DELETE, &category_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "HAS_DEPENDENTS");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("{}/products", category_uri),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let product_uri = format!("/api/v1/products/{}", product_id);
    let (status, _) = send(&app, Method::DELETE, &product_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &product_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &category_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &category_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Category not found");
}

#[tokio::test]
async fn test_product_with_unknown_category() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/products",
        Some(&admin),
        Some(json!({
            "name": "Ghost",
            "price": 1.0,
            "category_id": "60d21b4967d0d8992e610c85"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Category not found");

    let (_, list) = send(&app, Method::GET, "/api/v1/products", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_product_filters_and_search() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, tools) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&admin),
        Some(json!({ "name": "Tools" })),
    )
    .await;
    let tools_id = tools["id"].as_str().unwrap().to_string();

    for (name, price, active, tags) in [
        ("Hammer", 20.0, true, vec!["steel"]),
        ("Saw", 35.5, true, vec!["wood"]),
        ("Old Drill", 50.0, false, vec!["power"]),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/products",
            Some(&admin),
            Some(json!({
                "name": name,
                "price": price,
                "category_id": tools_id,
                "is_active": active,
                "tags": tags
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, active) = send(&app, Method::GET, "/api/v1/products", None, None).await;
    assert_eq!(active.as_array().unwrap().len(), 2);

    let (_, all) = send(
        &app,
        Method::GET,
        "/api/v1/products?active_only=false&min_price=30",
        None,
        None,
    )
    .await;
    let names: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Saw".to_string()));
    assert!(names.contains(&"Old Drill".to_string()));

    let (_, found) = send(&app, Method::GET, "/api/v1/products?search=wood", None, None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "Saw");

    let (status, none) = send(
        &app,
        Method::GET,
        "/api/v1/products?category_id=not-a-uuid",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));

    let (status, body) = send(&app, Method::GET, "/api/v1/products?limit=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unstorable_price_rejected() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (_, tools) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&admin),
        Some(json!({ "name": "Tools" })),
    )
    .await;

    for price in [json!(-1.0), json!(19.999), json!(12345678901.5)] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/products",
            Some(&admin),
            Some(json!({
                "name": "Hammer",
                "price": price,
                "category_id": tools["id"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "price {price}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = app().await;
    register(&app, "a@x.com", "a").await;
    register(&app, "b@x.com", "b").await;
    let token = login(&app, "a@x.com", "password-123").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/users/me",
        Some(&token),
        Some(json!({ "username": "b" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/users/me",
        Some(&token),
        Some(json!({ "username": "alpha", "password": "fresh-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alpha");

    login(&app, "a@x.com", "fresh-password").await;
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/products"].is_object());

    let schemes = &body["components"]["securitySchemes"];
    assert!(schemes["bearer_auth"].is_object());
    assert_eq!(
        schemes["oauth2_password"]["flows"]["password"]["tokenUrl"],
        "/api/v1/auth/login"
    );
}
