//! Handler tests for the Users domain
//!
//! Drive the users router with `oneshot` against a migrated in-memory
//! database and check status codes and the `{code, data, message}` envelope.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{JwtAuth, JwtConfig, SharedTokenSigner};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "handler-test-secret-0123456789abcdef";

fn app(db: &TestDatabase) -> Router {
    let signer: SharedTokenSigner = Arc::new(JwtAuth::new(&JwtConfig::try_new(SECRET).unwrap()));
    let service = UserService::new(
        SeaOrmUserRepository::new(db.connection()),
        db.transactions(),
        signer.clone(),
    );
    handlers::router(service, signer)
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn register_and_login(app: &Router, builder: &TestDataBuilder) -> String {
    let credentials = json!({
        "email": builder.email("ada"),
        "password": builder.password(),
    });

    let (status, _) = send(app, json_request("POST", "/register", credentials.clone(), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app, json_request("POST", "/login", credentials, None)).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_returns_ok_envelope() {
    let db = TestDatabase::new().await;
    let app = app(&db);
    let builder = TestDataBuilder::from_test_name("handler_register_ok");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/register",
            json!({"email": builder.email("ada"), "password": builder.password()}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"code": 0, "data": null, "message": "ok"}));
}

#[tokio::test]
async fn test_register_duplicate_email_is_bad_request() {
    let db = TestDatabase::new().await;
    let app = app(&db);
    let builder = TestDataBuilder::from_test_name("handler_register_duplicate");
    let credentials = json!({"email": builder.email("ada"), "password": builder.password()});

    send(&app, json_request("POST", "/register", credentials.clone(), None)).await;
    let (status, body) = send(&app, json_request("POST", "/register", credentials, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1008);
}

#[tokio::test]
async fn test_register_validates_input() {
    let db = TestDatabase::new().await;
    let app = app(&db);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/register",
            json!({"email": "not-an-email", "password": "short"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);
    assert!(body["data"]["email"].is_array());
    assert!(body["data"]["password"].is_array());
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let db = TestDatabase::new().await;
    let app = app(&db);
    let builder = TestDataBuilder::from_test_name("handler_login_wrong_password");
    register_and_login(&app, &builder).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/login",
            json!({"email": builder.email("ada"), "password": "wrong-password"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1012);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthorized() {
    let db = TestDatabase::new().await;
    let app = app(&db);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/login",
            json!({"email": "ghost@example.test", "password": "whatever-password"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let db = TestDatabase::new().await;
    let app = app(&db);

    let request = Request::builder().uri("/user").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1006);
}

#[tokio::test]
async fn test_profile_rejects_forged_token() {
    let db = TestDatabase::new().await;
    let app = app(&db);

    let request = Request::builder()
        .uri("/user")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_and_update_profile() {
    let db = TestDatabase::new().await;
    let app = app(&db);
    let builder = TestDataBuilder::from_test_name("handler_profile_roundtrip");
    let token = register_and_login(&app, &builder).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/user",
            json!({"email": builder.email("lovelace"), "nickname": builder.nickname("ada")}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);

    let request = Request::builder()
        .uri("/user")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], builder.email("lovelace"));
    assert_eq!(body["data"]["nickname"], builder.nickname("ada"));
    assert!(body["data"]["user_id"].is_string());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_update_profile_validates_nickname() {
    let db = TestDatabase::new().await;
    let app = app(&db);
    let builder = TestDataBuilder::from_test_name("handler_update_validation");
    let token = register_and_login(&app, &builder).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/user",
            json!({"email": builder.email("ada"), "nickname": ""}),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);
}
