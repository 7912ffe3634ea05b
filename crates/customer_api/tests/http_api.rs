//! # Integration Tests for customer_api
//!
//! Drives the full router (CORS, logging middleware, handlers, core service,
//! in-memory SQLite) through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use customer_api::state::AppState;
use customer_core::{ConnectionPool, UpdatePolicy};

/// Helper: build the test app over a fresh in-memory database.
fn test_app() -> axum::Router {
    test_app_with_policy(UpdatePolicy::default())
}

fn test_app_with_policy(policy: UpdatePolicy) -> axum::Router {
    let pool = ConnectionPool::in_memory().unwrap();
    customer_api::app(AppState::new(pool, policy))
}

fn ana() -> Value {
    json!({
        "name": "Ana",
        "identity_number": "11144477735",
        "birth_date": "1990-01-01",
        "street_address": "Rua A",
        "postal_code": "00000-000",
        "city": "X",
        "state": "SP"
    })
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper: send one request and decode the JSON response body.
async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

// -- Liveness -----------------------------------------------------------------

#[tokio::test]
async fn banner_and_health_respond() {
    let app = test_app();

    let (status, body) = send(&app, empty_request("GET", "/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("running"));

    let (status, body) = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/customers"].is_object());
}

// -- Create / List ------------------------------------------------------------

#[tokio::test]
async fn list_starts_empty() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/customers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_then_list_roundtrip() {
    let app = test_app();

    let (status, created) = send(&app, json_request("POST", "/customers", &ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, listed) = send(&app, empty_request("GET", "/customers")).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = ana();
    expected["id"] = json!(id);
    assert_eq!(listed, json!([expected]));
}

#[tokio::test]
async fn duplicate_identity_is_conflict() {
    let app = test_app();
    send(&app, json_request("POST", "/customers", &ana())).await;

    let (status, body) = send(&app, json_request("POST", "/customers", &ana())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "DUPLICATE_IDENTITY");

    let (_, listed) = send(&app, empty_request("GET", "/customers")).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_identity_is_bad_request() {
    let app = test_app();
    let mut body = ana();
    body["identity_number"] = json!("11144477736");

    let (status, response) = send(&app, json_request("POST", "/customers", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "INVALID_IDENTITY");

    let (_, listed) = send(&app, empty_request("GET", "/customers")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn blank_identity_number_is_invalid_identity() {
    let app = test_app();
    let mut body = ana();
    body["identity_number"] = json!("");

    let (status, response) = send(&app, json_request("POST", "/customers", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "INVALID_IDENTITY");
}

#[tokio::test]
async fn missing_field_rejects_body_wholesale() {
    let app = test_app();
    let mut body = ana();
    body.as_object_mut().unwrap().remove("city");

    let (status, response) = send(&app, json_request("POST", "/customers", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&response), "INVALID_INPUT");
}

#[tokio::test]
async fn blank_field_is_invalid_input() {
    let app = test_app();
    let mut body = ana();
    body["name"] = json!("  ");

    let (status, response) = send(&app, json_request("POST", "/customers", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&response), "INVALID_INPUT");
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("name"));
}

// -- Update -------------------------------------------------------------------

#[tokio::test]
async fn update_replaces_all_fields() {
    let app = test_app();
    let (_, created) = send(&app, json_request("POST", "/customers", &ana())).await;
    let id = created["id"].as_i64().unwrap();

    let replacement = json!({
        "name": "Ana Souza",
        "identity_number": "52998224725",
        "birth_date": "1991-02-02",
        "street_address": "Rua B",
        "postal_code": "22222-222",
        "city": "Y",
        "state": "MG"
    });
    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/customers/{id}"), &replacement),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, empty_request("GET", "/customers")).await;
    let mut expected = replacement;
    expected["id"] = json!(id);
    assert_eq!(listed, json!([expected]));
}

#[tokio::test]
async fn legacy_update_of_missing_id_is_ok() {
    let app = test_app();
    let (status, body) = send(&app, json_request("PUT", "/customers/999", &ana())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 999);
}

#[tokio::test]
async fn strict_update_of_missing_id_is_not_found() {
    let app = test_app_with_policy(UpdatePolicy {
        require_existing: true,
        enforce_unique_identity: true,
    });
    let (status, body) = send(&app, json_request("PUT", "/customers/999", &ana())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn update_with_invalid_identity_is_bad_request() {
    let app = test_app();
    let (_, created) = send(&app, json_request("POST", "/customers", &ana())).await;
    let id = created["id"].as_i64().unwrap();

    let mut body = ana();
    body["identity_number"] = json!("123");
    let (status, response) =
        send(&app, json_request("PUT", &format!("/customers/{id}"), &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "INVALID_IDENTITY");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = test_app();
    let (status, body) = send(&app, json_request("PUT", "/customers/abc", &ana())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}

// -- Delete -------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_customer_then_not_found() {
    let app = test_app();
    let (_, created) = send(&app, json_request("POST", "/customers", &ana())).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(&app, empty_request("DELETE", &format!("/customers/{id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, empty_request("GET", "/customers")).await;
    assert_eq!(listed, json!([]));

    let (status, body) = send(&app, empty_request("DELETE", &format!("/customers/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

// -- CORS ---------------------------------------------------------------------

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let app = test_app();
    let request = Request::builder()
        .method("GET")
        .uri("/customers")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
