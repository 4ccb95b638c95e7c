//! Router-level tests that need no database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use cogest_api::{AppState, create_router};

fn test_router() -> axum::Router {
    create_router(AppState {
        db: Arc::new(DatabaseConnection::default()),
    })
}

#[tokio::test]
async fn test_health_returns_success_envelope() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["status"], serde_json::json!("healthy"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nope")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_operation_kind_is_rejected() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/caisse/operations")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"type_operation":"depot","montant":"10.000"}"#,
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"], serde_json::json!("VALIDATION_ERROR"));
}
