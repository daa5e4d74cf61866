use axum::body::{to_bytes, Body};
use axum::Router;
use base64::{engine::general_purpose, Engine as _};
use http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

mod common;

use common::users_url;

async fn send(app: &Router, uri: &str, authorization: Option<&str>) -> (StatusCode, http::HeaderMap, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn basic(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        general_purpose::STANDARD.encode(format!("{}:{}", username, password))
    )
}

#[tokio::test]
async fn test_bearer_token_required() {
    let app = common::setup_test_app(common::create_bearer_app_config("s3cret"))
        .await
        .unwrap();

    let (status, headers, body) = send(&app, &users_url(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    assert_eq!(body["status"], "401");
    assert_eq!(
        body["schemas"][0],
        "urn:ietf:params:scim:api:messages:2.0:Error"
    );

    let (status, _, _) = send(&app, &users_url(), Some("Bearer wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, &users_url(), Some("s3cret")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(&app, &users_url(), Some("Bearer s3cret")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalResults"], 0);
}

#[tokio::test]
async fn test_basic_credentials_required() {
    let app = common::setup_test_app(common::create_basic_app_config("scim", "pa:ss"))
        .await
        .unwrap();

    let (status, headers, _) = send(&app, &users_url(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"SCIM\""
    );

    let (status, _, _) = send(&app, &users_url(), Some(&basic("scim", "wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, &users_url(), Some("Basic !!not-base64!!")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // only the first colon separates user from password
    let (status, _, _) = send(&app, &users_url(), Some(&basic("scim", "pa:ss"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_open() {
    let app = common::setup_test_app(common::create_bearer_app_config("s3cret"))
        .await
        .unwrap();

    let (status, _, body) = send(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unauthenticated_mode_allows_everything() {
    let app = common::setup_test_app(common::create_test_app_config())
        .await
        .unwrap();

    let (status, _, _) = send(&app, &users_url(), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, &format!("{}/Schemas", common::BASE), Some("Bearer anything")).await;
    assert_eq!(status, StatusCode::OK);
}
