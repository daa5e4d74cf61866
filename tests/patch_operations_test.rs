use axum_test::TestServer;
use http::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{create_test_user_json, patch_body, users_url};

async fn server_with_user() -> (TestServer, String) {
    let app = common::setup_test_app(common::create_test_app_config())
        .await
        .unwrap();
    let server = TestServer::new(app).unwrap();
    let created: Value = server
        .post(&users_url())
        .content_type("application/scim+json")
        .json(&create_test_user_json("patchme", "Pat", "Smith"))
        .await
        .json();
    let location = created["meta"]["location"].as_str().unwrap().to_string();
    (server, location)
}

async fn patch(server: &TestServer, location: &str, operations: Value) -> axum_test::TestResponse {
    server
        .patch(location)
        .content_type("application/scim+json")
        .json(&patch_body(operations))
        .await
}

#[tokio::test]
async fn test_last_write_wins_within_request() {
    let (server, location) = server_with_user().await;
    let response = patch(
        &server,
        &location,
        json!([
            {"op": "replace", "path": "userName", "value": "A"},
            {"op": "replace", "path": "userName", "value": "B"}
        ]),
    )
    .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["userName"], "B");
    assert_eq!(server.get(&location).await.json::<Value>()["userName"], "B");
}

#[tokio::test]
async fn test_nested_replace_keeps_siblings() {
    let (server, location) = server_with_user().await;
    let patched: Value = patch(
        &server,
        &location,
        json!([{"op": "Replace", "path": "/name/givenName", "value": "X"}]),
    )
    .await
    .json();

    assert_eq!(patched["name"]["givenName"], "X");
    assert_eq!(patched["name"]["familyName"], "Smith");
}

#[tokio::test]
async fn test_nested_replace_without_parent_is_no_target() {
    let app = common::setup_test_app(common::create_test_app_config())
        .await
        .unwrap();
    let server = TestServer::new(app).unwrap();
    let created: Value = server
        .post(&users_url())
        .content_type("application/scim+json")
        .json(&json!({"userName": "nameless"}))
        .await
        .json();

    let response = patch(
        &server,
        created["meta"]["location"].as_str().unwrap(),
        json!([{"op": "replace", "path": "name/familyName", "value": "Doe"}]),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["scimType"], "noTarget");
}

#[tokio::test]
async fn test_replace_lists_and_enterprise_fields() {
    let (server, location) = server_with_user().await;
    let patched: Value = patch(
        &server,
        &location,
        json!([
            {"op": "replace", "path": "emails", "value": [
                {"value": "new@example.com", "type": "home"},
                {"value": "other@example.com"}
            ]},
            {"op": "replace",
             "path": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department",
             "value": "Finance"},
            {"op": "replace", "path": "enterpriseExtension/costCenter", "value": "CC-1"}
        ]),
    )
    .await
    .json();

    let emails = patched["emails"].as_array().unwrap();
    assert_eq!(emails.len(), 2);
    assert_eq!(emails[0]["value"], "new@example.com");
    let extension = &patched["urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"];
    assert_eq!(extension["department"], "Finance");
    assert_eq!(extension["costCenter"], "CC-1");
    assert_eq!(patched["schemas"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_add_is_noop_when_value_present() {
    let (server, location) = server_with_user().await;
    let patched: Value = patch(
        &server,
        &location,
        json!([
            {"op": "add", "path": "emails", "value": [{"value": "ignored@example.com"}]},
            {"op": "add", "path": "externalId", "value": "ext-1"}
        ]),
    )
    .await
    .json();

    assert_eq!(patched["emails"][0]["value"], "patchme@example.com");
    assert_eq!(patched["emails"].as_array().unwrap().len(), 1);
    assert_eq!(patched["externalId"], "ext-1");
}

#[tokio::test]
async fn test_failed_operation_persists_nothing() {
    let (server, location) = server_with_user().await;
    let before: Value = server.get(&location).await.json();

    let response = patch(
        &server,
        &location,
        json!([
            {"op": "replace", "path": "userName", "value": "changed"},
            {"op": "replace", "path": "nickName", "value": "nope"},
            {"op": "replace", "path": "active", "value": false}
        ]),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["scimType"], "invalidPath");

    let after: Value = server.get(&location).await.json();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_unknown_operation_kind() {
    let (server, location) = server_with_user().await;
    let response = patch(
        &server,
        &location,
        json!([{"op": "move", "path": "userName", "value": "x"}]),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["scimType"], "invalidSyntax");
}

#[tokio::test]
async fn test_missing_path_is_rejected() {
    let (server, location) = server_with_user().await;
    let response = patch(
        &server,
        &location,
        json!([{"op": "replace", "value": {"active": false}}]),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["scimType"], "invalidPath");
}

#[tokio::test]
async fn test_each_patch_advances_last_modified() {
    let (server, location) = server_with_user().await;
    let mut previous = server.get(&location).await.json::<Value>()["meta"]["lastModified"]
        .as_str()
        .unwrap()
        .to_string();

    for active in [false, true, false] {
        let patched: Value = patch(
            &server,
            &location,
            json!([{"op": "replace", "path": "active", "value": active}]),
        )
        .await
        .json();
        let current = patched["meta"]["lastModified"].as_str().unwrap().to_string();
        assert!(current > previous, "{} !> {}", current, previous);
        previous = current;
    }
}
