//! # ユーザー API の統合テスト
//!
//! スタブの DataStore を注入したルーターに `oneshot` でリクエストを送り、
//! トークン抽出・SDK 呼び出し・エラー変換を検証する。

mod common;

use std::sync::Arc;

use axum::body::Body;
use common::{Call, StubDataStore, app_with, app_without_sdk, json_body};
use fn7_api::auth::AuthMode;
use fn7_sdk::SdkError;
use http::{Method, Request, StatusCode, header::AUTHORIZATION};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;

fn get_request(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, "Bearer tok1")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_トークン付きでユーザーを取得できる() {
    let stub = Arc::new(StubDataStore::returning(
        json!({"id": "42", "name": "Alice"}),
    ));
    let app = app_with(stub.clone(), AuthMode::Local);

    let response = app
        .oneshot(get_request("/api/users/42", Some("Bearer tok1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"id": "42", "name": "Alice"}));
    assert_eq!(
        stub.calls(),
        vec![Call::Get {
            collection: "Users".to_string(),
            id:         "42".to_string(),
            token:      Some("tok1".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_ヘッダーなしはトークンなしでsdkに渡す() {
    let stub = Arc::new(StubDataStore::returning(json!({"id": "7"})));
    let app = app_with(stub.clone(), AuthMode::Local);

    let response = app
        .oneshot(get_request("/api/users/7", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        stub.calls(),
        vec![Call::Get {
            collection: "Users".to_string(),
            id:         "7".to_string(),
            token:      None,
        }]
    );
}

#[rstest]
#[case("abc123")]
#[case("Basic dXNlcjpwYXNz")]
#[case("bearer tok1")]
#[tokio::test]
async fn test_bearerで始まらないヘッダーは401(#[case] authorization: &str) {
    let stub = Arc::new(StubDataStore::returning(json!({})));
    let app = app_with(stub.clone(), AuthMode::Local);

    let response = app
        .oneshot(get_request("/api/users/42", Some(authorization)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["detail"],
        json!("Invalid Authorization header format")
    );
    assert!(stub.calls().is_empty(), "SDK は呼ばれないこと");
}

#[tokio::test]
async fn test_strictモードでヘッダーなしは401() {
    let stub = Arc::new(StubDataStore::returning(json!({})));
    let app = app_with(stub.clone(), AuthMode::Strict);

    let response = app
        .oneshot(get_request("/api/users/42", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["detail"],
        json!("Missing Authorization header")
    );
    assert!(stub.calls().is_empty());
}

#[rstest]
#[case(None)]
#[case(Some("Bearer tok1"))]
#[case(Some("garbage"))]
#[tokio::test]
async fn test_sdk未初期化ならヘッダーによらず500(#[case] authorization: Option<&str>) {
    let app = app_without_sdk(AuthMode::Strict);

    let response = app
        .oneshot(get_request("/api/users/42", authorization))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["detail"], json!("SDK not initialized"));
}

#[rstest]
#[case(SdkError::Unknown("boom".to_string()))]
#[case(SdkError::NotFound("boom".to_string()))]
#[tokio::test]
async fn test_sdkエラーは500でメッセージを返す(#[case] err: SdkError) {
    let stub = Arc::new(StubDataStore::failing(err));
    let app = app_with(stub, AuthMode::Local);

    let response = app
        .oneshot(get_request("/api/users/42", Some("Bearer tok1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["detail"], json!("boom"));
    assert_eq!(body["status"], json!(500));
}

#[tokio::test]
async fn test_ユーザーを作成すると201() {
    let stub = Arc::new(StubDataStore::returning(
        json!({"id": "42", "name": "Alice"}),
    ));
    let app = app_with(stub.clone(), AuthMode::Local);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/users/42",
            json!({"data": {"name": "Alice"}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await, json!({"id": "42", "name": "Alice"}));
    assert_eq!(
        stub.calls(),
        vec![Call::Create {
            collection: "Users".to_string(),
            id:         "42".to_string(),
            data:       json!({"name": "Alice"}).as_object().unwrap().clone(),
            token:      Some("tok1".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_ユーザーを更新すると200() {
    let stub = Arc::new(StubDataStore::returning(
        json!({"id": "42", "name": "Bob", "age": 30}),
    ));
    let app = app_with(stub.clone(), AuthMode::Local);

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/users/42",
            json!({"data": {"name": "Bob"}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"id": "42", "name": "Bob", "age": 30})
    );
    assert!(matches!(
        stub.calls().as_slice(),
        [Call::Update { id, data, .. }] if id == "42" && data.get("name") == Some(&json!("Bob"))
    ));
}

#[tokio::test]
async fn test_ユーザーを削除すると204() {
    let stub = Arc::new(StubDataStore::returning(json!(null)));
    let app = app_with(stub.clone(), AuthMode::Local);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/users/42")
                .header(AUTHORIZATION, "Bearer tok1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        stub.calls(),
        vec![Call::Delete {
            collection: "Users".to_string(),
            id:         "42".to_string(),
            token:      Some("tok1".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_dataが無いボディは4xxでsdkを呼ばない() {
    let stub = Arc::new(StubDataStore::returning(json!({})));
    let app = app_with(stub.clone(), AuthMode::Local);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/users/42",
            json!({"name": "Alice"}),
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(stub.calls().is_empty());
}
