//! # API エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換を行う。
//!
//! ## マッピング
//!
//! | ApiError | HTTP Status | detail |
//! |----------|-------------|--------|
//! | MissingAuthorization | 401 | 固定メッセージ |
//! | InvalidAuthorization | 401 | 固定メッセージ |
//! | Validation | 400 | 検証エラーの内容 |
//! | SdkNotInitialized | 500 | 固定メッセージ |
//! | Sdk | 500 | SDK のエラーメッセージそのまま |
//!
//! SDK エラーは種別（NotFound / Unauthorized など）によらずすべて 500 にする。
//! 種別はログにのみ残す。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fn7_sdk::SdkError;
use fn7_shared::ErrorResponse;
use thiserror::Error;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// `Authorization` ヘッダーが無い（strict モードのみ）
    #[error("Missing Authorization header")]
    MissingAuthorization,

    /// `Authorization` ヘッダーが `"Bearer "` で始まらない
    #[error("Invalid Authorization header format")]
    InvalidAuthorization,

    /// リクエストボディの検証エラー
    #[error("{0}")]
    Validation(String),

    /// 起動時に SDK を初期化できなかった
    #[error("SDK not initialized")]
    SdkNotInitialized,

    /// SDK 呼び出しの失敗
    #[error(transparent)]
    Sdk(#[from] SdkError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingAuthorization | ApiError::InvalidAuthorization => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SdkNotInitialized | ApiError::Sdk(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        let body = match &self {
            ApiError::MissingAuthorization | ApiError::InvalidAuthorization => {
                ErrorResponse::unauthorized(detail)
            }
            ApiError::Validation(_) => ErrorResponse::validation_error(detail),
            ApiError::SdkNotInitialized => {
                tracing::error!(
                    error.category = "configuration",
                    error.kind = "sdk_not_initialized",
                    "SDK が初期化されていないためリクエストを処理できません"
                );
                ErrorResponse::sdk_not_initialized()
            }
            ApiError::Sdk(err) => {
                tracing::error!(
                    error.category = "external_service",
                    error.kind = sdk_error_kind(err),
                    "SDK 呼び出しで内部エラー: {}",
                    err
                );
                ErrorResponse::internal_error(detail)
            }
        };

        (self.status_code(), Json(body)).into_response()
    }
}

fn sdk_error_kind(err: &SdkError) -> &'static str {
    match err {
        SdkError::NotFound(_) => "not_found",
        SdkError::Unauthorized(_) => "unauthorized",
        SdkError::Unavailable(_) => "unavailable",
        SdkError::Unknown(_) => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    async fn response_parts(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_形式不正は401で固定メッセージ() {
        let (status, body) = response_parts(ApiError::InvalidAuthorization).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], json!("Invalid Authorization header format"));
    }

    #[tokio::test]
    async fn test_sdk未初期化は500で固定メッセージ() {
        let (status, body) = response_parts(ApiError::SdkNotInitialized).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], json!("SDK not initialized"));
    }

    #[rstest]
    #[case(SdkError::NotFound("boom".to_string()))]
    #[case(SdkError::Unauthorized("boom".to_string()))]
    #[case(SdkError::Unavailable("boom".to_string()))]
    #[case(SdkError::Unknown("boom".to_string()))]
    #[tokio::test]
    async fn test_sdkエラーは種別によらず500でメッセージをそのまま返す(#[case] err: SdkError) {
        let (status, body) = response_parts(ApiError::Sdk(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], json!("boom"));
        assert_eq!(body["status"], json!(500));
    }

    #[tokio::test]
    async fn test_バリデーションエラーは400() {
        let (status, body) =
            response_parts(ApiError::Validation("file_names must not be empty".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], json!("file_names must not be empty"));
    }
}
