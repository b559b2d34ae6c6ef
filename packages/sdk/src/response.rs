//! Firebase REST API レスポンスの共通ハンドリング

use serde::de::DeserializeOwned;

use crate::error::SdkError;

/// レスポンスの共通ハンドリング
///
/// 成功時はボディを `T` にデシリアライズし、
/// エラー時はステータスコードに応じた `SdkError` を返す。
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SdkError> {
    let status = response.status();

    if status.is_success() {
        let body = response.json::<T>().await?;
        return Ok(body);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SdkError::from_status(status, error_message(status, &body)))
}

/// ボディを使わないレスポンスのハンドリング（DELETE など）
pub(crate) async fn handle_empty_response(response: reqwest::Response) -> Result<(), SdkError> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(SdkError::from_status(status, error_message(status, &body)))
}

/// エラーボディから人間向けのメッセージを取り出す
///
/// Google API 形式（`{"error": {"message": ...}}`）、OAuth2 形式
/// （`{"error": ..., "error_description": ...}`）の順に試し、
/// どちらでもなければボディをそのまま使う。
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = json["error"]["message"].as_str() {
            return message.to_string();
        }
        if let Some(description) = json["error_description"].as_str() {
            return description.to_string();
        }
        if let Some(error) = json["error"].as_str() {
            return error.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("予期しないステータス {status}")
    } else {
        body.to_string()
    }
}
