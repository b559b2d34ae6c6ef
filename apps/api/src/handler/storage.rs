//! # ストレージ API ハンドラ
//!
//! `POST /api/storage/upload` — Base64 で受け取ったファイルを Firebase Storage に
//! アップロードし、ダウンロード URL を返す。
//!
//! ## リクエスト例
//!
//! ```json
//! {
//!   "file_names": ["avatars/42.png"],
//!   "file_buffers": ["iVBORw0KGgo..."]
//! }
//! ```
//!
//! `fileNames` / `fileBuffers` のキャメルケースも受け付ける。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use fn7_sdk::UploadFile;
use serde::{Deserialize, Serialize};

use crate::{auth::extract_bearer_token, error::ApiError, state::AppState};

/// アップロードリクエスト
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(alias = "fileNames")]
    pub file_names:   Vec<String>,
    /// Base64（標準アルファベット、パディングあり）でエンコードしたファイル内容
    #[serde(alias = "fileBuffers")]
    pub file_buffers: Vec<String>,
}

/// アップロードレスポンス
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// `file_names` と同じ順のダウンロード URL
    pub urls: Vec<String>,
}

impl UploadRequest {
    /// ファイル名と内容を組にしてデコードする
    ///
    /// SDK を呼ぶ前に全件検証し、1 件でも不正ならアップロードしない。
    fn into_files(self) -> Result<Vec<UploadFile>, ApiError> {
        if self.file_names.is_empty() {
            return Err(ApiError::Validation(
                "file_names must not be empty".to_string(),
            ));
        }
        if self.file_names.len() != self.file_buffers.len() {
            return Err(ApiError::Validation(format!(
                "file_names and file_buffers must have the same length ({} != {})",
                self.file_names.len(),
                self.file_buffers.len()
            )));
        }

        self.file_names
            .into_iter()
            .zip(self.file_buffers)
            .enumerate()
            .map(|(i, (name, buffer))| {
                if name.is_empty() {
                    return Err(ApiError::Validation(format!(
                        "file_names[{i}] must not be empty"
                    )));
                }
                let content = STANDARD.decode(buffer.as_bytes()).map_err(|e| {
                    ApiError::Validation(format!("file_buffers[{i}] is not valid base64: {e}"))
                })?;
                Ok(UploadFile { name, content })
            })
            .collect()
    }
}

/// POST /api/storage/upload
#[tracing::instrument(skip_all)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let sdk = state.sdk()?;
    let token = extract_bearer_token(&headers, state.auth_mode())?;
    let files = req.into_files()?;

    tracing::debug!(count = files.len(), "ファイルをアップロードします");

    let urls = sdk.upload_to_storage(&files, token.as_ref()).await?;

    Ok(Json(UploadResponse { urls }))
}
