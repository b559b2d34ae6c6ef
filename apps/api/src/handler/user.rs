//! # ユーザー API ハンドラ
//!
//! `Users` コレクションのドキュメントを SDK 経由で読み書きする。
//!
//! ## エンドポイント
//!
//! - `GET /api/users/{user_id}` - ユーザー取得
//! - `POST /api/users/{user_id}` - ユーザー作成
//! - `PUT /api/users/{user_id}` - ユーザー更新（指定フィールドのみ）
//! - `DELETE /api/users/{user_id}` - ユーザー削除
//!
//! いずれも SDK の初期化確認 → トークン抽出 → SDK 呼び出しの順で処理する。
//! SDK が未初期化なら `Authorization` ヘッダーの内容によらず 500 になる。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{auth::extract_bearer_token, error::ApiError, state::AppState};

/// ユーザードキュメントを格納するコレクション名
pub const USERS_COLLECTION: &str = "Users";

/// ユーザー作成・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct UserDataRequest {
    pub data: Map<String, Value>,
}

/// GET /api/users/{user_id}
///
/// SDK が返したドキュメントをそのまま返す。
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let sdk = state.sdk()?;
    let token = extract_bearer_token(&headers, state.auth_mode())?;

    let user = sdk
        .get_data(USERS_COLLECTION, &user_id, token.as_ref())
        .await?;

    Ok(Json(user))
}

/// POST /api/users/{user_id}
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UserDataRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sdk = state.sdk()?;
    let token = extract_bearer_token(&headers, state.auth_mode())?;

    let user = sdk
        .create_data(USERS_COLLECTION, &user_id, &req.data, token.as_ref())
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{user_id}
///
/// `data` に含まれるフィールドだけを上書きし、更新後のドキュメントを返す。
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UserDataRequest>,
) -> Result<Json<Value>, ApiError> {
    let sdk = state.sdk()?;
    let token = extract_bearer_token(&headers, state.auth_mode())?;

    let user = sdk
        .update_data(USERS_COLLECTION, &user_id, &req.data, token.as_ref())
        .await?;

    Ok(Json(user))
}

/// DELETE /api/users/{user_id}
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let sdk = state.sdk()?;
    let token = extract_bearer_token(&headers, state.auth_mode())?;

    sdk.delete_data(USERS_COLLECTION, &user_id, token.as_ref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
