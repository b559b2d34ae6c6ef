//! # ヘルスチェックハンドラ
//!
//! `GET /health` — プロセスの稼働状態と SDK の初期化状態を返す。
//! SDK が未初期化でも 200 を返す（SDK を使うエンドポイントだけが 500 になる）。
//!
//! ```text
//! $ curl http://localhost:8000/health
//! {"status":"ok","sdk_initialized":true}
//! ```

use std::sync::Arc;

use axum::{Json, extract::State};
use fn7_shared::HealthResponse;

use crate::state::AppState;

/// ヘルスチェックエンドポイント
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.sdk_initialized()))
}
