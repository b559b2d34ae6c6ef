//! # ルーター構築
//!
//! 共有状態を受け取り、ルーティングとミドルウェアを組み立てる。
//! `main.rs` は SDK の初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use fn7_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{create_user, delete_user, get_user, health_check, update_user, upload_files},
    state::AppState,
};

/// ルーターを構築する
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/users/{user_id}",
            get(get_user)
                .post(create_user)
                .put(update_user)
                .delete(delete_user),
        )
        .route("/api/storage/upload", post(upload_files))
        .with_state(state)
        // CORS: すべてのオリジン・メソッド・ヘッダーを許可
        .layer(CorsLayer::permissive())
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそれを使う）
        // 2. TraceLayer: スパンに request_id を含め、リクエスト中の全ログに付与
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id を付ける
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
