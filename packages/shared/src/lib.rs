//! # FN7 共有ユーティリティ
//!
//! API サーバー（`fn7-api`）で使われる共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は各アプリの責務）
//! - トレーシング関連は `observability` feature で有効化する

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
