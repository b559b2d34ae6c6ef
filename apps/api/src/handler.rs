//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、データアクセスは SDK に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `user`: ユーザードキュメントの取得・作成・更新・削除
//! - `storage`: ファイルアップロード

pub mod health;
pub mod storage;
pub mod user;

pub use health::health_check;
pub use storage::upload_files;
pub use user::{create_user, delete_user, get_user, update_user};
