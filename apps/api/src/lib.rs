//! # FN7 API サーバー
//!
//! Firebase をバックエンドに持つ FN7 SDK へリクエストを中継する HTTP サーバー。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Frontend  │────▶│   FN7 API   │────▶│  Firebase   │
//! │   (React)   │     │ (port 8000) │     │ (Firestore/ │
//! └─────────────┘     └─────────────┘     │  Storage)   │
//!                                         └─────────────┘
//! ```
//!
//! API サーバー自身は認証・認可を行わない。`Authorization` ヘッダーのトークンを
//! 取り出して SDK に渡し、SDK のエラーを HTTP ステータスに変換するだけ。
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - ルーターとミドルウェアの組み立て
//! - [`auth`] - `Authorization` ヘッダーからのトークン抽出
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`state`] - ハンドラ間で共有する状態（SDK クライアント）

pub mod app_builder;
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod state;
