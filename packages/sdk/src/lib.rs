//! # FN7 SDK
//!
//! Firebase（Firestore / Storage）へのデータアクセスを提供する。
//! API サーバーは [`DataStore`] トレイト越しにのみこのクレートを使う。
//!
//! ## モジュール構成
//!
//! - `client`: データアクセストレイトと Firebase REST API 実装
//! - `config`: 環境変数からの設定読み込み
//! - `credentials`: サービスアカウントキー
//! - `error`: エラー定義
//! - `token`: ベアラートークンとサービスアカウントのアクセストークン
//! - `value`: Firestore 値とプレーン JSON の変換
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use fn7_sdk::{BearerToken, DocumentStore, Fn7Sdk};
//!
//! let sdk = Fn7Sdk::from_env()?;
//! let user = sdk.get_data("Users", "42", Some(&BearerToken::new("id-token"))).await?;
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
mod response;
pub mod token;
pub mod value;

pub use client::{DataStore, DocumentStore, FileStore, Fn7Sdk, UploadFile};
pub use config::{CredentialSource, SdkConfig};
pub use credentials::ServiceAccountKey;
pub use error::{InitError, SdkError};
pub use token::BearerToken;
