//! # アプリケーション設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//! SDK の設定（Firebase の認証情報など）は SDK 側で読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | No | `8000` | ポート番号 |
//! | `AUTH_MODE` | No | `local` | `local`: ヘッダーなしを許可 / `strict`: ヘッダー必須 |

use std::env;

use thiserror::Error;

use crate::auth::AuthMode;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT は有効なポート番号である必要があります: {0:?}")]
    InvalidPort(String),

    #[error("AUTH_MODE は local または strict である必要があります: {0:?}")]
    InvalidAuthMode(String),
}

/// API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host:      String,
    /// ポート番号
    pub port:      u16,
    /// `Authorization` ヘッダーが無いリクエストの扱い
    pub auth_mode: AuthMode,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の取得関数から設定を読み込む
    ///
    /// テストでプロセスの環境変数を書き換えずに済むよう、取得元を差し替えられるようにしている。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT").filter(|v| !v.is_empty()) {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidPort(v))?,
            None => DEFAULT_PORT,
        };

        let auth_mode = match lookup("AUTH_MODE").filter(|v| !v.is_empty()) {
            Some(v) => AuthMode::parse(&v).ok_or(ConfigError::InvalidAuthMode(v))?,
            None => AuthMode::default(),
        };

        Ok(Self {
            host,
            port,
            auth_mode,
        })
    }
}
