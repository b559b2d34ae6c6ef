//! # SDK 設定
//!
//! 環境変数から SDK の設定を読み込む。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `FIREBASE_SERVICE_ACCOUNT_JSON` | どちらか一方 | サービスアカウントキー（JSON 文字列） |
//! | `FIREBASE_SERVICE_ACCOUNT_PATH` | どちらか一方 | サービスアカウントキーのファイルパス |
//! | `FIREBASE_STORAGE_BUCKET` | No | Storage バケット名（デフォルト: `<project_id>.appspot.com`） |
//! | `FIRESTORE_BASE_URL` | No | Firestore REST API のベース URL（エミュレータ用） |
//! | `FIREBASE_STORAGE_BASE_URL` | No | Firebase Storage REST API のベース URL |

use std::{env, fmt, path::PathBuf};

use crate::{credentials::ServiceAccountKey, error::InitError};

/// Firestore REST API のデフォルトベース URL
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// Firebase Storage REST API のデフォルトベース URL
pub const DEFAULT_STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com";

/// サービスアカウントキーの取得元
#[derive(Clone)]
pub enum CredentialSource {
    /// JSON 文字列を直接保持する
    Json(String),
    /// キーファイルのパス
    Path(PathBuf),
}

impl fmt::Debug for CredentialSource {
    // JSON には秘密鍵が含まれるためログに出さない
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Json(_) => f.write_str("Json(<redacted>)"),
            CredentialSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

impl CredentialSource {
    /// 2 つの環境変数の値から取得元を決める
    ///
    /// 空文字列は未設定として扱う。両方、またはどちらも設定されていない場合はエラー。
    pub fn resolve(json: Option<String>, path: Option<String>) -> Result<Self, InitError> {
        let json = json.filter(|v| !v.trim().is_empty());
        let path = path.filter(|v| !v.trim().is_empty());

        match (json, path) {
            (Some(json), None) => Ok(CredentialSource::Json(json)),
            (None, Some(path)) => Ok(CredentialSource::Path(PathBuf::from(path))),
            (Some(_), Some(_)) => Err(InitError::AmbiguousCredentials),
            (None, None) => Err(InitError::MissingCredentials),
        }
    }

    /// サービスアカウントキーを読み込む
    pub fn load(&self) -> Result<ServiceAccountKey, InitError> {
        match self {
            CredentialSource::Json(json) => ServiceAccountKey::from_json(json),
            CredentialSource::Path(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| {
                    InitError::ReadKeyFile {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                ServiceAccountKey::from_json(&json)
            }
        }
    }
}

/// SDK の設定
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// サービスアカウントキーの取得元
    pub credentials:        CredentialSource,
    /// Storage バケット名（`None` のときはプロジェクトのデフォルトバケット）
    pub storage_bucket:     Option<String>,
    /// Firestore REST API のベース URL
    pub firestore_base_url: String,
    /// Firebase Storage REST API のベース URL
    pub storage_base_url:   String,
}

impl SdkConfig {
    /// 指定した認証情報とデフォルトのエンドポイントで設定を作成する
    pub fn new(credentials: CredentialSource) -> Self {
        Self {
            credentials,
            storage_bucket: None,
            firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
            storage_base_url: DEFAULT_STORAGE_BASE_URL.to_string(),
        }
    }

    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, InitError> {
        let credentials = CredentialSource::resolve(
            env::var("FIREBASE_SERVICE_ACCOUNT_JSON").ok(),
            env::var("FIREBASE_SERVICE_ACCOUNT_PATH").ok(),
        )?;

        Ok(Self {
            credentials,
            storage_bucket: non_empty_var("FIREBASE_STORAGE_BUCKET"),
            firestore_base_url: non_empty_var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.to_string()),
            storage_base_url: non_empty_var("FIREBASE_STORAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STORAGE_BASE_URL.to_string()),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
