//! # サービスアカウントキー
//!
//! Google Cloud が発行するサービスアカウントキー（JSON）のうち、
//! SDK が使うフィールドだけを読み込む。

use serde::Deserialize;

use crate::error::InitError;

/// OAuth2 トークンエンドポイントのデフォルト値
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// サービスアカウントキー
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id:     String,
    pub client_email:   String,
    pub private_key:    String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri:      String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// JSON 文字列からパースする
    pub fn from_json(json: &str) -> Result<Self, InitError> {
        serde_json::from_str(json).map_err(InitError::InvalidKey)
    }
}
