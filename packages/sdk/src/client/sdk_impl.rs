//! `Fn7Sdk` の構造体と初期化

use crate::{
    config::SdkConfig,
    error::{InitError, SdkError},
    token::{BearerToken, ServiceAccountTokenSource},
};

/// Firebase REST API を使ったデータアクセスクライアント
///
/// プロセス起動時に一度だけ構築し、以降は読み取り専用で共有する。
pub struct Fn7Sdk {
    pub(super) project_id:         String,
    pub(super) bucket:             String,
    pub(super) firestore_base_url: String,
    pub(super) storage_base_url:   String,
    pub(super) client:             reqwest::Client,
    pub(super) token_source:       ServiceAccountTokenSource,
}

impl Fn7Sdk {
    /// 環境変数から設定を読み込んで SDK を構築する
    pub fn from_env() -> Result<Self, InitError> {
        Self::new(SdkConfig::from_env()?)
    }

    /// 設定から SDK を構築する
    ///
    /// サービスアカウントキーの読み込みと秘密鍵のパースをここで行う。
    /// ネットワークにはアクセスしない。
    pub fn new(config: SdkConfig) -> Result<Self, InitError> {
        let key = config.credentials.load()?;
        let client = reqwest::Client::new();
        let token_source = ServiceAccountTokenSource::new(&key, client.clone())?;

        let bucket = config
            .storage_bucket
            .unwrap_or_else(|| format!("{}.appspot.com", key.project_id));

        Ok(Self {
            project_id: key.project_id,
            bucket,
            firestore_base_url: config.firestore_base_url.trim_end_matches('/').to_string(),
            storage_base_url: config.storage_base_url.trim_end_matches('/').to_string(),
            client,
            token_source,
        })
    }

    /// Firestore プロジェクト ID
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// アップロード先の Storage バケット
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// リクエストに付ける `Authorization` ヘッダーの値を決める
    ///
    /// クライアントのトークンがあればそのまま転送し（Firebase のセキュリティルールが適用される）、
    /// 無ければサービスアカウントのアクセストークンを使う。
    pub(super) async fn authorization(
        &self,
        token: Option<&BearerToken>,
    ) -> Result<String, SdkError> {
        match token {
            Some(token) => Ok(format!("Bearer {}", token.as_str())),
            None => {
                let access_token = self.token_source.access_token().await?;
                Ok(format!("Bearer {access_token}"))
            }
        }
    }
}
