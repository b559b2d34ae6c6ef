//! # トークン
//!
//! - [`BearerToken`]: クライアントから受け取ったトークン。中身は検証せずそのまま Firebase に渡す
//! - [`ServiceAccountTokenSource`]: トークンが無いときに使うサービスアカウントのアクセストークン
//!
//! サービスアカウントのアクセストークンは OAuth2 JWT Bearer グラント（RFC 7523）で取得する。
//! RS256 で署名したアサーションを `token_uri` に POST し、返ってきたトークンを
//! 有効期限の少し前までキャッシュする。

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    credentials::ServiceAccountKey,
    error::{InitError, SdkError},
    response::handle_response,
};

/// Firestore と Storage にアクセスするためのスコープ
const SCOPES: &str =
    "https://www.googleapis.com/auth/datastore https://www.googleapis.com/auth/devstorage.read_write";

/// JWT Bearer グラントの grant_type
const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// アサーションの有効期間（Google の上限は 1 時間）
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// 有効期限のこれだけ前にトークンを取り直す
const REFRESH_MARGIN_SECS: i64 = 60;

/// クライアントから受け取ったベアラートークン
///
/// 空文字列も「トークンあり」として扱う。トークンが無いことは `Option::None` で表す。
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss:   &'a str,
    scope: &'a str,
    aud:   &'a str,
    iat:   i64,
    exp:   i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in:   i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// トークンの有効期限を計算する
///
/// `expires_in` はトークンエンドポイントが返す値なので信用しない。
/// アサーションの有効期間を上限として切り詰め、表せない値はエラーにする。
fn expires_at(now: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>, SdkError> {
    Duration::try_seconds(expires_in.min(ASSERTION_LIFETIME_SECS))
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| SdkError::Unknown(format!("不正な expires_in です: {expires_in}")))
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at:   DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

/// サービスアカウントのアクセストークン取得元
pub struct ServiceAccountTokenSource {
    client_email: String,
    token_uri:    String,
    key_id:       Option<String>,
    encoding_key: EncodingKey,
    client:       reqwest::Client,
    cache:        Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// サービスアカウントキーから作成する
    ///
    /// 秘密鍵はここでパースするため、不正な鍵は SDK の初期化時点でエラーになる。
    pub fn new(key: &ServiceAccountKey, client: reqwest::Client) -> Result<Self, InitError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(InitError::InvalidPrivateKey)?;

        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            key_id: key.private_key_id.clone(),
            encoding_key,
            client,
            cache: Mutex::new(None),
        })
    }

    /// アクセストークンを取得する
    ///
    /// キャッシュが有効ならそれを返す。ロックを保持したまま取得するので、
    /// 同時に呼ばれても取り直しは 1 回だけになる。
    pub async fn access_token(&self) -> Result<String, SdkError> {
        let mut cache = self.cache.lock().await;
        let now = Utc::now();

        if let Some(cached) = cache.as_ref()
            && cached.is_fresh(now)
        {
            return Ok(cached.access_token.clone());
        }

        let fresh = self.fetch(now).await?;
        let access_token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(access_token)
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<CachedToken, SdkError> {
        let assertion = self.assertion(now)?;

        tracing::debug!(token_uri = %self.token_uri, "サービスアカウントのアクセストークンを取得します");

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let body: TokenResponse = handle_response(response).await?;

        Ok(CachedToken {
            expires_at:   expires_at(now, body.expires_in)?,
            access_token: body.access_token,
        })
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, SdkError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key_id);

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| SdkError::Unknown(format!("アサーションの署名に失敗しました: {e}")))
    }
}
