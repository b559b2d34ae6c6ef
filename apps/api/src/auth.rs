//! # トークン抽出
//!
//! `Authorization: Bearer <token>` ヘッダーからトークンを取り出す。
//! トークンの中身は検証しない（検証は Firebase 側で行われる）。
//!
//! ## ヘッダーが無い場合
//!
//! [`AuthMode`] で挙動が変わる:
//!
//! | モード | ヘッダーなし | 形式不正 |
//! |--------|--------------|----------|
//! | `Local`（デフォルト） | トークンなしで続行（SDK のサービスアカウントを使用） | 401 |
//! | `Strict` | 401 | 401 |

use axum::http::{HeaderMap, header::AUTHORIZATION};
use fn7_sdk::BearerToken;

use crate::error::ApiError;

/// トークンの前に付く固定のプレフィックス
const BEARER_PREFIX: &str = "Bearer ";

/// ヘッダーが無いリクエストの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// ヘッダーが無ければトークンなしとして SDK に委ねる
    #[default]
    Local,
    /// ヘッダー必須
    Strict,
}

impl AuthMode {
    /// `AUTH_MODE` の値をパースする（大文字小文字は区別しない）
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("local") {
            Some(Self::Local)
        } else if s.eq_ignore_ascii_case("strict") {
            Some(Self::Strict)
        } else {
            None
        }
    }
}

/// `Authorization` ヘッダーからベアラートークンを取り出す
///
/// - ヘッダーなし: `Local` なら `Ok(None)`、`Strict` なら [`ApiError::MissingAuthorization`]
/// - `"Bearer "` で始まらない（ASCII 以外を含む場合も）: [`ApiError::InvalidAuthorization`]
/// - それ以外: プレフィックス以降をそのままトークンとする（空文字列もトークンとして扱う）
pub fn extract_bearer_token(
    headers: &HeaderMap,
    mode: AuthMode,
) -> Result<Option<BearerToken>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return match mode {
            AuthMode::Local => Ok(None),
            AuthMode::Strict => Err(ApiError::MissingAuthorization),
        };
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(ApiError::InvalidAuthorization)?;

    Ok(Some(BearerToken::new(token)))
}
