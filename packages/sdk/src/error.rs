//! # SDK エラー定義
//!
//! - [`SdkError`]: データアクセス呼び出しの失敗。Firebase の HTTP ステータスから分類する
//! - [`InitError`]: SDK 構築時の失敗（認証情報の欠落・不正など）
//!
//! `SdkError` の `Display` は Firebase が返したメッセージそのものを出力する。
//! 呼び出し側はこの文字列をクライアントにそのまま返せる。

use thiserror::Error;

/// データアクセス呼び出しのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// ドキュメントが存在しない（404）
    #[error("{0}")]
    NotFound(String),

    /// 認証・認可の失敗（401 / 403）
    #[error("{0}")]
    Unauthorized(String),

    /// 一時的に利用できない（429 / 502 / 503 / 504、通信エラー）
    #[error("{0}")]
    Unavailable(String),

    /// 上記以外
    #[error("{0}")]
    Unknown(String),
}

impl SdkError {
    /// HTTP ステータスとエラーメッセージから分類する
    pub fn from_status(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status.as_u16() {
            404 => SdkError::NotFound(message),
            401 | 403 => SdkError::Unauthorized(message),
            429 | 502 | 503 | 504 => SdkError::Unavailable(message),
            _ => SdkError::Unknown(message),
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SdkError::Unknown(format!("レスポンスのデコードに失敗しました: {err}"))
        } else {
            SdkError::Unavailable(err.to_string())
        }
    }
}

/// SDK 構築時のエラー
#[derive(Debug, Error)]
pub enum InitError {
    /// 認証情報の環境変数がどちらも設定されていない
    #[error(
        "FIREBASE_SERVICE_ACCOUNT_JSON または FIREBASE_SERVICE_ACCOUNT_PATH を設定してください"
    )]
    MissingCredentials,

    /// 認証情報の環境変数が両方設定されている
    #[error(
        "FIREBASE_SERVICE_ACCOUNT_JSON と FIREBASE_SERVICE_ACCOUNT_PATH は同時に設定できません"
    )]
    AmbiguousCredentials,

    /// サービスアカウントキーファイルを読めない
    #[error("サービスアカウントキーを読み込めません（{path}）: {source}")]
    ReadKeyFile {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    /// サービスアカウントキーの JSON が不正
    #[error("サービスアカウントキーの形式が不正です: {0}")]
    InvalidKey(#[source] serde_json::Error),

    /// 秘密鍵を RS256 署名鍵としてパースできない
    #[error("秘密鍵を読み込めません: {0}")]
    InvalidPrivateKey(#[source] jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(StatusCode::NOT_FOUND, SdkError::NotFound("m".to_string()))]
    #[case(StatusCode::UNAUTHORIZED, SdkError::Unauthorized("m".to_string()))]
    #[case(StatusCode::FORBIDDEN, SdkError::Unauthorized("m".to_string()))]
    #[case(StatusCode::TOO_MANY_REQUESTS, SdkError::Unavailable("m".to_string()))]
    #[case(StatusCode::SERVICE_UNAVAILABLE, SdkError::Unavailable("m".to_string()))]
    #[case(StatusCode::BAD_REQUEST, SdkError::Unknown("m".to_string()))]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, SdkError::Unknown("m".to_string()))]
    fn test_ステータスコードからエラーを分類する(
        #[case] status: StatusCode,
        #[case] expected: SdkError,
    ) {
        assert_eq!(SdkError::from_status(status, "m"), expected);
    }

    #[test]
    fn test_displayはメッセージのみを出力する() {
        let err = SdkError::Unknown("boom".to_string());
        assert_eq!(err.to_string(), "boom");
    }
}
