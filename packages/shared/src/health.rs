//! # ヘルスチェック共通型
//!
//! `/health` エンドポイントのレスポンス型を提供する。

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// `status` は常に `"ok"`。`sdk_initialized` は起動時の SDK 初期化結果を示す。
///
/// ## 使用例
///
/// ```
/// use fn7_shared::HealthResponse;
///
/// let response = HealthResponse::ok(true);
/// assert_eq!(response.status, "ok");
/// assert!(response.sdk_initialized);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態（`"ok"` 固定）
    pub status:          String,
    /// SDK が起動時に初期化できたか
    pub sdk_initialized: bool,
}

impl HealthResponse {
    /// 稼働中のレスポンスを作成する
    pub fn ok(sdk_initialized: bool) -> Self {
        Self {
            status: "ok".to_string(),
            sdk_initialized,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let json = serde_json::to_value(HealthResponse::ok(false)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "ok",
                "sdk_initialized": false
            })
        );
    }
}
