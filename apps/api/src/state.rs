//! # 共有状態
//!
//! プロセス起動時に一度だけ構築し、全リクエストで読み取り専用に共有する。

use std::sync::Arc;

use fn7_sdk::DataStore;

use crate::{auth::AuthMode, error::ApiError};

/// ハンドラ間で共有する状態
pub struct AppState {
    /// SDK クライアント。起動時の初期化に失敗した場合は `None`
    sdk:       Option<Arc<dyn DataStore>>,
    /// `Authorization` ヘッダーが無いリクエストの扱い
    auth_mode: AuthMode,
}

impl AppState {
    pub fn new(sdk: Option<Arc<dyn DataStore>>, auth_mode: AuthMode) -> Self {
        Self { sdk, auth_mode }
    }

    /// SDK が初期化済みか
    pub fn sdk_initialized(&self) -> bool {
        self.sdk.is_some()
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    /// SDK クライアントを取得する。未初期化なら [`ApiError::SdkNotInitialized`]
    pub fn sdk(&self) -> Result<&dyn DataStore, ApiError> {
        self.sdk.as_deref().ok_or(ApiError::SdkNotInitialized)
    }
}
