//! 統合テスト共通のスタブとヘルパー

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    response::Response,
};
use fn7_api::{app_builder::build_app, auth::AuthMode, state::AppState};
use fn7_sdk::{BearerToken, DataStore, DocumentStore, FileStore, SdkError, UploadFile};
use serde_json::{Map, Value};

/// スタブが受け取った呼び出し
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        collection: String,
        id:         String,
        token:      Option<String>,
    },
    Create {
        collection: String,
        id:         String,
        data:       Map<String, Value>,
        token:      Option<String>,
    },
    Update {
        collection: String,
        id:         String,
        data:       Map<String, Value>,
        token:      Option<String>,
    },
    Delete {
        collection: String,
        id:         String,
        token:      Option<String>,
    },
    Upload {
        files: Vec<UploadFile>,
        token: Option<String>,
    },
}

/// 呼び出しを記録し、固定の結果を返す DataStore
pub struct StubDataStore {
    calls:    Mutex<Vec<Call>>,
    document: Result<Value, SdkError>,
    urls:     Result<Vec<String>, SdkError>,
}

impl StubDataStore {
    /// すべてのドキュメント操作で `document` を返す
    pub fn returning(document: Value) -> Self {
        Self {
            calls:    Mutex::new(Vec::new()),
            document: Ok(document),
            urls:     Ok(Vec::new()),
        }
    }

    /// すべての操作で `err` を返す
    pub fn failing(err: SdkError) -> Self {
        Self {
            calls:    Mutex::new(Vec::new()),
            document: Err(err.clone()),
            urls:     Err(err),
        }
    }

    /// アップロードで `urls` を返す
    pub fn uploading(urls: Vec<String>) -> Self {
        Self {
            calls:    Mutex::new(Vec::new()),
            document: Ok(Value::Null),
            urls:     Ok(urls),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn token_string(token: Option<&BearerToken>) -> Option<String> {
    token.map(|t| t.as_str().to_string())
}

#[async_trait]
impl DocumentStore for StubDataStore {
    async fn get_data(
        &self,
        collection: &str,
        id: &str,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError> {
        self.record(Call::Get {
            collection: collection.to_string(),
            id:         id.to_string(),
            token:      token_string(token),
        });
        self.document.clone()
    }

    async fn create_data(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError> {
        self.record(Call::Create {
            collection: collection.to_string(),
            id:         id.to_string(),
            data:       data.clone(),
            token:      token_string(token),
        });
        self.document.clone()
    }

    async fn update_data(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError> {
        self.record(Call::Update {
            collection: collection.to_string(),
            id:         id.to_string(),
            data:       data.clone(),
            token:      token_string(token),
        });
        self.document.clone()
    }

    async fn delete_data(
        &self,
        collection: &str,
        id: &str,
        token: Option<&BearerToken>,
    ) -> Result<(), SdkError> {
        self.record(Call::Delete {
            collection: collection.to_string(),
            id:         id.to_string(),
            token:      token_string(token),
        });
        self.document.clone().map(|_| ())
    }
}

#[async_trait]
impl FileStore for StubDataStore {
    async fn upload_to_storage(
        &self,
        files: &[UploadFile],
        token: Option<&BearerToken>,
    ) -> Result<Vec<String>, SdkError> {
        self.record(Call::Upload {
            files: files.to_vec(),
            token: token_string(token),
        });
        self.urls.clone()
    }
}

/// スタブを注入したルーターを構築する
pub fn app_with(stub: Arc<StubDataStore>, auth_mode: AuthMode) -> Router {
    let sdk: Arc<dyn DataStore> = stub;
    build_app(Arc::new(AppState::new(Some(sdk), auth_mode)))
}

/// SDK 未初期化のルーターを構築する
pub fn app_without_sdk(auth_mode: AuthMode) -> Router {
    build_app(Arc::new(AppState::new(None, auth_mode)))
}

/// レスポンスボディを JSON として読み出す
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
