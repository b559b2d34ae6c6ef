//! Firebase Storage へのアップロード

use async_trait::async_trait;
use serde::Deserialize;

use super::sdk_impl::Fn7Sdk;
use crate::{error::SdkError, response::handle_response, token::BearerToken};

/// アップロードするファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// バケット内のオブジェクト名（`/` を含めてよい）
    pub name:    String,
    pub content: Vec<u8>,
}

/// ファイル保存トレイト
#[async_trait]
pub trait FileStore: Send + Sync {
    /// ファイルを順にアップロードし、ダウンロード URL を同じ順で返す
    ///
    /// 途中で失敗した場合はそこで中断する（アップロード済みのファイルは残る）。
    async fn upload_to_storage(
        &self,
        files: &[UploadFile],
        token: Option<&BearerToken>,
    ) -> Result<Vec<String>, SdkError>;
}

/// アップロード API のレスポンス（使うフィールドのみ）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageObject {
    name:            String,
    /// カンマ区切りで複数返ることがある
    #[serde(default)]
    download_tokens: Option<String>,
}

impl Fn7Sdk {
    fn objects_url(&self) -> String {
        format!(
            "{}/v0/b/{}/o",
            self.storage_base_url,
            urlencoding::encode(&self.bucket)
        )
    }

    fn download_url(&self, object: &StorageObject) -> String {
        let base = format!("{}/{}?alt=media", self.objects_url(), urlencoding::encode(&object.name));
        match object
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .filter(|token| !token.is_empty())
        {
            Some(token) => format!("{base}&token={}", urlencoding::encode(token)),
            None => base,
        }
    }
}

#[async_trait]
impl FileStore for Fn7Sdk {
    #[tracing::instrument(skip_all, fields(bucket = %self.bucket, count = files.len()))]
    async fn upload_to_storage(
        &self,
        files: &[UploadFile],
        token: Option<&BearerToken>,
    ) -> Result<Vec<String>, SdkError> {
        let authorization = self.authorization(token).await?;
        let mut urls = Vec::with_capacity(files.len());

        for file in files {
            let response = self
                .client
                .post(self.objects_url())
                .query(&[("name", file.name.as_str())])
                .header(reqwest::header::AUTHORIZATION, &authorization)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(file.content.clone())
                .send()
                .await?;

            let object: StorageObject = handle_response(response).await?;
            tracing::debug!(name = %object.name, "ファイルをアップロードしました");
            urls.push(self.download_url(&object));
        }

        Ok(urls)
    }
}
