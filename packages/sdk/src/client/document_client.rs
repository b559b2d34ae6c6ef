//! Firestore ドキュメント操作

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::sdk_impl::Fn7Sdk;
use crate::{
    error::SdkError,
    response::{handle_empty_response, handle_response},
    token::BearerToken,
    value::{decode_fields, encode_fields},
};

/// ドキュメント操作トレイト
///
/// すべての操作はトークンを任意で受け取る。`None` のときは SDK 側の
/// サービスアカウント認証にフォールバックする。
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// ドキュメントを取得する
    async fn get_data(
        &self,
        collection: &str,
        id: &str,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError>;

    /// ドキュメントを作成する。同じ ID が既に存在する場合はエラー
    async fn create_data(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError>;

    /// 既存ドキュメントの指定フィールドだけを更新する
    async fn update_data(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError>;

    /// ドキュメントを削除する
    async fn delete_data(
        &self,
        collection: &str,
        id: &str,
        token: Option<&BearerToken>,
    ) -> Result<(), SdkError>;
}

impl Fn7Sdk {
    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.firestore_base_url,
            urlencoding::encode(&self.project_id)
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.documents_url(),
            urlencoding::encode(collection),
            urlencoding::encode(id)
        )
    }
}

#[async_trait]
impl DocumentStore for Fn7Sdk {
    #[tracing::instrument(skip_all, fields(collection = %collection, id = %id))]
    async fn get_data(
        &self,
        collection: &str,
        id: &str,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError> {
        let response = self
            .client
            .get(self.document_url(collection, id))
            .header(reqwest::header::AUTHORIZATION, self.authorization(token).await?)
            .send()
            .await?;

        let document: Value = handle_response(response).await?;
        decode_fields(document.get("fields"))
    }

    #[tracing::instrument(skip_all, fields(collection = %collection, id = %id))]
    async fn create_data(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError> {
        let fields = encode_fields(data)?;
        let url = format!(
            "{}/{}",
            self.documents_url(),
            urlencoding::encode(collection)
        );

        let response = self
            .client
            .post(url)
            .query(&[("documentId", id)])
            .header(reqwest::header::AUTHORIZATION, self.authorization(token).await?)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        let document: Value = handle_response(response).await?;
        decode_fields(document.get("fields"))
    }

    #[tracing::instrument(skip_all, fields(collection = %collection, id = %id))]
    async fn update_data(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
        token: Option<&BearerToken>,
    ) -> Result<Value, SdkError> {
        // マスクが空の PATCH はドキュメント全体を置き換えてしまうため、取得だけ行う
        if data.is_empty() {
            return self.get_data(collection, id, token).await;
        }

        let fields = encode_fields(data)?;
        let mut query: Vec<(&str, String)> = data
            .keys()
            .map(|key| ("updateMask.fieldPaths", quote_field_path(key)))
            .collect();
        query.push(("currentDocument.exists", "true".to_string()));

        let response = self
            .client
            .patch(self.document_url(collection, id))
            .query(&query)
            .header(reqwest::header::AUTHORIZATION, self.authorization(token).await?)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        let document: Value = handle_response(response).await?;
        decode_fields(document.get("fields"))
    }

    #[tracing::instrument(skip_all, fields(collection = %collection, id = %id))]
    async fn delete_data(
        &self,
        collection: &str,
        id: &str,
        token: Option<&BearerToken>,
    ) -> Result<(), SdkError> {
        let response = self
            .client
            .delete(self.document_url(collection, id))
            .header(reqwest::header::AUTHORIZATION, self.authorization(token).await?)
            .send()
            .await?;

        handle_empty_response(response).await
    }
}

/// updateMask 用のフィールドパスを作る
///
/// 英数字とアンダースコアのみ（先頭は数字以外）ならそのまま、
/// それ以外はバッククォートで囲み、`` ` `` と `\` をエスケープする。
fn quote_field_path(key: &str) -> String {
    let is_simple = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_simple {
        return key.to_string();
    }

    let escaped = key.replace('\\', "\\\\").replace('`', "\\`");
    format!("`{escaped}`")
}
