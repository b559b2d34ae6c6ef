//! # データアクセスクライアント
//!
//! API サーバーが依存する唯一の境界。Firestore のドキュメント操作と
//! Firebase Storage へのアップロードをトレイトとして公開する。
//!
//! - [`DocumentStore`]: ドキュメントの取得・作成・更新・削除
//! - [`FileStore`]: ファイルのアップロード
//! - [`DataStore`]: 上記を束ねるスーパートレイト
//! - [`Fn7Sdk`]: Firebase REST API を使った実装

mod document_client;
mod file_client;
mod sdk_impl;

pub use document_client::DocumentStore;
pub use file_client::{FileStore, UploadFile};
pub use sdk_impl::Fn7Sdk;

/// データアクセスクライアントトレイト（スーパートレイト）
///
/// テスト時にはサブトレイト単位でスタブを使用できる。
/// `Arc<dyn DataStore>` として API サーバーの状態に保持する。
pub trait DataStore: DocumentStore + FileStore {}

/// ブランケット impl: 2 つのサブトレイトを実装する型は自動的に `DataStore` を実装する。
impl<T> DataStore for T where T: DocumentStore + FileStore {}
