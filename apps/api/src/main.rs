//! # FN7 API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `8000`） |
//! | `AUTH_MODE` | No | `local`（デフォルト）/ `strict` |
//! | `FIREBASE_SERVICE_ACCOUNT_JSON` | ※ | サービスアカウントキー（JSON 文字列） |
//! | `FIREBASE_SERVICE_ACCOUNT_PATH` | ※ | サービスアカウントキーのファイルパス |
//! | `FIREBASE_STORAGE_BUCKET` | No | Storage バケット（デフォルト: `<project_id>.appspot.com`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,fn7=debug`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト） |
//!
//! ※ どちらか一方を設定する。未設定でもサーバーは起動するが、
//! `/health` 以外のエンドポイントは 500 を返す。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p fn7-api
//!
//! # 本番環境
//! AUTH_MODE=strict FIREBASE_SERVICE_ACCOUNT_PATH=/secrets/sa.json \
//!   LOG_FORMAT=json cargo run -p fn7-api --release
//! ```

use std::sync::Arc;

use anyhow::Context;
use fn7_api::{app_builder::build_app, auth::AuthMode, config::ApiConfig, state::AppState};
use fn7_sdk::{DataStore, Fn7Sdk};
use fn7_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. SDK の初期化（失敗してもサーバーは起動する）
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let _tracing_guard = init_tracing(TracingConfig::from_env("api")).entered();

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!("API サーバーを起動します: {}:{}", config.host, config.port);

    if config.auth_mode == AuthMode::Local {
        tracing::warn!(
            "AUTH_MODE=local: Authorization ヘッダーの無いリクエストはサービスアカウント権限で処理されます"
        );
    }

    let state = Arc::new(AppState::new(init_sdk(), config.auth_mode));
    let app = build_app(state);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("{}:{} にバインドできません", config.host, config.port))?;
    tracing::info!("API サーバーが起動しました: {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// SDK を初期化する
///
/// 失敗はプロセスを止めず、`None` として扱う（`/health` で状態を確認できる）。
fn init_sdk() -> Option<Arc<dyn DataStore>> {
    match Fn7Sdk::from_env() {
        Ok(sdk) => {
            tracing::info!(
                project_id = sdk.project_id(),
                bucket = sdk.bucket(),
                "FN7 SDK を初期化しました"
            );
            Some(Arc::new(sdk))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "FN7 SDK を初期化できませんでした。FIREBASE_SERVICE_ACCOUNT_JSON または \
                 FIREBASE_SERVICE_ACCOUNT_PATH を確認してください"
            );
            None
        }
    }
}
