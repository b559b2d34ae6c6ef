//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定、Request ID の生成を提供する。
//! 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替えに対応する。

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_DIRECTIVES: &str = "info,fn7=debug";

/// ログ出力形式（`LOG_FORMAT`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON。ログ収集基盤に流す本番向け
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `json` / `pretty` をパースする（大文字小文字は区別しない）
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if s.eq_ignore_ascii_case("pretty") {
            Some(Self::Pretty)
        } else {
            None
        }
    }

    /// `LOG_FORMAT` から読み取る。未設定なら `Pretty`
    ///
    /// 不正な値も `Pretty` として扱う。トレーシング初期化前なので警告は stderr に出す。
    pub fn from_env() -> Self {
        let Ok(value) = std::env::var("LOG_FORMAT") else {
            return Self::default();
        };
        Self::parse(&value).unwrap_or_else(|| {
            eprintln!("WARNING: LOG_FORMAT={value:?} は不明な値です。pretty で出力します");
            Self::default()
        })
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// [`init_tracing`] が返すルートスパンの `service` フィールドに出す名前
    pub service_name:       String,
    pub log_format:         LogFormat,
    /// `RUST_LOG` が未設定のときに使うフィルタ
    pub default_directives: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_directives: DEFAULT_DIRECTIVES.to_string(),
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }

}

/// グローバルサブスクライバーを登録する
///
/// フィルタは `RUST_LOG` を優先し、無ければ [`TracingConfig::default_directives`] を使う。
/// JSON 形式ではイベントのフィールドをトップレベルに展開し、現在のスパン
/// （`request_id` を持つ `request` スパンなど）を `span` として出力する。
///
/// 戻り値はサービスのルートスパン（`app`、`service` フィールド付き）。
/// 呼び出し元で `entered()` しておくと、以降のログすべてにサービス名が付く。
///
/// 2 回目以降の呼び出しはサブスクライバーを登録せず、ルートスパンだけを返す。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) -> tracing::Span {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directives));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!(
            "WARNING: サブスクライバーは登録済みです（service={}）",
            config.service_name
        );
    }

    tracing::info_span!("app", service = %config.service_name)
}

/// Request ID ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// UUID v7 で Request ID を生成する `MakeRequestId` 実装
///
/// `SetRequestIdLayer` と組み合わせて使う。
/// クライアントが `X-Request-Id` を送ってきた場合はそちらが優先される。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// `TraceLayer` 用のスパンを作成する
///
/// `SetRequestIdLayer` の内側で呼ばれる前提で、`x-request-id` ヘッダーの値を
/// `request_id` フィールドとしてスパンに含める。これによりリクエスト中の全ログに
/// Request ID が付与される。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
