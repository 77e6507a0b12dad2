use serde::Deserialize;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

/// ================================
/// Token issuing
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret. May be given base64-encoded with a `base64:` prefix.
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u64,
    /// JSON file the email -> token map is persisted to. In-memory only when unset.
    pub store_path: Option<String>,
}

/// ================================
/// Upstream (cbr.ru) access
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    #[serde(default = "default_daily_url")]
    pub daily_url: String,
    #[serde(default = "default_dynamics_url")]
    pub dynamics_url: String,
    pub retry: Option<RetryConfig>,
    /// Total per-request timeout. The upstream enforces none of its own.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// When true, dynamics records whose code is missing from the catalog are
    /// emitted with null enrichment instead of being dropped.
    #[serde(default)]
    pub include_unlisted_codes: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            daily_url: default_daily_url(),
            dynamics_url: default_dynamics_url(),
            retry: None,
            request_timeout_secs: default_request_timeout_secs(),
            include_unlisted_codes: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    /// fixed delay between connection-failure retries
    pub backoff_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
        }
    }
}

/// ================================
/// File utilities
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FilesConfig {
    /// Path served by GET /file/download.
    pub download_path: Option<String>,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_token_ttl_days() -> u64 {
    365
}

fn default_catalog_url() -> String {
    "https://www.cbr.ru/scripts/XML_valFull.asp".to_string()
}

fn default_daily_url() -> String {
    "https://www.cbr.ru/scripts/XML_daily.asp".to_string()
}

fn default_dynamics_url() -> String {
    "https://www.cbr.ru/scripts/XML_dynamic.asp".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}
