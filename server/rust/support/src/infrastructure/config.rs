use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::entity::CustomFieldIds;
use crate::domain::service::freshness::DEFAULT_FRESHNESS_WINDOW_SECS;

/// Config はアプリケーション全体の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// 未設定の場合ヘルプデスク連携は利用不可となり、チケット系 API は 503 を返す。
    #[serde(default)]
    pub helpdesk: Option<HelpdeskConfig>,
    #[serde(default)]
    pub support: SupportConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// AppConfig はアプリケーション基本設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

/// ServerConfig はサーバー設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// アップロード API のリクエストボディ上限（バイト）。
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

/// LogConfig はログ出力形式の設定。
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

fn default_log_format() -> String {
    "json".to_string()
}

/// HelpdeskConfig はヘルプデスク（Zendesk 互換 REST API）連携の設定。
#[derive(Debug, Clone, Deserialize)]
pub struct HelpdeskConfig {
    /// API のベース URL（例: https://example.zendesk.com/api/v2）。
    pub url: String,
    pub custom_field_version: u64,
    pub custom_field_severity: u64,
    #[serde(default = "default_helpdesk_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_helpdesk_timeout_secs() -> u64 {
    30
}

impl HelpdeskConfig {
    pub fn custom_fields(&self) -> CustomFieldIds {
        CustomFieldIds {
            version: self.custom_field_version,
            severity: self.custom_field_severity,
        }
    }
}

/// SupportConfig はサポート契約確認と最新バージョン確認の設定。
#[derive(Debug, Clone, Deserialize)]
pub struct SupportConfig {
    /// ローカルの製品バージョン。空の場合サポート確認は常に失敗する。
    #[serde(default)]
    pub product_version: String,
    #[serde(default)]
    pub token_remote_support: Option<SecretString>,
    #[serde(default = "default_enterprise_repo_url")]
    pub enterprise_repo_url: String,
    #[serde(default = "default_release_tags_url")]
    pub release_tags_url: String,
    #[serde(default = "default_release_tag_prefix")]
    pub release_tag_prefix: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: i64,
    #[serde(default = "default_check_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            product_version: String::new(),
            token_remote_support: None,
            enterprise_repo_url: default_enterprise_repo_url(),
            release_tags_url: default_release_tags_url(),
            release_tag_prefix: default_release_tag_prefix(),
            user_agent: default_user_agent(),
            check_interval_secs: default_check_interval_secs(),
            timeout_secs: default_check_timeout_secs(),
        }
    }
}

impl SupportConfig {
    /// 空文字列のトークンは未設定として扱う。
    pub fn remote_support_token(&self) -> Option<SecretString> {
        self.token_remote_support
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
            .cloned()
    }

    pub fn check_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.check_interval_secs)
    }
}

fn default_enterprise_repo_url() -> String {
    "https://downloads.opennebula.systems/repo/<VERSION>/".to_string()
}

fn default_release_tags_url() -> String {
    "https://api.github.com/repos/opennebula/one/tags".to_string()
}

fn default_release_tag_prefix() -> String {
    "release-".to_string()
}

fn default_user_agent() -> String {
    "One".to_string()
}

fn default_check_interval_secs() -> i64 {
    DEFAULT_FRESHNESS_WINDOW_SECS
}

fn default_check_timeout_secs() -> u64 {
    10
}

/// UploadConfig はアップロードファイルを配置する一時ディレクトリの設定。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl UploadConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// SessionConfig はセッション Cookie の設定。
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_secure: false,
        }
    }
}

fn default_cookie_name() -> String {
    "support_session".to_string()
}

impl Config {
    /// YAML 文字列から設定を読み込む。
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// 設定ファイルパスから設定を読み込む。
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
