use async_trait::async_trait;
use serde::Deserialize;

/// RemoteCheckError はサポート確認・バージョン確認の外部呼び出しエラー。
/// 呼び出し側で劣化レスポンスに変換され、利用者には返らない。
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteCheckError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// ReleaseTag はタグ一覧 API の 1 要素。name 以外のフィールドは無視する。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseTag {
    #[serde(default)]
    pub name: Option<String>,
}

/// TagFetch はタグ一覧取得の結果。HTTP 200 以外は Rejected。
#[derive(Debug, Clone, PartialEq)]
pub enum TagFetch {
    Listed(Vec<ReleaseTag>),
    Rejected(u16),
}

/// EntitlementGateway はエンタープライズリポジトリへの認証付きアクセスを試みる。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntitlementGateway: Send + Sync {
    /// url に Basic 認証（token）で GET し、HTTP ステータスコードを返す。
    async fn probe(&self, url: &str, token: &str) -> Result<u16, RemoteCheckError>;
}

/// ReleaseTagGateway はソースフォージのタグ一覧を取得する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseTagGateway: Send + Sync {
    async fn fetch_tags(&self) -> Result<TagFetch, RemoteCheckError>;
}
