use async_trait::async_trait;

use crate::domain::entity::SessionCredentials;

/// CredentialStore はセッション単位のヘルプデスク認証情報を保持するストア。
/// 実装を差し替えることでインメモリ・外部セッションストア・シークレットストアを切り替えられる。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// セッションに紐づく認証情報を取得する。
    async fn load(&self, session_id: &str) -> anyhow::Result<Option<SessionCredentials>>;

    /// セッションに認証情報を保存する（既存の値は上書き）。
    async fn store(&self, session_id: &str, credentials: SessionCredentials) -> anyhow::Result<()>;

    /// セッションの認証情報を削除する。
    async fn clear(&self, session_id: &str) -> anyhow::Result<()>;
}
