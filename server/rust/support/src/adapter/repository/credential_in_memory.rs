use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entity::SessionCredentials;
use crate::domain::repository::CredentialStore;

/// InMemoryCredentialStore はプロセス内に認証情報を保持するストア。
/// プロセス再起動でセッションは失われる。
pub struct InMemoryCredentialStore {
    sessions: RwLock<HashMap<String, SessionCredentials>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self, session_id: &str) -> anyhow::Result<Option<SessionCredentials>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn store(&self, session_id: &str, credentials: SessionCredentials) -> anyhow::Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.to_string(), credentials);
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> anyhow::Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}
