use std::sync::Arc;

use tracing::info;

use crate::domain::entity::SessionCredentials;
use crate::error::SupportError;
use crate::usecase::HelpdeskGate;

/// StoreCredentialsUseCase はセッションへヘルプデスク認証情報を保存し、検証する。
/// 検証に失敗しても保存済みの認証情報は残る。
pub struct StoreCredentialsUseCase {
    gate: Arc<HelpdeskGate>,
}

impl StoreCredentialsUseCase {
    pub fn new(gate: Arc<HelpdeskGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: &str,
        credentials: SessionCredentials,
    ) -> Result<(), SupportError> {
        self.gate.ensure_available()?;

        let email = credentials.email.clone();
        self.gate
            .credential_store()
            .store(session_id, credentials)
            .await
            .map_err(|e| SupportError::Internal(e.to_string()))?;
        info!(email = %email, "helpdesk credentials stored");

        self.gate.open(Some(session_id)).await?;
        Ok(())
    }
}

/// ClearCredentialsUseCase はセッションの認証情報を削除する。
pub struct ClearCredentialsUseCase {
    gate: Arc<HelpdeskGate>,
}

impl ClearCredentialsUseCase {
    pub fn new(gate: Arc<HelpdeskGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(&self, session_id: Option<&str>) -> Result<(), SupportError> {
        self.gate.ensure_available()?;

        if let Some(id) = session_id {
            self.gate
                .credential_store()
                .clear(id)
                .await
                .map_err(|e| SupportError::Internal(e.to_string()))?;
        }
        info!("helpdesk credentials cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::CustomFieldIds;
    use crate::domain::repository::credential_store::MockCredentialStore;
    use crate::domain::repository::helpdesk::{MockHelpdeskClient, MockHelpdeskConnector};
    use crate::domain::repository::{HelpdeskClient, HelpdeskError, HelpdeskUser};
    use crate::usecase::HelpdeskIntegration;

    fn gate(store: MockCredentialStore, client: MockHelpdeskClient) -> Arc<HelpdeskGate> {
        let client: Arc<dyn HelpdeskClient> = Arc::new(client);
        let mut connector = MockHelpdeskConnector::new();
        connector
            .expect_connect()
            .returning(move |_| Ok(client.clone()));
        Arc::new(HelpdeskGate::new(
            Some(HelpdeskIntegration {
                connector: Arc::new(connector),
                fields: CustomFieldIds {
                    version: 1,
                    severity: 2,
                },
            }),
            Arc::new(store),
        ))
    }

    #[tokio::test]
    async fn test_store_then_validate() {
        let mut store = MockCredentialStore::new();
        store
            .expect_store()
            .withf(|id, creds| id == "s1" && creds.email == "ops@example.com")
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_load()
            .returning(|_| Ok(Some(SessionCredentials::new("ops@example.com", "pw"))));
        let mut client = MockHelpdeskClient::new();
        client.expect_current_user().times(1).returning(|| {
            Ok(Some(HelpdeskUser { id: Some(10) }))
        });
        let uc = StoreCredentialsUseCase::new(gate(store, client));

        let result = uc
            .execute("s1", SessionCredentials::new("ops@example.com", "pw"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_store_with_bad_credentials_keeps_them() {
        let mut store = MockCredentialStore::new();
        store.expect_store().times(1).returning(|_, _| Ok(()));
        store
            .expect_load()
            .returning(|_| Ok(Some(SessionCredentials::new("ops@example.com", "bad"))));
        store.expect_clear().never();
        let mut client = MockHelpdeskClient::new();
        client
            .expect_current_user()
            .returning(|| Err(HelpdeskError::Unauthorized));
        let uc = StoreCredentialsUseCase::new(gate(store, client));

        let result = uc
            .execute("s1", SessionCredentials::new("ops@example.com", "bad"))
            .await;
        assert!(matches!(result, Err(SupportError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_clear_removes_session_credentials() {
        let mut store = MockCredentialStore::new();
        store
            .expect_clear()
            .withf(|id| id == "s1")
            .times(1)
            .returning(|_| Ok(()));
        let uc = ClearCredentialsUseCase::new(gate(store, MockHelpdeskClient::new()));

        assert!(uc.execute(Some("s1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_without_session_is_noop() {
        let mut store = MockCredentialStore::new();
        store.expect_clear().never();
        let uc = ClearCredentialsUseCase::new(gate(store, MockHelpdeskClient::new()));

        assert!(uc.execute(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_credentials_without_integration_are_unavailable() {
        let gate = Arc::new(HelpdeskGate::new(None, Arc::new(MockCredentialStore::new())));
        let store_uc = StoreCredentialsUseCase::new(gate.clone());
        let clear_uc = ClearCredentialsUseCase::new(gate);

        let result = store_uc
            .execute("s1", SessionCredentials::new("ops@example.com", "pw"))
            .await;
        assert!(matches!(result, Err(SupportError::ServiceUnavailable(_))));
        let result = clear_uc.execute(Some("s1")).await;
        assert!(matches!(result, Err(SupportError::ServiceUnavailable(_))));
    }
}
