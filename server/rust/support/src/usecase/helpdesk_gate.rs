use std::sync::Arc;

use tracing::warn;

use crate::domain::entity::{CustomFieldIds, RemoteTicket, SupportTicket};
use crate::domain::repository::{
    CredentialStore, HelpdeskClient, HelpdeskConnector, HelpdeskError, HelpdeskUser,
};
use crate::domain::service::translate_ticket;
use crate::error::SupportError;

/// HelpdeskIntegration はヘルプデスク連携が設定されている場合のみ存在する。
#[derive(Clone)]
pub struct HelpdeskIntegration {
    pub connector: Arc<dyn HelpdeskConnector>,
    pub fields: CustomFieldIds,
}

/// HelpdeskSession は認証済みクライアントとカスタムフィールド設定の組。
pub struct HelpdeskSession {
    client: Arc<dyn HelpdeskClient>,
    fields: CustomFieldIds,
}

impl HelpdeskSession {
    pub fn client(&self) -> &dyn HelpdeskClient {
        self.client.as_ref()
    }

    pub fn fields(&self) -> CustomFieldIds {
        self.fields
    }

    pub fn translate(&self, ticket: RemoteTicket) -> SupportTicket {
        translate_ticket(ticket, &self.fields)
    }

    /// ID でチケットを取得する。存在しなければ NotFound。
    pub async fn find_ticket(&self, id: u64) -> Result<RemoteTicket, SupportError> {
        self.client
            .find_request(id)
            .await?
            .ok_or_else(|| SupportError::ticket_not_found(id))
    }
}

/// HelpdeskGate はチケット系操作の前提条件を確認する。
///
/// 1. ヘルプデスク連携が設定されていること（未設定なら ServiceUnavailable）
/// 2. セッションの認証情報でヘルプデスクのユーザーが認証されること（失敗なら Unauthorized）
///
/// リトライは行わない。
pub struct HelpdeskGate {
    integration: Option<HelpdeskIntegration>,
    credential_store: Arc<dyn CredentialStore>,
}

impl HelpdeskGate {
    pub fn new(
        integration: Option<HelpdeskIntegration>,
        credential_store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            integration,
            credential_store,
        }
    }

    pub fn is_available(&self) -> bool {
        self.integration.is_some()
    }

    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        &self.credential_store
    }

    pub fn ensure_available(&self) -> Result<&HelpdeskIntegration, SupportError> {
        self.integration.as_ref().ok_or_else(|| {
            SupportError::ServiceUnavailable("helpdesk integration is not configured".to_string())
        })
    }

    /// セッションの認証情報からクライアントを組み立て、認証済みであることを確認する。
    pub async fn open(&self, session_id: Option<&str>) -> Result<HelpdeskSession, SupportError> {
        let integration = self.ensure_available()?;

        let credentials = match session_id {
            Some(id) => self
                .credential_store
                .load(id)
                .await
                .map_err(|e| SupportError::Internal(e.to_string()))?,
            None => None,
        }
        .ok_or_else(|| {
            SupportError::Unauthorized("Helpdesk credentials not provided".to_string())
        })?;

        let client = integration.connector.connect(&credentials)?;

        match client.current_user().await {
            Ok(Some(HelpdeskUser { id: Some(_) })) => Ok(HelpdeskSession {
                client,
                fields: integration.fields,
            }),
            Ok(_) | Err(HelpdeskError::Unauthorized) => {
                warn!(email = %credentials.email, "helpdesk rejected session credentials");
                Err(SupportError::Unauthorized(
                    "Incorrect helpdesk account credentials".to_string(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}
