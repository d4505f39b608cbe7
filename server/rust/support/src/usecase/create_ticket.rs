use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::entity::SupportTicket;
use crate::domain::repository::{HelpdeskError, NewTicket};
use crate::error::SupportError;
use crate::usecase::HelpdeskGate;

/// CreateTicketInput は POST /support/request のリクエストボディ。
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicketInput {
    pub subject: String,
    pub description: String,
    pub severity: String,
    pub opennebula_version: String,
}

/// CreateTicketUseCase はチケット作成ユースケース。
pub struct CreateTicketUseCase {
    gate: Arc<HelpdeskGate>,
}

impl CreateTicketUseCase {
    pub fn new(gate: Arc<HelpdeskGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: Option<&str>,
        input: CreateTicketInput,
    ) -> Result<SupportTicket, SupportError> {
        let session = self.gate.open(session_id).await?;
        let fields = session.fields();
        let draft = NewTicket {
            subject: input.subject,
            comment_body: input.description,
            custom_fields: vec![
                (fields.severity, input.severity.clone()),
                (fields.version, input.opennebula_version),
            ],
            tags: vec![input.severity],
        };

        match session.client().create_request(draft).await {
            Ok(ticket) => {
                info!(ticket_id = ticket.id, "support request created");
                Ok(session.translate(ticket))
            }
            // 保存失敗はヘルプデスクが返した最初の検証メッセージを 403 で返す
            Err(HelpdeskError::Validation(msg)) => {
                warn!(error = %msg, "helpdesk rejected support request");
                Err(SupportError::Forbidden(msg))
            }
            Err(e) => {
                warn!(error = %e, "failed to create support request");
                Err(SupportError::Forbidden(e.to_string()))
            }
        }
    }
}
