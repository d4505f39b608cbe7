use std::sync::Arc;

use tracing::info;

use crate::domain::entity::SupportTicket;
use crate::domain::repository::{CommentDraft, TicketUpdate};
use crate::error::SupportError;
use crate::usecase::HelpdeskGate;

/// CommentTicketInput はチケットへのコメント追加・解決操作の入力。
#[derive(Debug, Clone, Default)]
pub struct CommentTicketInput {
    pub comment: Option<String>,
    pub solved: bool,
}

/// CommentTicketUseCase はチケットへのコメント追加ユースケース。
pub struct CommentTicketUseCase {
    gate: Arc<HelpdeskGate>,
}

impl CommentTicketUseCase {
    pub fn new(gate: Arc<HelpdeskGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: Option<&str>,
        id: u64,
        input: CommentTicketInput,
    ) -> Result<SupportTicket, SupportError> {
        self.gate.ensure_available()?;

        let body = input
            .comment
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SupportError::Forbidden("Missing comment message".to_string()))?;

        let session = self.gate.open(session_id).await?;
        session.find_ticket(id).await?;

        let update = TicketUpdate {
            comment: CommentDraft {
                body,
                uploads: vec![],
            },
            solved: input.solved,
        };
        // 保存失敗はそのまま内部エラーとして返す
        let ticket = session
            .client()
            .update_request(id, update)
            .await
            .map_err(|e| SupportError::Internal(e.to_string()))?;

        info!(ticket_id = id, solved = input.solved, "support request commented");
        Ok(session.translate(ticket))
    }
}
