use std::sync::Arc;

use crate::domain::entity::SupportTicketPool;
use crate::error::SupportError;
use crate::usecase::HelpdeskGate;

/// 一覧取得の対象とするチケットステータス。
pub const OPEN_PENDING_FILTER: &str = "open,pending";

/// ListTicketsUseCase は open / pending のチケット一覧取得ユースケース。
pub struct ListTicketsUseCase {
    gate: Arc<HelpdeskGate>,
}

impl ListTicketsUseCase {
    pub fn new(gate: Arc<HelpdeskGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(&self, session_id: Option<&str>) -> Result<SupportTicketPool, SupportError> {
        let session = self.gate.open(session_id).await?;
        let tickets = session
            .client()
            .list_requests(OPEN_PENDING_FILTER)
            .await?
            .into_iter()
            .map(|t| session.translate(t))
            .collect();
        Ok(SupportTicketPool::from_tickets(tickets))
    }
}
