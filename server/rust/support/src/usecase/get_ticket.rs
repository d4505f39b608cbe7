use std::sync::Arc;

use crate::domain::entity::SupportTicket;
use crate::error::SupportError;
use crate::usecase::HelpdeskGate;

/// GetTicketUseCase はチケット 1 件の取得ユースケース。
pub struct GetTicketUseCase {
    gate: Arc<HelpdeskGate>,
}

impl GetTicketUseCase {
    pub fn new(gate: Arc<HelpdeskGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: Option<&str>,
        id: u64,
    ) -> Result<SupportTicket, SupportError> {
        let session = self.gate.open(session_id).await?;
        let ticket = session.find_ticket(id).await?;
        Ok(session.translate(ticket))
    }
}
