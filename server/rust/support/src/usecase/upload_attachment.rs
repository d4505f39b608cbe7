use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entity::SupportTicket;
use crate::domain::repository::{AttachmentFile, CommentDraft, TicketUpdate};
use crate::error::SupportError;
use crate::infrastructure::temp_upload::StagedUpload;
use crate::usecase::HelpdeskGate;

const UPLOAD_UNRESOLVED_MESSAGE: &str =
    "There was a problem uploading the file, please check the permissions on the file";

/// UploadAttachmentUseCase は一時ファイルをコメントの添付としてチケットへ送るユースケース。
///
/// 認証を通過した後は、渡された StagedUpload は成功・失敗にかかわらずこの関数の終了時に削除される。
/// 認証前に失敗した場合、名前で解決した既存ファイルは残る。
pub struct UploadAttachmentUseCase {
    gate: Arc<HelpdeskGate>,
}

impl UploadAttachmentUseCase {
    pub fn new(gate: Arc<HelpdeskGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: Option<&str>,
        id: u64,
        staged: Option<StagedUpload>,
    ) -> Result<SupportTicket, SupportError> {
        self.gate.ensure_available()?;

        let mut staged = staged
            .ok_or_else(|| SupportError::UploadFailed(UPLOAD_UNRESOLVED_MESSAGE.to_string()))?;

        let session = self.gate.open(session_id).await?;
        staged.claim();
        let current = session.find_ticket(id).await?;

        let update = TicketUpdate {
            comment: CommentDraft {
                body: staged.name().to_string(),
                uploads: vec![AttachmentFile {
                    name: staged.name().to_string(),
                    path: staged.path().to_path_buf(),
                }],
            },
            solved: false,
        };

        match session.client().update_request(id, update).await {
            Ok(ticket) => {
                info!(ticket_id = id, file = %staged.name(), "attachment uploaded");
                Ok(session.translate(ticket))
            }
            Err(e) => {
                // 保存失敗は呼び出し元へ伝えず、保存前のチケットを返す
                warn!(ticket_id = id, file = %staged.name(), error = %e, "failed to upload attachment");
                Ok(session.translate(current))
            }
        }
    }
}
