use thiserror::Error;

use crate::domain::repository::HelpdeskError;

#[derive(Debug, Error)]
pub enum SupportError {
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    UploadFailed(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl SupportError {
    pub fn ticket_not_found(id: u64) -> Self {
        SupportError::NotFound(format!("Cannot find request with {}", id))
    }
}

impl From<HelpdeskError> for SupportError {
    fn from(err: HelpdeskError) -> Self {
        match err {
            HelpdeskError::Unauthorized => {
                SupportError::Unauthorized("Incorrect helpdesk account credentials".to_string())
            }
            HelpdeskError::NotFound => SupportError::NotFound(err.to_string()),
            HelpdeskError::Validation(msg) => SupportError::Forbidden(msg),
            HelpdeskError::Transport(_) | HelpdeskError::Api { .. } => {
                SupportError::Internal(err.to_string())
            }
        }
    }
}
