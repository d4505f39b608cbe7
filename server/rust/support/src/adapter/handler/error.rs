use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::{ErrorResponse, PrettyJson};
use crate::error::SupportError;

/// SupportError を HTTP レスポンスに変換する。
impl IntoResponse for SupportError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            SupportError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SYS_SUPPORT_UNAVAILABLE")
            }
            SupportError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "SYS_SUPPORT_UNAUTHORIZED"),
            SupportError::NotFound(_) => (StatusCode::NOT_FOUND, "SYS_SUPPORT_REQUEST_NOT_FOUND"),
            SupportError::Forbidden(_) => (StatusCode::FORBIDDEN, "SYS_SUPPORT_FORBIDDEN"),
            SupportError::UploadFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SYS_SUPPORT_UPLOAD_FAILED")
            }
            SupportError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SYS_SUPPORT_INTERNAL_ERROR")
            }
        };
        let err = ErrorResponse::new(code, &self.to_string());
        (status, PrettyJson(err)).into_response()
    }
}
