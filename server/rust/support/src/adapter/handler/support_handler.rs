use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{session, AppState, PrettyJson};
use crate::domain::entity::TicketEnvelope;
use crate::error::SupportError;
use crate::infrastructure::temp_upload::{StagedUpload, TempUploadResolver};
use crate::usecase::{CommentTicketInput, CreateTicketInput};

/// アップロード API でファイル（またはファイル名）を受け取るフォームフィールド名。
pub const UPLOAD_FIELD: &str = "tempfile";

/// ActionRequest は POST /support/request/{id}/action のボディ。
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: ActionBody,
}

#[derive(Debug, Deserialize)]
pub struct ActionBody {
    #[serde(default)]
    pub params: ActionParams,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionParams {
    #[serde(default)]
    pub comment: Option<CommentParam>,
    #[serde(default)]
    pub solved: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CommentParam {
    #[serde(default)]
    pub value: Option<String>,
}

impl From<ActionRequest> for CommentTicketInput {
    fn from(req: ActionRequest) -> Self {
        let params = req.action.params;
        // null と false 以外は解決済み指定とみなす
        let solved = !matches!(params.solved, None | Some(Value::Null | Value::Bool(false)));
        CommentTicketInput {
            comment: params.comment.and_then(|c| c.value),
            solved,
        }
    }
}

fn parse_ticket_id(raw: &str) -> Result<u64, SupportError> {
    raw.parse()
        .map_err(|_| SupportError::NotFound(format!("Cannot find request with {}", raw)))
}

/// GET /support/request
pub async fn list_requests(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session_id = session::session_id(&jar, &state.session);
    match state.list_tickets_uc.execute(session_id.as_deref()).await {
        Ok(pool) => (StatusCode::OK, PrettyJson(pool)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /support/request/{id}
pub async fn get_request(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_ticket_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let session_id = session::session_id(&jar, &state.session);
    match state.get_ticket_uc.execute(session_id.as_deref(), id).await {
        Ok(ticket) => (StatusCode::OK, PrettyJson(TicketEnvelope::from(ticket))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /support/request
pub async fn create_request(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<CreateTicketInput>, JsonRejection>,
) -> Response {
    if let Err(e) = state.gate.ensure_available() {
        return e.into_response();
    }
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => return SupportError::Forbidden(rejection.body_text()).into_response(),
    };

    let session_id = session::session_id(&jar, &state.session);
    match state.create_ticket_uc.execute(session_id.as_deref(), input).await {
        Ok(ticket) => {
            (StatusCode::CREATED, PrettyJson(TicketEnvelope::from(ticket))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /support/request/{id}/action
pub async fn request_action(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> Response {
    let id = match parse_ticket_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    // 形式不正のボディはコメントなしとして扱い、ユースケース側で 403 にする
    let input = match body {
        Ok(Json(req)) => CommentTicketInput::from(req),
        Err(_) => CommentTicketInput::default(),
    };

    let session_id = session::session_id(&jar, &state.session);
    match state
        .comment_ticket_uc
        .execute(session_id.as_deref(), id, input)
        .await
    {
        Ok(ticket) => {
            (StatusCode::CREATED, PrettyJson(TicketEnvelope::from(ticket))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /support/request/{id}/upload
pub async fn upload_attachment(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let id = match parse_ticket_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let staged = match multipart {
        Ok(multipart) => stage_upload(&state.uploads, multipart).await,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "upload request is not multipart");
            None
        }
    };

    let session_id = session::session_id(&jar, &state.session);
    match state
        .upload_attachment_uc
        .execute(session_id.as_deref(), id, staged)
        .await
    {
        Ok(ticket) => {
            (StatusCode::CREATED, PrettyJson(TicketEnvelope::from(ticket))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// tempfile フィールドを一時ファイルに解決する。
///
/// ファイルパートは一時ディレクトリへ書き出し、テキストパートは配置済みファイル名として解決する。
async fn stage_upload(
    resolver: &TempUploadResolver,
    mut multipart: Multipart,
) -> Option<StagedUpload> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read multipart upload");
                return None;
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let contents = match field.bytes().await {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(file = %file_name, error = %e, "failed to read uploaded file");
                    return None;
                }
            };
            return match resolver.stage(&file_name, &contents).await {
                Ok(staged) => Some(staged),
                Err(e) => {
                    warn!(file = %file_name, error = %e, "failed to stage uploaded file");
                    None
                }
            };
        }

        return match field.text().await {
            Ok(name) => resolver.resolve(&name),
            Err(e) => {
                warn!(error = %e, "failed to read upload file name");
                None
            }
        };
    }
}
