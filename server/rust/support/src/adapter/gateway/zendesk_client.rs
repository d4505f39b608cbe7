use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entity::{RemoteComment, RemoteCustomField, RemoteTicket, SessionCredentials};
use crate::domain::repository::{
    AttachmentFile, HelpdeskClient, HelpdeskConnector, HelpdeskError, HelpdeskUser, NewTicket,
    TicketUpdate,
};
use crate::infrastructure::config::HelpdeskConfig;

/// ZendeskConnector は Zendesk REST API v2 クライアントを組み立てる。
/// HTTP コネクションプールはリクエスト間で共有する。
pub struct ZendeskConnector {
    http_client: reqwest::Client,
    base_url: String,
}

impl ZendeskConnector {
    pub fn new(config: &HelpdeskConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = config.url.trim_end_matches('/').to_string();
        Ok(Self {
            http_client,
            base_url,
        })
    }
}

impl HelpdeskConnector for ZendeskConnector {
    fn connect(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Arc<dyn HelpdeskClient>, HelpdeskError> {
        Ok(Arc::new(ZendeskClient {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        }))
    }
}

/// ZendeskClient はセッションの認証情報で Basic 認証する 1 リクエスト分のクライアント。
pub struct ZendeskClient {
    http_client: reqwest::Client,
    base_url: String,
    email: String,
    password: SecretString,
}

// --- Zendesk API DTO ---

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserDto,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RequestEnvelope {
    request: RequestDto,
}

#[derive(Debug, Deserialize)]
struct RequestListEnvelope {
    #[serde(default)]
    requests: Vec<RequestDto>,
}

#[derive(Debug, Deserialize)]
struct RequestDto {
    id: u64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    custom_fields: Vec<CustomFieldDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CustomFieldDto {
    id: u64,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct CommentListEnvelope {
    #[serde(default)]
    comments: Vec<CommentDto>,
}

#[derive(Debug, Deserialize)]
struct CommentDto {
    created_at: DateTime<Utc>,
    #[serde(default)]
    html_body: String,
    #[serde(default)]
    author_id: u64,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    upload: UploadDto,
}

#[derive(Debug, Deserialize)]
struct UploadDto {
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBodyDto {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    details: Option<ErrorDetailsDto>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetailsDto {
    #[serde(default)]
    base: Vec<ErrorDescriptionDto>,
}

#[derive(Debug, Deserialize)]
struct ErrorDescriptionDto {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateRequestBody<'a> {
    request: CreateRequestDto<'a>,
}

#[derive(Debug, Serialize)]
struct CreateRequestDto<'a> {
    subject: &'a str,
    comment: CommentBodyDto<'a>,
    custom_fields: Vec<CustomFieldDto>,
    tags: &'a [String],
}

#[derive(Debug, Serialize)]
struct CommentBodyDto<'a> {
    body: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    uploads: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequestBody<'a> {
    request: UpdateRequestDto<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateRequestDto<'a> {
    comment: CommentBodyDto<'a>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    solved: bool,
}

fn transport_error(err: reqwest::Error) -> HelpdeskError {
    HelpdeskError::Transport(err.to_string())
}

fn decode_error(err: reqwest::Error) -> HelpdeskError {
    HelpdeskError::Api {
        status: err.status().map_or(200, |s| s.as_u16()),
        message: format!("invalid response body: {}", err),
    }
}

/// カスタムフィールド値は文字列以外（null・真偽値・配列）も取り得る。
fn custom_field_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// ヘルプデスクの HTTP ステータスをエラーへ変換する。
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HelpdeskError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 | 403 => Err(HelpdeskError::Unauthorized),
        404 => Err(HelpdeskError::NotFound),
        422 => {
            let body: ErrorBodyDto = response.json().await.unwrap_or_default();
            Err(HelpdeskError::Validation(first_validation_message(body)))
        }
        code => {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(HelpdeskError::Api {
                status: code,
                message,
            })
        }
    }
}

fn first_validation_message(body: ErrorBodyDto) -> String {
    body.details
        .and_then(|d| d.base.into_iter().next())
        .and_then(|e| e.description)
        .or(body.description)
        .unwrap_or_else(|| "Record validation errors".to_string())
}

impl ZendeskClient {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(self.url(path))
            .basic_auth(&self.email, Some(self.password.expose_secret()))
    }

    async fn load_comments(&self, id: u64) -> Result<Vec<RemoteComment>, HelpdeskError> {
        let response = self
            .get(&format!("/requests/{}/comments.json", id))
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: CommentListEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        Ok(envelope
            .comments
            .into_iter()
            .map(|c| RemoteComment {
                created_at: c.created_at,
                html_body: c.html_body,
                author_id: c.author_id,
                body: c.body,
            })
            .collect())
    }

    /// リクエスト DTO にコメント一覧を読み込んで RemoteTicket にする。
    async fn hydrate(&self, dto: RequestDto) -> Result<RemoteTicket, HelpdeskError> {
        let comments = self.load_comments(dto.id).await?;
        Ok(RemoteTicket {
            id: dto.id,
            url: dto.url,
            subject: dto.subject,
            description: dto.description,
            status: dto.status,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            custom_fields: dto
                .custom_fields
                .into_iter()
                .map(|f| RemoteCustomField {
                    id: f.id,
                    value: custom_field_value(f.value),
                })
                .collect(),
            comments,
        })
    }

    async fn upload_file(&self, file: &AttachmentFile) -> Result<String, HelpdeskError> {
        let contents = tokio::fs::read(&file.path)
            .await
            .map_err(|e| HelpdeskError::Transport(format!("cannot read {}: {}", file.name, e)))?;

        let response = self
            .http_client
            .post(self.url("/uploads.json"))
            .basic_auth(&self.email, Some(self.password.expose_secret()))
            .query(&[("filename", file.name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/binary")
            .body(contents)
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: UploadEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        Ok(envelope.upload.token)
    }
}

#[async_trait]
impl HelpdeskClient for ZendeskClient {
    async fn current_user(&self) -> Result<Option<HelpdeskUser>, HelpdeskError> {
        let response = self
            .get("/users/me.json")
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: UserEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        Ok(Some(HelpdeskUser { id: envelope.user.id }))
    }

    async fn list_requests(&self, status_filter: &str) -> Result<Vec<RemoteTicket>, HelpdeskError> {
        let response = self
            .get("/requests.json")
            .query(&[("status", status_filter)])
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: RequestListEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        let mut tickets = Vec::with_capacity(envelope.requests.len());
        for dto in envelope.requests {
            tickets.push(self.hydrate(dto).await?);
        }
        Ok(tickets)
    }

    async fn find_request(&self, id: u64) -> Result<Option<RemoteTicket>, HelpdeskError> {
        let response = self
            .get(&format!("/requests/{}.json", id))
            .send()
            .await
            .map_err(transport_error)?;
        let response = match check_status(response).await {
            Ok(response) => response,
            Err(HelpdeskError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let envelope: RequestEnvelope = response.json().await.map_err(decode_error)?;
        self.hydrate(envelope.request).await.map(Some)
    }

    async fn create_request(&self, ticket: NewTicket) -> Result<RemoteTicket, HelpdeskError> {
        let body = CreateRequestBody {
            request: CreateRequestDto {
                subject: &ticket.subject,
                comment: CommentBodyDto {
                    body: &ticket.comment_body,
                    uploads: vec![],
                },
                custom_fields: ticket
                    .custom_fields
                    .iter()
                    .map(|(id, value)| CustomFieldDto {
                        id: *id,
                        value: Value::String(value.clone()),
                    })
                    .collect(),
                tags: &ticket.tags,
            },
        };

        let response = self
            .http_client
            .post(self.url("/requests.json"))
            .basic_auth(&self.email, Some(self.password.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: RequestEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        self.hydrate(envelope.request).await
    }

    async fn update_request(
        &self,
        id: u64,
        update: TicketUpdate,
    ) -> Result<RemoteTicket, HelpdeskError> {
        let mut tokens = Vec::with_capacity(update.comment.uploads.len());
        for file in &update.comment.uploads {
            tokens.push(self.upload_file(file).await?);
        }

        let body = UpdateRequestBody {
            request: UpdateRequestDto {
                comment: CommentBodyDto {
                    body: &update.comment.body,
                    uploads: tokens,
                },
                solved: update.solved,
            },
        };

        let response = self
            .http_client
            .put(self.url(&format!("/requests/{}.json", id)))
            .basic_auth(&self.email, Some(self.password.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: RequestEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        self.hydrate(envelope.request).await
    }
}
