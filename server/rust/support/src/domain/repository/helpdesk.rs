use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entity::{RemoteTicket, SessionCredentials};

/// HelpdeskError はヘルプデスク API 呼び出しのエラーを表す。
#[derive(Debug, Clone, thiserror::Error)]
pub enum HelpdeskError {
    #[error("helpdesk rejected the credentials")]
    Unauthorized,

    #[error("helpdesk resource not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("helpdesk transport error: {0}")]
    Transport(String),

    #[error("helpdesk API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

/// HelpdeskUser は認証済みユーザー。匿名の場合 id は None。
#[derive(Debug, Clone, PartialEq)]
pub struct HelpdeskUser {
    pub id: Option<u64>,
}

/// NewTicket はチケット作成時にヘルプデスクへ送る必須フィールド。
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub subject: String,
    pub comment_body: String,
    pub custom_fields: Vec<(u64, String)>,
    pub tags: Vec<String>,
}

/// AttachmentFile はコメントに添付するローカルファイル。name はヘルプデスク上のファイル名。
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentFile {
    pub name: String,
    pub path: PathBuf,
}

/// CommentDraft はチケットへ追加するコメント。
#[derive(Debug, Clone, PartialEq)]
pub struct CommentDraft {
    pub body: String,
    pub uploads: Vec<AttachmentFile>,
}

/// TicketUpdate はコメント追加と解決済みマークを表す。
#[derive(Debug, Clone, PartialEq)]
pub struct TicketUpdate {
    pub comment: CommentDraft,
    pub solved: bool,
}

/// HelpdeskClient は 1 リクエスト分の認証済みヘルプデスククライアント。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelpdeskClient: Send + Sync {
    /// 認証済みユーザーを返す。認証されていなければ None。
    async fn current_user(&self) -> Result<Option<HelpdeskUser>, HelpdeskError>;

    /// ステータス（カンマ区切り）で絞り込んだチケット一覧を取得する。コメントも読み込む。
    async fn list_requests(&self, status_filter: &str) -> Result<Vec<RemoteTicket>, HelpdeskError>;

    /// ID でチケットを取得する。存在しない場合は None。
    async fn find_request(&self, id: u64) -> Result<Option<RemoteTicket>, HelpdeskError>;

    /// チケットを作成する。検証エラーは Validation に最初のメッセージを格納する。
    async fn create_request(&self, ticket: NewTicket) -> Result<RemoteTicket, HelpdeskError>;

    /// チケットを更新（コメント追加）し、保存後のチケットを返す。
    async fn update_request(
        &self,
        id: u64,
        update: TicketUpdate,
    ) -> Result<RemoteTicket, HelpdeskError>;
}

/// HelpdeskConnector はセッションの認証情報からクライアントを組み立てる。
#[cfg_attr(test, mockall::automock)]
pub trait HelpdeskConnector: Send + Sync {
    fn connect(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Arc<dyn HelpdeskClient>, HelpdeskError>;
}
