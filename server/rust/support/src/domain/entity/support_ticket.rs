use chrono::{DateTime, Utc};
use serde::Serialize;

/// CustomFieldIds はヘルプデスク側のカスタムフィールド ID を表す。
/// バージョンと重要度の 2 フィールドのみを扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomFieldIds {
    pub version: u64,
    pub severity: u64,
}

/// RemoteCustomField はヘルプデスクチケットのカスタムフィールド値。
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCustomField {
    pub id: u64,
    pub value: Option<String>,
}

/// RemoteComment はヘルプデスクから取得したコメント。到着順に並ぶ。
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteComment {
    pub created_at: DateTime<Utc>,
    pub html_body: String,
    pub author_id: u64,
    pub body: String,
}

/// RemoteTicket はヘルプデスクが返すチケット表現。
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTicket {
    pub id: u64,
    pub url: String,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub custom_fields: Vec<RemoteCustomField>,
    pub comments: Vec<RemoteComment>,
}

/// TicketComment はコンソール向けに平坦化したコメント。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketComment {
    pub created_at: DateTime<Utc>,
    pub html_body: String,
    pub author_id: u64,
    pub body: String,
}

/// SupportTicket はコンソールのフロントエンドが消費する固定形状のチケット。
/// レスポンスのシリアライズ後に破棄される。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportTicket {
    pub id: u64,
    pub url: String,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opennebula_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_description: Option<String>,
    pub comments: Vec<TicketComment>,
}

/// TicketEnvelope は単一チケットのレスポンス本体 {"REQUEST": {...}}。
#[derive(Debug, Clone, Serialize)]
pub struct TicketEnvelope {
    #[serde(rename = "REQUEST")]
    pub request: SupportTicket,
}

impl From<SupportTicket> for TicketEnvelope {
    fn from(request: SupportTicket) -> Self {
        Self { request }
    }
}

/// RequestPool は一覧レスポンスの REQUEST_POOL 部分。
/// チケットが 0 件の場合は REQUEST キー自体を出力しない。
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestPool {
    #[serde(rename = "REQUEST", skip_serializing_if = "Option::is_none")]
    pub requests: Option<Vec<SupportTicket>>,
}

/// SupportTicketPool は GET /support/request のレスポンス本体。
#[derive(Debug, Clone, Serialize)]
pub struct SupportTicketPool {
    #[serde(rename = "REQUEST_POOL")]
    pub pool: RequestPool,
    pub open_requests: u32,
    pub pending_requests: u32,
}

impl SupportTicketPool {
    /// チケット一覧からプールを構築し、open / pending の件数を数える。
    pub fn from_tickets(tickets: Vec<SupportTicket>) -> Self {
        let open_requests = count_status(&tickets, "open");
        let pending_requests = count_status(&tickets, "pending");
        let requests = if tickets.is_empty() {
            None
        } else {
            Some(tickets)
        };

        Self {
            pool: RequestPool { requests },
            open_requests,
            pending_requests,
        }
    }
}

fn count_status(tickets: &[SupportTicket], status: &str) -> u32 {
    let count = tickets.iter().filter(|t| t.status == status).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
