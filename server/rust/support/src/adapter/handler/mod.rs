pub mod check_handler;
pub mod credentials_handler;
pub mod error;
pub mod health;
pub mod session;
pub mod support_handler;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::domain::repository::{
    CredentialStore, EntitlementGateway, HelpdeskConnector, ReleaseTagGateway,
};
use crate::infrastructure::cache::FreshnessCache;
use crate::infrastructure::clock::Clock;
use crate::infrastructure::config::{Config, SessionConfig};
use crate::infrastructure::temp_upload::TempUploadResolver;
use crate::usecase::{
    CheckLatestVersionUseCase, CheckSupportUseCase, ClearCredentialsUseCase,
    CommentTicketUseCase, CreateTicketUseCase, GetTicketUseCase, HelpdeskGate,
    HelpdeskIntegration, ListTicketsUseCase, StoreCredentialsUseCase, SupportCheckSettings,
    UploadAttachmentUseCase,
};

/// ServiceDeps は外部との境界にある実装をまとめたもの。テストではモックを渡す。
pub struct ServiceDeps {
    /// None の場合ヘルプデスク連携は利用不可。
    pub helpdesk: Option<Arc<dyn HelpdeskConnector>>,
    pub credential_store: Arc<dyn CredentialStore>,
    pub entitlement: Arc<dyn EntitlementGateway>,
    pub release_tags: Arc<dyn ReleaseTagGateway>,
    pub clock: Arc<dyn Clock>,
}

/// AppState はアプリケーション全体の共有状態を表す。
#[derive(Clone)]
pub struct AppState {
    pub list_tickets_uc: Arc<ListTicketsUseCase>,
    pub get_ticket_uc: Arc<GetTicketUseCase>,
    pub create_ticket_uc: Arc<CreateTicketUseCase>,
    pub comment_ticket_uc: Arc<CommentTicketUseCase>,
    pub upload_attachment_uc: Arc<UploadAttachmentUseCase>,
    pub store_credentials_uc: Arc<StoreCredentialsUseCase>,
    pub clear_credentials_uc: Arc<ClearCredentialsUseCase>,
    pub check_support_uc: Arc<CheckSupportUseCase>,
    pub check_latest_version_uc: Arc<CheckLatestVersionUseCase>,
    pub gate: Arc<HelpdeskGate>,
    pub uploads: TempUploadResolver,
    pub session: SessionConfig,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config, deps: ServiceDeps) -> Self {
        // 設定と実装の両方が揃った場合のみ連携を有効にする
        let integration = config
            .helpdesk
            .as_ref()
            .zip(deps.helpdesk)
            .map(|(helpdesk, connector)| HelpdeskIntegration {
                connector,
                fields: helpdesk.custom_fields(),
            });
        let gate = Arc::new(HelpdeskGate::new(integration, deps.credential_store));

        let window = config.support.check_interval();
        let support_cache = Arc::new(FreshnessCache::new(false, window));
        let version_cache = Arc::new(FreshnessCache::new("0".to_string(), window));

        let check_support_uc = CheckSupportUseCase::new(
            deps.entitlement,
            support_cache,
            deps.clock.clone(),
            SupportCheckSettings {
                product_version: config.support.product_version.clone(),
                token: config.support.remote_support_token(),
                repo_url_template: config.support.enterprise_repo_url.clone(),
            },
        );
        let check_latest_version_uc = CheckLatestVersionUseCase::new(
            deps.release_tags,
            version_cache,
            deps.clock,
            config.support.release_tag_prefix.clone(),
        );

        Self {
            list_tickets_uc: Arc::new(ListTicketsUseCase::new(gate.clone())),
            get_ticket_uc: Arc::new(GetTicketUseCase::new(gate.clone())),
            create_ticket_uc: Arc::new(CreateTicketUseCase::new(gate.clone())),
            comment_ticket_uc: Arc::new(CommentTicketUseCase::new(gate.clone())),
            upload_attachment_uc: Arc::new(UploadAttachmentUseCase::new(gate.clone())),
            store_credentials_uc: Arc::new(StoreCredentialsUseCase::new(gate.clone())),
            clear_credentials_uc: Arc::new(ClearCredentialsUseCase::new(gate.clone())),
            check_support_uc: Arc::new(check_support_uc),
            check_latest_version_uc: Arc::new(check_latest_version_uc),
            gate,
            uploads: TempUploadResolver::new(config.uploads.resolved_dir()),
            session: config.session.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

/// REST API ルーターを構築する。
pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Health / Readiness
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        // Support requests
        .route(
            "/support/request",
            get(support_handler::list_requests).post(support_handler::create_request),
        )
        .route("/support/request/{id}", get(support_handler::get_request))
        .route(
            "/support/request/{id}/action",
            post(support_handler::request_action),
        )
        .route(
            "/support/request/{id}/upload",
            post(support_handler::upload_attachment).layer(upload_limit),
        )
        // Credentials
        .route(
            "/support/credentials",
            post(credentials_handler::store_credentials)
                .delete(credentials_handler::clear_credentials),
        )
        // Remote checks
        .route("/support/check", get(check_handler::check_support))
        .route("/support/check/version", get(check_handler::check_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// PrettyJson は整形済み JSON でボディを返すレスポンダー。
#[derive(Debug, Clone)]
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_string_pretty(&self.0) {
            Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    }
}

/// ErrorResponse は統一エラーレスポンス。
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub request_id: String,
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorDetail {
    pub field: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                request_id: uuid::Uuid::new_v4().to_string(),
                details: vec![],
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::adapter::repository::InMemoryCredentialStore;
    use crate::domain::repository::helpdesk::{MockHelpdeskClient, MockHelpdeskConnector};
    use crate::domain::repository::remote_check::{
        MockEntitlementGateway, MockReleaseTagGateway,
    };
    use crate::domain::repository::HelpdeskClient;
    use crate::infrastructure::clock::SystemClock;

    pub const TEST_CONFIG: &str = r#"
app:
  name: "k1s0-support-server"
server:
  port: 8080
helpdesk:
  url: "https://helpdesk.example.com/api/v2"
  custom_field_version: 391130
  custom_field_severity: 391197
support:
  product_version: "5.12.4"
  token_remote_support: "user:secret"
"#;

    /// 任意のモッククライアントを返す状態を組み立てる。認証情報ストアは空。
    pub fn make_state(
        client: MockHelpdeskClient,
        store: Arc<InMemoryCredentialStore>,
        uploads_dir: Option<&std::path::Path>,
    ) -> AppState {
        let mut config = Config::from_yaml(TEST_CONFIG).unwrap();
        config.uploads.dir = uploads_dir.map(std::path::Path::to_path_buf);

        let client: Arc<dyn HelpdeskClient> = Arc::new(client);
        let mut connector = MockHelpdeskConnector::new();
        connector
            .expect_connect()
            .returning(move |_| Ok(client.clone()));

        AppState::new(
            &config,
            ServiceDeps {
                helpdesk: Some(Arc::new(connector)),
                credential_store: store,
                entitlement: Arc::new(MockEntitlementGateway::new()),
                release_tags: Arc::new(MockReleaseTagGateway::new()),
                clock: Arc::new(SystemClock),
            },
        )
    }

    pub async fn response_json(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }
}
