use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use super::AppState;

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /readyz
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    // ヘルプデスク未設定でもサポート確認 API は動作するため ready とする
    let helpdesk_status = if state.gate.is_available() {
        "ok"
    } else {
        "not_configured"
    };

    Json(serde_json::json!({
        "status": "ready",
        "checks": {
            "helpdesk": helpdesk_status
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapter::handler::router;
    use crate::adapter::handler::test_support::{make_state, response_json};
    use crate::adapter::repository::InMemoryCredentialStore;
    use crate::domain::repository::helpdesk::MockHelpdeskClient;

    #[tokio::test]
    async fn test_healthz() {
        let app = router(make_state(
            MockHelpdeskClient::new(),
            Arc::new(InMemoryCredentialStore::new()),
            None,
        ));
        let req = Request::builder().uri("/healthz").body(Body::empty()).unwrap();

        let (status, json) = response_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_readyz_reports_helpdesk() {
        let app = router(make_state(
            MockHelpdeskClient::new(),
            Arc::new(InMemoryCredentialStore::new()),
            None,
        ));
        let req = Request::builder().uri("/readyz").body(Body::empty()).unwrap();

        let (status, json) = response_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ready");
        assert_eq!(json["checks"]["helpdesk"], "ok");
    }
}
