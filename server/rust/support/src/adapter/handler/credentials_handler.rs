use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{session, AppState};
use crate::domain::entity::SessionCredentials;
use crate::error::SupportError;

/// CredentialsInput は POST /support/credentials のボディ。
#[derive(Debug, Deserialize)]
pub struct CredentialsInput {
    pub email: String,
    pub password: SecretString,
}

/// POST /support/credentials
///
/// 認証情報をセッションへ保存した後にヘルプデスクで検証する。
/// 検証に失敗しても Cookie と保存済みの認証情報は残る。
pub async fn store_credentials(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<CredentialsInput>, JsonRejection>,
) -> Response {
    if let Err(e) = state.gate.ensure_available() {
        return e.into_response();
    }
    let input = match body {
        Ok(Json(input))
            if !input.email.trim().is_empty() && !input.password.expose_secret().is_empty() =>
        {
            input
        }
        _ => {
            return SupportError::Unauthorized("Helpdesk credentials not provided".to_string())
                .into_response()
        }
    };

    let session_id = session::session_id(&jar, &state.session)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let jar = jar.add(session::session_cookie(&state.session, session_id.clone()));

    let credentials = SessionCredentials {
        email: input.email,
        password: input.password,
    };
    match state
        .store_credentials_uc
        .execute(&session_id, credentials)
        .await
    {
        Ok(()) => (jar, StatusCode::NO_CONTENT).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

/// DELETE /support/credentials
pub async fn clear_credentials(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session_id = session::session_id(&jar, &state.session);
    match state
        .clear_credentials_uc
        .execute(session_id.as_deref())
        .await
    {
        Ok(()) => {
            let jar = jar.remove(session::removal_cookie(&state.session));
            (jar, StatusCode::NO_CONTENT).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::adapter::handler::router;
    use crate::adapter::handler::test_support::make_state;
    use crate::adapter::repository::InMemoryCredentialStore;
    use crate::domain::repository::helpdesk::MockHelpdeskClient;
    use crate::domain::repository::{CredentialStore, HelpdeskError};
    use crate::usecase::helpdesk_gate::test_support::authenticated_client;

    fn credentials_request(cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/support/credentials")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn set_cookie_value(resp: &Response) -> String {
        resp.headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_store_issues_session_cookie() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let app = router(make_state(authenticated_client(), store.clone(), None));

        let resp = app
            .oneshot(credentials_request(
                None,
                r#"{"email":"ops@example.com","password":"pw"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let cookie = set_cookie_value(&resp);
        assert!(cookie.starts_with("support_session="));
        assert!(cookie.contains("HttpOnly"));
        let session_id = cookie
            .trim_start_matches("support_session=")
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let stored = store.load(&session_id).await.unwrap().unwrap();
        assert_eq!(stored.email, "ops@example.com");
    }

    #[tokio::test]
    async fn test_store_reuses_existing_session() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let app = router(make_state(authenticated_client(), store.clone(), None));

        let resp = app
            .oneshot(credentials_request(
                Some("support_session=existing"),
                r#"{"email":"ops@example.com","password":"pw"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(store.load("existing").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_rejected_credentials_is_unauthorized() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mut client = MockHelpdeskClient::new();
        client
            .expect_current_user()
            .returning(|| Err(HelpdeskError::Unauthorized));
        let app = router(make_state(client, store.clone(), None));

        let resp = app
            .oneshot(credentials_request(
                Some("support_session=s9"),
                r#"{"email":"ops@example.com","password":"wrong"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        // 検証に失敗しても保存済みの認証情報は残る
        assert!(store.load("s9").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_missing_password_is_unauthorized() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let app = router(make_state(MockHelpdeskClient::new(), store, None));

        let resp = app
            .oneshot(credentials_request(None, r#"{"email":"ops@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_clear_removes_credentials_and_cookie() {
        let store = Arc::new(InMemoryCredentialStore::new());
        store
            .store("s1", SessionCredentials::new("ops@example.com", "pw"))
            .await
            .unwrap();
        let app = router(make_state(MockHelpdeskClient::new(), store.clone(), None));

        let req = Request::builder()
            .method("DELETE")
            .uri("/support/credentials")
            .header(header::COOKIE, "support_session=s1")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(set_cookie_value(&resp).starts_with("support_session="));
        assert!(store.load("s1").await.unwrap().is_none());
    }
}
