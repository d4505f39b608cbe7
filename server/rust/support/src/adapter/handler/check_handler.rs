use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::{AppState, PrettyJson};
use crate::usecase::{LatestVersion, LatestVersionBody};

/// GET /support/check
///
/// リモートの失敗はエラーにせず pass=false (400) として返す。
pub async fn check_support(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.check_support_uc.execute().await;
    let status = if result.pass {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, PrettyJson(result))
}

/// GET /support/check/version
pub async fn check_version(State(state): State<AppState>) -> impl IntoResponse {
    let latest = state.check_latest_version_uc.execute().await;
    let status = match latest {
        LatestVersion::Known(_) => StatusCode::OK,
        LatestVersion::Unavailable => StatusCode::BAD_REQUEST,
    };
    (status, PrettyJson(LatestVersionBody::from(&latest)))
}
