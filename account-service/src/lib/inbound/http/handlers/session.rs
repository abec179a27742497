use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedSession;

pub async fn session(
    Extension(session): Extension<AuthenticatedSession>,
) -> ApiSuccess<SessionResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            account_id: session.account_id.to_string(),
            expires_at: session.expires_at,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseData {
    pub account_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}
