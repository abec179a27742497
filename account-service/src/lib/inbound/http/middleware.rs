use auth::TokenPurpose;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::account::models::AccountId;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type holding the verified access-token session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub account_id: AccountId,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Middleware that accepts only access-purpose tokens and records the session in request extensions.
///
/// The token is read from `Authorization: Bearer`, falling back to the access cookie.
pub async fn require_access_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(req.headers())?;

    let claims = state
        .authenticator
        .validate_token(&token, TokenPurpose::Access)
        .map_err(|e| {
            tracing::warn!(error = %e, "Access token rejected");
            unauthorized("Invalid or expired token")
        })?;

    let account_id = claims.parse_subject::<AccountId>().map_err(|e| {
        tracing::warn!(error = %e, "Access token carries an unusable subject");
        unauthorized("Invalid token format")
    })?;

    req.extensions_mut().insert(AuthenticatedSession {
        account_id,
        expires_at: claims.expires_at(),
    });

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

fn extract_token(headers: &HeaderMap) -> Result<String, Response> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| unauthorized("Invalid Authorization header"))?;

        return value
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
            });
    }

    CookieJar::from_headers(headers)
        .get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Missing access token"))
}
