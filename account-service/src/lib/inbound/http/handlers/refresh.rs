use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::cookies::token_cookie;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::cookies::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a new access token.
///
/// The token comes from the JSON body, or from the refresh cookie when the body is
/// absent or carries no token.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequestBody>>,
) -> Result<(CookieJar, ApiSuccess<RefreshResponseData>), ApiError> {
    let refresh_token = body
        .and_then(|Json(body)| body.refresh_token)
        .filter(|token| !token.is_empty())
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .unwrap_or_default();

    let access_token = state.account_service.refresh(&refresh_token).await?;

    let jar = jar.add(token_cookie(
        ACCESS_COOKIE,
        &access_token,
        state.authenticator.access_ttl(),
        state.secure_cookies,
    ));

    Ok((
        jar,
        ApiSuccess::new(StatusCode::OK, RefreshResponseData { access_token }),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequestBody {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponseData {
    pub access_token: String,
}
