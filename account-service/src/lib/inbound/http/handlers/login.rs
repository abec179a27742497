use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::cookies::token_cookie;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::cookies::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequestBody>, ApiError>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let tokens = state
        .account_service
        .authenticate(&body.user_name, &body.password)
        .await?;

    let jar = jar
        .add(token_cookie(
            ACCESS_COOKIE,
            &tokens.access_token,
            state.authenticator.access_ttl(),
            state.secure_cookies,
        ))
        .add(token_cookie(
            REFRESH_COOKIE,
            &tokens.refresh_token,
            state.authenticator.refresh_ttl(),
            state.secure_cookies,
        ));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    user_name: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub access_token: String,
    pub refresh_token: String,
}
