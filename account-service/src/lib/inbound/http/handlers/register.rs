use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::CredentialsError;
use crate::account::errors::ProfileError;
use crate::account::errors::UserNameError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::UserName;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequestBody>, ApiError>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    user_name: String,
    password: String,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    gender: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid user name: {0}")]
    UserName(#[from] UserNameError),

    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("{0}")]
    Credentials(#[from] CredentialsError),
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let user_name = UserName::new(self.user_name)?;
        let profile = AccountProfile::new(self.name, self.phone, self.email, self.gender)?;
        Ok(RegisterCommand::new(user_name, self.password, profile)?)
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponseData {
    pub id: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for RegisterResponseData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            user_name: account.user_name.to_string(),
            created_at: account.created_at,
        }
    }
}
