use axum::http::StatusCode;

use super::ApiSuccess;

pub async fn health() -> ApiSuccess<String> {
    ApiSuccess::new(StatusCode::OK, "OK".to_string())
}
