//! Auth cookies set by login and refresh, read back by refresh and the session guard.

use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use time::Duration;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// HttpOnly cookie living as long as the token it carries.
pub fn token_cookie(
    name: &'static str,
    token: &str,
    ttl: chrono::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(ttl.num_seconds()))
        .build()
}
