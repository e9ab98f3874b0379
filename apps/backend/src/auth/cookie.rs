//! Session cookie carrying the access token.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};

use crate::state::security_config::SecurityConfig;

pub const SESSION_COOKIE: &str = "milsim_token";

/// HttpOnly cookie holding `token`, living as long as the token does.
pub fn session_cookie(token: impl Into<String>, security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.into())
        .path("/")
        .http_only(true)
        .secure(security.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(security.token_ttl.whole_seconds()))
        .finish()
}

/// Expired, empty session cookie that makes the browser drop it.
pub fn clear_cookie(security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(security.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .finish()
}
