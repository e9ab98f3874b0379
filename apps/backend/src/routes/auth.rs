//! Session endpoints. Credentials are verified by an external login flow
//! that mints tokens with `auth::jwt::mint_access_token`.

use actix_web::{web, HttpResponse};

use crate::auth::cookie::clear_cookie;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::state::app_state::AppState;

/// GET /api/auth/me
async fn me(user: CurrentUser) -> Result<web::Json<CurrentUser>, AppError> {
    Ok(web::Json(user))
}

/// POST /api/auth/logout
///
/// Clears the session cookie. Bearer tokens stay valid until they expire.
async fn logout(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::NoContent()
        .cookie(clear_cookie(&app_state.security))
        .finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me));
    cfg.route("/logout", web::post().to(logout));
}
