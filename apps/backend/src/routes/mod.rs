use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod admin;
pub mod auth;
pub mod games;
pub mod health;
pub mod operators;
pub mod pagination;
pub mod payments;
pub mod rankings;
pub mod squads;

/// Register every route plus the JSON/query error handlers.
///
/// `main.rs` wraps the result in the middleware chain; tests call this
/// directly and add `JwtExtract` themselves.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid JSON body: {err}")).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid query string: {err}")).into()
    }));

    cfg.route("/health", web::get().to(health::health));

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Games and enrollment: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Leaderboard and recalculation: /api/rankings/**
    cfg.service(web::scope("/api/rankings").configure(rankings::configure_routes));

    // Squads, members and join requests: /api/squads/**
    cfg.service(web::scope("/api/squads").configure(squads::configure_routes));

    // Operator directory and profiles: /api/operators/**
    cfg.service(web::scope("/api/operators").configure(operators::configure_routes));

    // Payment records: /api/payments/**
    cfg.service(web::scope("/api/payments").configure(payments::configure_routes));

    // Back office: /api/admin/**
    cfg.service(web::scope("/api/admin").configure(admin::configure_routes));
}
