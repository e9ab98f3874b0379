use actix_web::cookie::Cookie;
use actix_web::http::header::{AUTHORIZATION, SET_COOKIE};
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use milsim_backend::adapters::operators_sea;
use milsim_backend::auth::cookie::SESSION_COOKIE;
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::entities::operators::Role;
use serde_json::Value;

use crate::support::app_builder::{send, test_app};
use crate::support::auth::{bearer_header, mint_expired_token, mint_test_token};
use crate::support::build_test_state;
use crate::support::factory::seed_operator;

#[actix_web::test]
async fn test_me_via_bearer_and_cookie() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let operator = seed_operator(shared.transaction(), Role::SquadLeader).await?;

    let app = test_app!(state);

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((AUTHORIZATION, bearer_header(operator.id, operator.role, &security)))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], operator.id);
    assert_eq!(body["nickname"], operator.nickname);
    assert_eq!(body["role"], "SQUAD_LEADER");

    let token = mint_test_token(operator.id, operator.role, &security);
    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(Cookie::new(SESSION_COOKIE, token))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], operator.id);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_stored_role_wins_over_token_role() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let player = seed_operator(shared.transaction(), Role::Player).await?;

    let app = test_app!(state);

    // A token claiming ADMIN for an operator stored as PLAYER.
    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/rankings/recalculate")
            .insert_header((AUTHORIZATION, bearer_header(player.id, Role::Admin, &security)))
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE").await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_token_failures() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let operator = seed_operator(txn, Role::Player).await?;
    let retired = seed_operator(txn, Role::Player).await?;
    operators_sea::set_active(txn, retired.id, false).await?;

    let app = test_app!(state);

    let resp = send!(app, shared, test::TestRequest::get().uri("/api/auth/me"));
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
    );
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MISSING_BEARER").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((AUTHORIZATION, "Bearer not.a.jwt"))
    );
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_INVALID_JWT").await;

    let expired = mint_expired_token(operator.id, operator.role, &security);
    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((AUTHORIZATION, format!("Bearer {expired}")))
    );
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_EXPIRED_JWT").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((AUTHORIZATION, bearer_header(retired.id, retired.role, &security)))
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "FORBIDDEN_USER_NOT_FOUND").await;

    // Public endpoints still reject a bad token rather than ignoring it.
    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/games")
            .insert_header((AUTHORIZATION, "Bearer not.a.jwt"))
    );
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_INVALID_JWT").await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_logout_clears_cookie() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let app = test_app!(state);
    let resp = send!(
        app,
        shared,
        test::TestRequest::post().uri("/api/auth/logout")
    );
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let set_cookie = resp
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("logout should set a cookie")
        .to_string();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(set_cookie.contains("Max-Age=0"));
    drop(resp);

    drop(app);
    shared.rollback().await?;
    Ok(())
}
