use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::entities::operators::Role;
use serde_json::{json, Value};

use crate::support::app_builder::{send, test_app};
use crate::support::auth::bearer_header;
use crate::support::build_test_state;
use crate::support::factory::{seed_operator, seed_payment};

#[actix_web::test]
async fn test_payment_flow() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();

    let player = seed_operator(txn, Role::Player).await?;
    let organizer = seed_operator(txn, Role::Organizer).await?;
    let player_auth = bearer_header(player.id, player.role, &security);
    let staff_auth = bearer_header(organizer.id, organizer.role, &security);

    let app = test_app!(state);

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/payments")
            .insert_header((AUTHORIZATION, player_auth.clone()))
            .set_json(json!({"operatorId": player.id, "amount": 95.5, "method": "PIX"}))
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "PENDING");
    assert!(body["paidAt"].is_null());
    let payment_id = body["id"].as_i64().expect("id should be numeric");

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri("/api/payments")
            .insert_header((AUTHORIZATION, player_auth.clone()))
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::patch()
            .uri(&format!("/api/payments/{payment_id}/status"))
            .insert_header((AUTHORIZATION, staff_auth.clone()))
            .set_json(json!({"status": "CONFIRMED"}))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "CONFIRMED");
    assert!(body["paidAt"].is_string());

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri(&format!("/api/payments/operator/{}", player.id))
            .insert_header((AUTHORIZATION, player_auth.clone()))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri(&format!("/api/payments/{payment_id}"))
            .insert_header((AUTHORIZATION, staff_auth.clone()))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    drop(resp);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_payment_access_is_owner_or_staff() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();

    let owner = seed_operator(txn, Role::Player).await?;
    let stranger = seed_operator(txn, Role::SquadLeader).await?;
    let payment = seed_payment(txn, owner.id, 40.0).await?;
    let stranger_auth = bearer_header(stranger.id, stranger.role, &security);

    let app = test_app!(state);

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri(&format!("/api/payments/{}", payment.id))
            .insert_header((AUTHORIZATION, stranger_auth.clone()))
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/payments")
            .insert_header((AUTHORIZATION, stranger_auth.clone()))
            .set_json(json!({"operatorId": owner.id, "amount": 10.0, "method": "CASH"}))
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/payments")
            .insert_header((AUTHORIZATION, stranger_auth.clone()))
            .set_json(json!({"operatorId": stranger.id, "amount": 0, "method": "CASH"}))
    );
    assert_problem(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::get()
            .uri(&format!("/api/payments/{}", i64::MAX))
            .insert_header((AUTHORIZATION, stranger_auth.clone()))
    );
    assert_problem(resp, StatusCode::NOT_FOUND, "PAYMENT_NOT_FOUND").await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}
