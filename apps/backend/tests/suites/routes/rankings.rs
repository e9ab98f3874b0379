use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::entities::operators::Role;
use serde_json::Value;

use crate::support::app_builder::{send, test_app};
use crate::support::auth::bearer_header;
use crate::support::build_test_state;
use crate::support::factory::{seed_operator, seed_ranked_squad, seed_squad};

#[actix_web::test]
async fn test_recalculate_is_admin_only() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let organizer = seed_operator(txn, Role::Organizer).await?;
    let admin = seed_operator(txn, Role::Admin).await?;
    let (y_squad, _) = seed_ranked_squad(txn, 100, (2, 1, 1), 22).await?;
    let (x_squad, _) = seed_ranked_squad(txn, 150, (3, 2, 1), 45).await?;

    let app = test_app!(state);

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/rankings/recalculate")
            .insert_header((AUTHORIZATION, bearer_header(organizer.id, organizer.role, &security)))
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/rankings/recalculate")
            .insert_header((AUTHORIZATION, bearer_header(admin.id, admin.role, &security)))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["processed"], 2);

    let resp = send!(app, shared, test::TestRequest::get().uri("/api/rankings"));
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["squadId"], x_squad.id);
    assert_eq!(body["data"][0]["position"], 1);
    assert_eq!(body["data"][0]["winRate"], 66.67);
    assert_eq!(body["data"][0]["averageEliminationsPerGame"], 15.0);
    assert_eq!(body["data"][0]["squadName"], x_squad.name);
    assert_eq!(body["data"][1]["squadId"], y_squad.id);
    assert_eq!(body["data"][1]["winRate"], 50.0);

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri(&format!("/api/rankings/squad/{}", y_squad.id))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["position"], 2);
    assert_eq!(body["averageEliminationsPerGame"], 11.0);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_unranked_squad_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let squad = seed_squad(shared.transaction(), 5).await?;

    let app = test_app!(state);

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri(&format!("/api/rankings/squad/{}", squad.id))
    );
    assert_problem(resp, StatusCode::NOT_FOUND, "RANKING_NOT_FOUND").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::post().uri("/api/rankings/recalculate")
    );
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}
