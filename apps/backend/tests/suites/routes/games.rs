use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::entities::games::GameStatus;
use milsim_backend::entities::operators::Role;
use serde_json::{json, Value};

use crate::support::app_builder::{send, test_app};
use crate::support::auth::bearer_header;
use crate::support::build_test_state;
use crate::support::factory::{seed_game, seed_open_game, seed_operator};

fn create_body() -> Value {
    json!({
        "name": "Operation Red Dawn",
        "location": "Quarry North",
        "startDate": "2030-06-01T08:00:00Z",
        "endDate": "2030-06-01T18:00:00Z",
        "gameType": "WOODLAND",
        "maxPlayers": 60,
        "registrationFee": 35.0
    })
}

#[actix_web::test]
async fn test_organizer_creates_game() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let organizer = seed_operator(shared.transaction(), Role::Organizer).await?;

    let app = test_app!(state);
    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/games")
            .insert_header((AUTHORIZATION, bearer_header(organizer.id, organizer.role, &security)))
            .set_json(create_body())
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Operation Red Dawn");
    assert_eq!(body["status"], "SCHEDULED");
    assert_eq!(body["gameType"], "WOODLAND");
    assert_eq!(body["currentPlayers"], 0);
    assert_eq!(body["maxPlayers"], 60);
    assert_eq!(body["registrationFee"], 35.0);
    assert_eq!(body["isActive"], true);
    assert_eq!(body["startDate"], "2030-06-01T08:00:00Z");

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_create_game_guards() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let player = seed_operator(txn, Role::Player).await?;
    let admin = seed_operator(txn, Role::Admin).await?;
    let admin_auth = bearer_header(admin.id, admin.role, &security);

    let app = test_app!(state);

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/games")
            .insert_header((AUTHORIZATION, bearer_header(player.id, player.role, &security)))
            .set_json(create_body())
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/games")
            .set_json(create_body())
    );
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    let mut bad = create_body();
    bad["maxPlayers"] = json!(0);
    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/games")
            .insert_header((AUTHORIZATION, admin_auth.clone()))
            .set_json(bad)
    );
    assert_problem(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::post()
            .uri("/api/games")
            .insert_header((AUTHORIZATION, admin_auth.clone()))
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("{\"name\": ")
    );
    assert_problem(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_list_games_envelope_and_filters() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let open = seed_open_game(txn, Some(10)).await?;
    seed_game(txn, Some(10), GameStatus::Cancelled).await?;

    let app = test_app!(state);

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri("/api/games?status=REGISTRATION_OPEN&page=1&limit=5")
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().expect("data array");
    assert!(data.iter().any(|g| g["id"] == open.id));
    assert!(data.iter().all(|g| g["status"] == "REGISTRATION_OPEN"));
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 5);
    assert!(body["meta"]["totalPages"].is_u64());

    let resp = send!(app, shared, test::TestRequest::get().uri("/api/games"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 20);

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri("/api/games?limit=500")
    );
    assert_problem(resp, StatusCode::BAD_REQUEST, "INVALID_PAGINATION").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri("/api/games?page=0")
    );
    assert_problem(resp, StatusCode::BAD_REQUEST, "INVALID_PAGINATION").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri("/api/games?status=ON_FIRE")
    );
    assert_problem(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_get_and_patch_game() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let organizer = seed_operator(txn, Role::Organizer).await?;
    let leader = seed_operator(txn, Role::SquadLeader).await?;
    let game = seed_open_game(txn, Some(40)).await?;
    let uri = format!("/api/games/{}", game.id);

    let app = test_app!(state);

    let resp = send!(app, shared, test::TestRequest::get().uri(&uri));
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], game.id);
    assert_eq!(body["location"], "Fort Range 3");

    let resp = send!(
        app,
        shared,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer_header(leader.id, leader.role, &security)))
            .set_json(json!({ "name": "Hijacked" }))
    );
    assert_problem(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer_header(organizer.id, organizer.role, &security)))
            .set_json(json!({
                "status": "REGISTRATION_CLOSED",
                "maxPlayers": null,
                "location": null
            }))
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "REGISTRATION_CLOSED");
    assert!(body["maxPlayers"].is_null());
    assert!(body["location"].is_null());
    assert_eq!(body["name"], game.name);

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri("/api/games/9999999")
    );
    assert_problem(resp, StatusCode::NOT_FOUND, "GAME_NOT_FOUND").await;

    let resp = send!(
        app,
        shared,
        test::TestRequest::get().uri("/api/games/-4")
    );
    assert_problem(resp, StatusCode::BAD_REQUEST, "INVALID_ID").await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}
