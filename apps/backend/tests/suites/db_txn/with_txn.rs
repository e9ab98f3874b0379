// with_txn without a SharedTxn: begins its own transaction and applies the
// process-wide policy. Test binaries default to RollbackOnOk.

use actix_web::test;
use milsim_backend::adapters::squads_sea::{self, SquadCreate};
use milsim_backend::db::require_db;
use milsim_backend::db::txn::with_txn;
use milsim_backend::db::txn_policy::{current, TxnPolicy};
use milsim_backend::entities::squads;
use milsim_backend::error::AppError;
use milsim_backend::state::app_state::AppState;
use milsim_backend::state::security_config::SecurityConfig;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use backend_test_support::unique_helpers::unique_str;

use crate::support::build_test_state;

#[actix_web::test]
async fn test_ok_result_is_rolled_back_under_test_policy() -> Result<(), Box<dyn std::error::Error>>
{
    if current() != TxnPolicy::RollbackOnOk {
        return Ok(());
    }
    let state = build_test_state().await?;
    let req = test::TestRequest::default().to_http_request();

    let squad_id = with_txn(Some(&req), &state, |txn| {
        Box::pin(async move {
            let squad = squads_sea::create_squad(txn, SquadCreate::new(unique_str("sq"), 4)).await?;
            Ok::<_, AppError>(squad.id)
        })
    })
    .await?;

    let found = squads_sea::find_by_id(require_db(&state)?, squad_id).await?;
    assert!(found.is_none(), "RollbackOnOk must discard successful work");
    Ok(())
}

#[actix_web::test]
async fn test_err_result_is_rolled_back() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let name = unique_str("sq");

    let inner_name = name.clone();
    let result: Result<(), AppError> = with_txn(None, &state, |txn| {
        Box::pin(async move {
            squads_sea::create_squad(txn, SquadCreate::new(inner_name, 4)).await?;
            Err(AppError::internal("boom"))
        })
    })
    .await;
    assert!(result.is_err());

    let db = require_db(&state)?;
    let leftover = squads::Entity::find()
        .filter(squads::Column::Name.eq(name))
        .one(db)
        .await?;
    assert!(leftover.is_none());
    Ok(())
}

#[actix_web::test]
async fn test_without_db_is_unavailable() {
    let state = AppState::new_without_db(SecurityConfig::default());

    let result = with_txn(None, &state, |_txn| Box::pin(async move { Ok::<_, AppError>(()) })).await;
    match result {
        Err(AppError::DbUnavailable) => {}
        other => panic!("expected DbUnavailable, got {other:?}"),
    }
}
