use std::env;
use std::env::VarError;
use std::str::FromStr;

use milsim_backend::config::db::{DbKind, RuntimeEnv};
use milsim_backend::infra::state::{build_state, StateBuilder};
use milsim_backend::state::app_state::AppState;
use milsim_backend::AppError;

fn read_env_db_kind() -> Result<Option<String>, AppError> {
    match env::var("MILSIM_TEST_DB_KIND") {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(AppError::config(format!(
            "failed to read MILSIM_TEST_DB_KIND: {err}"
        ))),
    }
}

/// In-memory SQLite unless `MILSIM_TEST_DB_KIND` says otherwise.
pub fn resolve_test_db_kind() -> Result<DbKind, AppError> {
    match read_env_db_kind()? {
        Some(raw) => DbKind::from_str(&raw),
        None => Ok(DbKind::SqliteMemory),
    }
}

pub fn test_state_builder() -> Result<StateBuilder, AppError> {
    let db_kind = resolve_test_db_kind()?;
    Ok(build_state().with_env(RuntimeEnv::Test).with_db(db_kind))
}

pub async fn build_test_state() -> Result<AppState, AppError> {
    test_state_builder()?.build().await
}
