use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::{require_db, txn_policy};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::state::app_state::AppState;

/// Boxed future borrowed from a transaction for the duration of a unit of work.
pub type TxnFuture<'a, R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + 'a>>;

/// A transaction injected into request extensions so handlers and extractors
/// run inside it instead of opening their own.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub async fn open(db: &DatabaseConnection) -> Result<Self, AppError> {
        Ok(Self(Arc::new(db.begin().await?)))
    }

    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }

    /// Roll back; fails if a clone is still alive somewhere.
    pub async fn rollback(self) -> Result<(), AppError> {
        match Arc::try_unwrap(self.0) {
            Ok(txn) => {
                txn.rollback().await?;
                Ok(())
            }
            Err(_) => Err(AppError::internal(
                "shared transaction still referenced at rollback",
            )),
        }
    }
}

/// Execute `f` within a request transaction.
///
/// 1) SharedTxn in request extensions → use it (no commit/rollback here)
/// 2) Otherwise → begin, run, apply the txn policy on Ok, roll back on Err
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R, AppError>,
{
    // Clone out of extensions before awaiting so no RefCell borrow is held.
    let shared_txn = req.and_then(SharedTxn::from_req);

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let txn = require_db(state)?.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            match txn_policy::current() {
                txn_policy::TxnPolicy::CommitOnOk => txn.commit().await?,
                txn_policy::TxnPolicy::RollbackOnOk => txn.rollback().await?,
            }
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}

/// Run `f` as one atomic unit nested under `conn`.
///
/// On a connection this is a real transaction; on a transaction it is a
/// savepoint, so the unit rolls back on its own without poisoning the outer
/// request transaction. Commits regardless of the request txn policy.
pub async fn with_nested_txn<C, R, F>(conn: &C, f: F) -> Result<R, DomainError>
where
    C: TransactionTrait,
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R, DomainError>,
{
    let txn = conn.begin().await?;
    match f(&txn).await {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
