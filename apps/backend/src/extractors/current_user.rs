use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;
use tracing::debug;

use crate::auth::jwt::Claims;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::domain::actor::Actor;
use crate::entities::operators::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::operators;
use crate::state::app_state::AppState;

/// The authenticated operator, loaded from the database.
///
/// Claims come from request extensions (stored by the `JwtExtract`
/// middleware). The role is the stored one, not the one in the token, so a
/// demotion takes effect before the token expires.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }

    pub fn has_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }

    /// 403 `INSUFFICIENT_ROLE` unless the operator holds one of `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if self.has_role(allowed) {
            return Ok(());
        }
        debug!(operator_id = self.id, role = ?self.role, "Role check failed");
        Err(AppError::forbidden(
            ErrorCode::InsufficientRole,
            "Your role does not permit this action",
        ))
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<Claims>()
                .cloned()
                .ok_or_else(AppError::unauthorized)?;
            let operator_id = claims.operator_id()?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            let operator = if let Some(shared_txn) = SharedTxn::from_req(&req) {
                operators::find_by_id(shared_txn.transaction(), operator_id).await?
            } else {
                let db = require_db(app_state)?;
                operators::find_by_id(db, operator_id).await?
            };

            let operator = operator
                .filter(|o| o.is_active)
                .ok_or_else(AppError::forbidden_user_not_found)?;

            Ok(CurrentUser {
                id: operator.id,
                nickname: operator.nickname,
                email: operator.email,
                role: operator.role,
            })
        })
    }
}
