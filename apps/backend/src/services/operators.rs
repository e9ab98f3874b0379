//! Operator directory and profile edits.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;

use crate::adapters::operators_sea::OperatorUpdate;
use crate::db::txn::with_nested_txn;
use crate::domain::actor::Actor;
use crate::domain::pagination::{Page, PageMeta, PageRequest};
use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};
use crate::repos::memberships::{self, Membership};
use crate::repos::operators::{self, Operator};

pub const MAX_NICKNAME_LEN: usize = 30;
pub const MAX_FULL_NAME_LEN: usize = 255;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_AVATAR_URL_LEN: usize = 500;
pub const SEARCH_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorProfile {
    pub operator: Operator,
    pub squads: Vec<Membership>,
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidField, detail)
}

fn validate_patch(patch: &OperatorUpdate) -> Result<(), DomainError> {
    if let Some(nickname) = &patch.nickname {
        let len = nickname.trim().chars().count();
        if len == 0 || len > MAX_NICKNAME_LEN {
            return Err(invalid(format!(
                "nickname must be between 1 and {MAX_NICKNAME_LEN} characters"
            )));
        }
    }
    let limits = [
        ("fullName", patch.full_name.as_deref(), MAX_FULL_NAME_LEN),
        ("phone", patch.phone.as_deref(), MAX_PHONE_LEN),
        ("avatarUrl", patch.avatar_url.as_deref(), MAX_AVATAR_URL_LEN),
    ];
    for (field, value, max) in limits {
        if value.is_some_and(|v| v.chars().count() > max) {
            return Err(invalid(format!("{field} must be at most {max} characters")));
        }
    }
    Ok(())
}

pub struct OperatorService;

impl OperatorService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_operators<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        request: PageRequest,
    ) -> Result<Page<Operator>, DomainError> {
        let (data, total) =
            operators::list_active(conn, request.offset(), request.limit).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(request, total),
        })
    }

    /// Case-insensitive match on nickname or full name. Blank queries
    /// match nothing.
    pub async fn search<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        q: &str,
    ) -> Result<Vec<Operator>, DomainError> {
        let q = q.trim();
        if q.is_empty() {
            return Ok(Vec::new());
        }
        operators::search_active(conn, q, SEARCH_LIMIT).await
    }

    pub async fn get_operator<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        operator_id: i64,
    ) -> Result<OperatorProfile, DomainError> {
        let operator = operators::require_active_operator(conn, operator_id).await?;
        let squads = memberships::list_memberships(conn, operator_id).await?;
        Ok(OperatorProfile { operator, squads })
    }

    /// Operators edit their own profile; admins edit anyone's.
    pub async fn update_operator<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        operator_id: i64,
        patch: OperatorUpdate,
    ) -> Result<Operator, DomainError> {
        if actor.id != operator_id && !actor.is_admin() {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotOwner,
                format!("Operator {} may not edit operator {operator_id}", actor.id),
            ));
        }
        validate_patch(&patch)?;

        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let current = operators::require_active_operator(txn, operator_id).await?;
                if patch.is_empty() {
                    return Ok(current);
                }
                let patch = OperatorUpdate {
                    nickname: patch.nickname.map(|n| n.trim().to_string()),
                    ..patch
                };
                let operator = operators::update_profile(txn, operator_id, patch).await?;
                info!(operator_id, edited_by = actor.id, "Operator profile updated");
                Ok(operator)
            })
        })
        .await
    }

    pub async fn deactivate<C: TransactionTrait>(
        &self,
        conn: &C,
        operator_id: i64,
    ) -> Result<(), DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                operators::require_active_operator(txn, operator_id).await?;
                operators::set_active(txn, operator_id, false).await?;
                info!(operator_id, "Operator deactivated");
                Ok(())
            })
        })
        .await
    }
}

impl Default for OperatorService {
    fn default() -> Self {
        Self::new()
    }
}
