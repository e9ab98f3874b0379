//! Back-office dashboard and operator administration.
//!
//! Every mutation here is reserved to the primary admin, the active ADMIN
//! with the lowest id. Route guards already require the ADMIN role.

use sea_orm::{ConnectionTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::adapters::operators_sea::OperatorFilter;
use crate::db::txn::with_nested_txn;
use crate::domain::actor::Actor;
use crate::domain::pagination::{Page, PageMeta, PageRequest};
use crate::entities::operators::Role;
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};
use crate::repos::enrollments::{self, EnrolledOperator, EnrolledSquad};
use crate::repos::games::{self, Game};
use crate::repos::operators::{self, Operator};
use crate::repos::payments;
use crate::repos::rankings::{self, LeaderboardEntry};
use crate::repos::squads::{self, Squad};

/// Default page size for the admin operator listing.
pub const DEFAULT_OPERATOR_LIMIT: u64 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct NextGame {
    pub game: Game,
    pub squads: Vec<EnrolledSquad>,
    pub operators: Vec<EnrolledOperator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub operators_total: u64,
    pub operators_active: u64,
    pub squads_total: u64,
    pub squads_active: u64,
    pub games_total: u64,
    pub payments_total: u64,
    pub payments_settled: u64,
    pub next_game: Option<NextGame>,
}

impl DashboardStats {
    pub fn operators_inactive(&self) -> u64 {
        self.operators_total.saturating_sub(self.operators_active)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminSquad {
    pub squad: Squad,
    pub leader: Option<Operator>,
    pub ranking: Option<LeaderboardEntry>,
}

fn self_modification(detail: impl Into<String>) -> DomainError {
    DomainError::conflict(ConflictKind::SelfModification, detail)
}

async fn ensure_primary_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    actor: Actor,
) -> Result<(), DomainError> {
    if actor.is_admin() && operators::first_active_admin_id(conn).await? == Some(actor.id) {
        return Ok(());
    }
    warn!(operator_id = actor.id, "Primary admin check failed");
    Err(DomainError::forbidden(
        ForbiddenKind::PrimaryAdminRequired,
        "Only the primary admin may change operators",
    ))
}

pub struct AdminService;

impl AdminService {
    pub fn new() -> Self {
        Self
    }

    pub async fn stats<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        now: OffsetDateTime,
    ) -> Result<DashboardStats, DomainError> {
        let (operators_total, operators_active) = operators::counts(conn).await?;
        let (squads_total, squads_active) = squads::counts(conn).await?;
        let games_total = games::count_all(conn).await?;
        let (payments_total, payments_settled) = payments::counts(conn).await?;

        let next_game = match games::next_upcoming(conn, now).await? {
            Some(game) => {
                let squads = enrollments::list_squads(conn, game.id).await?;
                let operators = enrollments::list_operators(conn, game.id).await?;
                Some(NextGame {
                    game,
                    squads,
                    operators,
                })
            }
            None => None,
        };

        Ok(DashboardStats {
            operators_total,
            operators_active,
            squads_total,
            squads_active,
            games_total,
            payments_total,
            payments_settled,
            next_game,
        })
    }

    pub async fn list_operators<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: OperatorFilter,
        request: PageRequest,
    ) -> Result<Page<Operator>, DomainError> {
        let (data, total) =
            operators::list_filtered(conn, &filter, request.offset(), request.limit).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(request, total),
        })
    }

    /// All squads, inactive included, with leader and active ranking.
    pub async fn list_squads<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        search: Option<&str>,
    ) -> Result<Vec<AdminSquad>, DomainError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let rows = squads::search_all(conn, search).await?;

        let mut out = Vec::with_capacity(rows.len());
        for squad in rows {
            let leader = match squad.leader_id {
                Some(id) => operators::find_by_id(conn, id).await?,
                None => None,
            };
            let ranking = rankings::find_active_by_squad(conn, squad.id).await?;
            out.push(AdminSquad {
                squad,
                leader,
                ranking,
            });
        }
        Ok(out)
    }

    pub async fn is_first_admin<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: Actor,
    ) -> Result<bool, DomainError> {
        Ok(actor.is_admin() && operators::first_active_admin_id(conn).await? == Some(actor.id))
    }

    pub async fn change_role<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        operator_id: i64,
        role: Role,
    ) -> Result<Operator, DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                ensure_primary_admin(txn, actor).await?;
                if actor.id == operator_id {
                    return Err(self_modification("Admins cannot change their own role"));
                }
                let current = operators::require_operator(txn, operator_id).await?;
                let operator = operators::set_role(txn, operator_id, role).await?;
                info!(
                    operator_id,
                    from = ?current.role,
                    to = ?operator.role,
                    changed_by = actor.id,
                    "Operator role changed"
                );
                Ok(operator)
            })
        })
        .await
    }

    pub async fn toggle_active<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        operator_id: i64,
    ) -> Result<Operator, DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                ensure_primary_admin(txn, actor).await?;
                if actor.id == operator_id {
                    return Err(self_modification("Admins cannot deactivate themselves"));
                }
                let current = operators::require_operator(txn, operator_id).await?;
                let operator = operators::set_active(txn, operator_id, !current.is_active).await?;
                info!(operator_id, is_active = operator.is_active, "Operator active flag toggled");
                Ok(operator)
            })
        })
        .await
    }

    pub async fn toggle_verified<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        operator_id: i64,
    ) -> Result<Operator, DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                ensure_primary_admin(txn, actor).await?;
                let current = operators::require_operator(txn, operator_id).await?;
                let operator =
                    operators::set_verified(txn, operator_id, !current.verified).await?;
                info!(operator_id, verified = operator.verified, "Operator verification toggled");
                Ok(operator)
            })
        })
        .await
    }

    pub async fn set_points<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        operator_id: i64,
        points: i32,
    ) -> Result<Operator, DomainError> {
        if points < 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidField,
                "points must be zero or positive",
            ));
        }
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                ensure_primary_admin(txn, actor).await?;
                operators::require_operator(txn, operator_id).await?;
                let operator = operators::set_engagement_score(txn, operator_id, points).await?;
                info!(operator_id, points, "Operator points set");
                Ok(operator)
            })
        })
        .await
    }
}

impl Default for AdminService {
    fn default() -> Self {
        Self::new()
    }
}
