//! Squads and their membership: creation, leader-only edits, members and
//! join requests.
//!
//! `total_members` moves with every membership row written or removed, in
//! the same nested transaction.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::{debug, info};

use crate::adapters::squads_sea::{SquadCreate, SquadUpdate};
use crate::db::txn::with_nested_txn;
use crate::domain::actor::Actor;
use crate::domain::pagination::{Page, PageMeta, PageRequest};
use crate::entities::join_requests::JoinRequestStatus;
use crate::entities::operators::Role;
use crate::entities::squads::Specialty;
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, NotFoundKind, ValidationKind,
};
use crate::repos::enrollments::{self, SquadGame};
use crate::repos::memberships::{self, JoinRequest, PendingJoinRequest, SquadMember};
use crate::repos::operators;
use crate::repos::rankings::{self, LeaderboardEntry};
use crate::repos::squads::{self, Squad};

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_TAG_LEN: usize = 10;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_STATE_LEN: usize = 2;
/// Games shown on the squad detail view.
pub const RECENT_GAMES: u64 = 10;

/// Input for a new squad. The caller becomes its leader.
#[derive(Debug, Clone, Default)]
pub struct NewSquad {
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Option<Specialty>,
    pub state: Option<String>,
    pub member_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SquadDetail {
    pub squad: Squad,
    pub members: Vec<SquadMember>,
    pub ranking: Option<LeaderboardEntry>,
    pub recent_games: Vec<SquadGame>,
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidField, detail)
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let len = name.trim().chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(invalid(format!(
            "name must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_max(field: &str, value: Option<&str>, max: usize) -> Result<(), DomainError> {
    match value {
        Some(v) if v.chars().count() > max => Err(invalid(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

fn validate_details(
    tag: Option<&str>,
    description: Option<&str>,
    state: Option<&str>,
) -> Result<(), DomainError> {
    validate_max("tag", tag, MAX_TAG_LEN)?;
    validate_max("description", description, MAX_DESCRIPTION_LEN)?;
    validate_max("state", state, MAX_STATE_LEN)
}

/// Sorted, deduplicated, without the leader.
fn initial_members(leader_id: i64, mut ids: Vec<i64>) -> Vec<i64> {
    ids.retain(|id| *id != leader_id);
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn ensure_leader(squad: &Squad, actor: Actor) -> Result<(), DomainError> {
    if squad.is_led_by(actor.id) {
        return Ok(());
    }
    Err(DomainError::forbidden(
        ForbiddenKind::NotSquadLeader,
        format!("Operator {} does not lead squad {}", actor.id, squad.id),
    ))
}

fn squad_name_taken(name: &str) -> DomainError {
    DomainError::conflict(
        ConflictKind::UniqueSquadName,
        format!("Squad name '{name}' is already taken"),
    )
}

async fn require_active_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Squad, DomainError> {
    match squads::find_by_id(conn, squad_id).await? {
        Some(squad) if squad.is_active => Ok(squad),
        _ => Err(DomainError::squad_not_found(squad_id)),
    }
}

pub struct SquadService;

impl SquadService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_squads<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        request: PageRequest,
    ) -> Result<Page<Squad>, DomainError> {
        let (data, total) = squads::list_active(conn, request.offset(), request.limit).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(request, total),
        })
    }

    pub async fn get_squad<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        squad_id: i64,
    ) -> Result<SquadDetail, DomainError> {
        let squad = require_active_squad(conn, squad_id).await?;
        let members = memberships::list_members(conn, squad_id).await?;
        let ranking = rankings::find_active_by_squad(conn, squad_id).await?;
        let recent_games = enrollments::list_squad_games(conn, squad_id, RECENT_GAMES).await?;
        Ok(SquadDetail {
            squad,
            members,
            ranking,
            recent_games,
        })
    }

    /// Create a squad led by `leader`. A PLAYER leader is promoted to
    /// SQUAD_LEADER in the same transaction.
    pub async fn create_squad<C: TransactionTrait>(
        &self,
        conn: &C,
        leader: Actor,
        input: NewSquad,
    ) -> Result<Squad, DomainError> {
        validate_name(&input.name)?;
        validate_details(
            input.tag.as_deref(),
            input.description.as_deref(),
            input.state.as_deref(),
        )?;

        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let name = input.name.trim().to_string();
                if squads::name_taken(txn, &name).await? {
                    return Err(squad_name_taken(&name));
                }
                if let Some(led) = squads::find_active_led_by(txn, leader.id).await? {
                    return Err(DomainError::conflict(
                        ConflictKind::AlreadyLeadsSquad,
                        format!("Operator {} already leads squad {}", leader.id, led.id),
                    ));
                }
                let leader_row = operators::require_active_operator(txn, leader.id).await?;

                let member_ids = initial_members(leader.id, input.member_ids);
                let existing = operators::find_existing_ids(txn, &member_ids).await?;
                if let Some(missing) = member_ids.iter().find(|id| !existing.contains(id)) {
                    return Err(DomainError::operator_not_found(*missing));
                }

                let total = i32::try_from(member_ids.len() + 1)
                    .map_err(|_| invalid("too many initial members"))?;
                let mut dto = SquadCreate::new(name, total)
                    .with_specialty(input.specialty.unwrap_or(Specialty::Assalto))
                    .with_leader(leader.id);
                if let Some(tag) = input.tag {
                    dto = dto.with_tag(tag);
                }
                if let Some(description) = input.description {
                    dto = dto.with_description(description);
                }
                if let Some(state) = input.state {
                    dto = dto.with_state(state);
                }
                let squad = squads::create_squad(txn, dto).await?;

                memberships::add_member(txn, squad.id, leader.id).await?;
                for operator_id in &member_ids {
                    memberships::add_member(txn, squad.id, *operator_id).await?;
                }

                if leader_row.role == Role::Player {
                    operators::set_role(txn, leader.id, Role::SquadLeader).await?;
                    debug!(operator_id = leader.id, "Promoted to squad leader");
                }

                info!(
                    squad_id = squad.id,
                    leader_id = leader.id,
                    total_members = squad.total_members,
                    "Squad created"
                );
                Ok(squad)
            })
        })
        .await
    }

    pub async fn update_squad<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        squad_id: i64,
        patch: SquadUpdate,
    ) -> Result<Squad, DomainError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        validate_details(
            patch.tag.as_deref(),
            patch.description.as_deref(),
            patch.state.as_deref(),
        )?;

        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let current = require_active_squad(txn, squad_id).await?;
                ensure_leader(&current, actor)?;

                if patch.is_empty() {
                    return Ok(current);
                }

                let name = patch.name.map(|n| n.trim().to_string());
                if let Some(name) = &name {
                    if *name != current.name && squads::name_taken(txn, name).await? {
                        return Err(squad_name_taken(name));
                    }
                }

                let squad =
                    squads::update_squad(txn, squad_id, SquadUpdate { name, ..patch }).await?;
                info!(squad_id, "Squad updated");
                Ok(squad)
            })
        })
        .await
    }

    pub async fn add_member<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        squad_id: i64,
        operator_id: i64,
    ) -> Result<(), DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let squad = require_active_squad(txn, squad_id).await?;
                ensure_leader(&squad, actor)?;
                operators::require_active_operator(txn, operator_id).await?;

                if memberships::is_member(txn, squad_id, operator_id).await? {
                    return Err(already_member(squad_id, operator_id));
                }
                memberships::add_member(txn, squad_id, operator_id).await?;
                squads::adjust_total_members(txn, squad_id, 1).await?;

                info!(squad_id, operator_id, "Member added");
                Ok(())
            })
        })
        .await
    }

    /// The leader removes anyone but themself; a member may remove themself.
    pub async fn remove_member<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        squad_id: i64,
        operator_id: i64,
    ) -> Result<(), DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let squad = require_active_squad(txn, squad_id).await?;
                if actor.id != operator_id {
                    ensure_leader(&squad, actor)?;
                }
                if squad.is_led_by(operator_id) {
                    return Err(DomainError::conflict(
                        ConflictKind::LeaderCannotLeave,
                        format!("Operator {operator_id} leads squad {squad_id}"),
                    ));
                }

                if !memberships::remove_member(txn, squad_id, operator_id).await? {
                    return Err(DomainError::not_found(
                        NotFoundKind::Membership,
                        format!("Operator {operator_id} is not a member of squad {squad_id}"),
                    ));
                }
                squads::adjust_total_members(txn, squad_id, -1).await?;

                info!(squad_id, operator_id, "Member removed");
                Ok(())
            })
        })
        .await
    }

    /// Ask to join a squad. A previously answered request is reopened.
    pub async fn request_join<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        squad_id: i64,
    ) -> Result<JoinRequest, DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                require_active_squad(txn, squad_id).await?;
                if memberships::is_member(txn, squad_id, actor.id).await? {
                    return Err(already_member(squad_id, actor.id));
                }

                let request = match memberships::find_request_for(txn, squad_id, actor.id).await? {
                    Some(existing) if existing.status == JoinRequestStatus::Pending => {
                        return Err(DomainError::conflict(
                            ConflictKind::JoinRequestPending,
                            format!(
                                "Operator {} already has a pending request for squad {squad_id}",
                                actor.id
                            ),
                        ));
                    }
                    Some(existing) => {
                        memberships::set_request_status(
                            txn,
                            existing.id,
                            JoinRequestStatus::Pending,
                        )
                        .await?
                    }
                    None => memberships::create_request(txn, squad_id, actor.id).await?,
                };

                info!(squad_id, operator_id = actor.id, request_id = request.id, "Join requested");
                Ok(request)
            })
        })
        .await
    }

    pub async fn list_join_requests<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: Actor,
        squad_id: i64,
    ) -> Result<Vec<PendingJoinRequest>, DomainError> {
        let squad = require_active_squad(conn, squad_id).await?;
        ensure_leader(&squad, actor)?;
        memberships::list_pending(conn, squad_id).await
    }

    /// Accept or reject a pending request. Accepting adds the member.
    pub async fn respond_join_request<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        request_id: i64,
        accept: bool,
    ) -> Result<JoinRequest, DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let request = memberships::find_request(txn, request_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::not_found(
                            NotFoundKind::JoinRequest,
                            format!("Join request {request_id} not found"),
                        )
                    })?;
                let squad = require_active_squad(txn, request.squad_id).await?;
                ensure_leader(&squad, actor)?;

                if request.status != JoinRequestStatus::Pending {
                    return Err(DomainError::conflict(
                        ConflictKind::JoinRequestProcessed,
                        format!("Join request {request_id} was already answered"),
                    ));
                }

                let status = if accept {
                    if !memberships::is_member(txn, squad.id, request.operator_id).await? {
                        memberships::add_member(txn, squad.id, request.operator_id).await?;
                        squads::adjust_total_members(txn, squad.id, 1).await?;
                    }
                    JoinRequestStatus::Accepted
                } else {
                    JoinRequestStatus::Rejected
                };
                let request = memberships::set_request_status(txn, request_id, status).await?;

                info!(
                    request_id,
                    squad_id = squad.id,
                    operator_id = request.operator_id,
                    status = ?request.status,
                    "Join request answered"
                );
                Ok(request)
            })
        })
        .await
    }
}

fn already_member(squad_id: i64, operator_id: i64) -> DomainError {
    DomainError::conflict(
        ConflictKind::AlreadyMember,
        format!("Operator {operator_id} is already a member of squad {squad_id}"),
    )
}

impl Default for SquadService {
    fn default() -> Self {
        Self::new()
    }
}
