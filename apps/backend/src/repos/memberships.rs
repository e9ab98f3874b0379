//! Squad membership and join-request repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::{join_requests_sea, squad_members_sea};
use crate::entities::join_requests::{self, JoinRequestStatus};
use crate::entities::operators::Role;
use crate::errors::domain::DomainError;

/// An operator's membership in a squad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadMember {
    pub operator_id: i64,
    pub nickname: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub joined_at: OffsetDateTime,
}

/// A squad as seen from one of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub squad_id: i64,
    pub name: String,
    pub tag: Option<String>,
    pub joined_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub id: i64,
    pub squad_id: i64,
    pub operator_id: i64,
    pub status: JoinRequestStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<join_requests::Model> for JoinRequest {
    fn from(model: join_requests::Model) -> Self {
        Self {
            id: model.id,
            squad_id: model.squad_id,
            operator_id: model.operator_id,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A pending request with the requesting operator's display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJoinRequest {
    pub request: JoinRequest,
    pub nickname: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn is_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<bool, DomainError> {
    Ok(squad_members_sea::find(conn, squad_id, operator_id)
        .await?
        .is_some())
}

pub async fn add_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<(), DomainError> {
    squad_members_sea::insert(conn, squad_id, operator_id).await?;
    Ok(())
}

/// True if a row was removed.
pub async fn remove_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<bool, DomainError> {
    Ok(squad_members_sea::delete(conn, squad_id, operator_id).await? > 0)
}

pub async fn list_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Vec<SquadMember>, DomainError> {
    let rows = squad_members_sea::list_for_squad(conn, squad_id).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(member, operator)| {
            operator.map(|o| SquadMember {
                operator_id: o.id,
                nickname: o.nickname,
                full_name: o.full_name,
                avatar_url: o.avatar_url,
                role: o.role,
                joined_at: member.joined_at,
            })
        })
        .collect())
}

pub async fn list_memberships<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Vec<Membership>, DomainError> {
    let rows = squad_members_sea::list_for_operator(conn, operator_id).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(member, squad)| {
            squad.map(|s| Membership {
                squad_id: s.id,
                name: s.name,
                tag: s.tag,
                joined_at: member.joined_at,
            })
        })
        .collect())
}

pub async fn find_request<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
) -> Result<Option<JoinRequest>, DomainError> {
    let request = join_requests_sea::find_by_id(conn, request_id).await?;
    Ok(request.map(JoinRequest::from))
}

pub async fn find_request_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<Option<JoinRequest>, DomainError> {
    let request = join_requests_sea::find(conn, squad_id, operator_id).await?;
    Ok(request.map(JoinRequest::from))
}

pub async fn create_request<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<JoinRequest, DomainError> {
    let request = join_requests_sea::insert_pending(conn, squad_id, operator_id).await?;
    Ok(JoinRequest::from(request))
}

pub async fn set_request_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
    status: JoinRequestStatus,
) -> Result<JoinRequest, DomainError> {
    let request = join_requests_sea::set_status(conn, request_id, status).await?;
    Ok(JoinRequest::from(request))
}

pub async fn list_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Vec<PendingJoinRequest>, DomainError> {
    let rows = join_requests_sea::list_pending(conn, squad_id).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(request, operator)| {
            operator.map(|o| PendingJoinRequest {
                request: JoinRequest::from(request),
                nickname: o.nickname,
                full_name: o.full_name,
                avatar_url: o.avatar_url,
            })
        })
        .collect())
}
