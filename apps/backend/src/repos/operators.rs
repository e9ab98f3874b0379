//! Operator repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::operators_sea as operators_adapter;
use crate::entities::operators::{self, Role};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub id: i64,
    pub nickname: String,
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub verified: bool,
    pub engagement_score: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl From<operators::Model> for Operator {
    fn from(model: operators::Model) -> Self {
        Self {
            id: model.id,
            nickname: model.nickname,
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            avatar_url: model.avatar_url,
            role: model.role,
            verified: model.verified,
            engagement_score: model.engagement_score,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

fn into_operators(rows: Vec<operators::Model>) -> Vec<Operator> {
    rows.into_iter().map(Operator::from).collect()
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Option<Operator>, DomainError> {
    let operator = operators_adapter::find_by_id(conn, operator_id).await?;
    Ok(operator.map(Operator::from))
}

pub async fn require_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Operator, DomainError> {
    find_by_id(conn, operator_id)
        .await?
        .ok_or_else(|| DomainError::operator_not_found(operator_id))
}

/// Inactive operators count as missing.
pub async fn require_active_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Operator, DomainError> {
    operators_adapter::find_active_by_id(conn, operator_id)
        .await?
        .map(Operator::from)
        .ok_or_else(|| DomainError::operator_not_found(operator_id))
}

pub async fn find_existing_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<i64>, DomainError> {
    Ok(operators_adapter::find_existing_ids(conn, ids).await?)
}

pub async fn create_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: operators_adapter::OperatorCreate,
) -> Result<Operator, DomainError> {
    let operator = operators_adapter::create_operator(conn, dto).await?;
    Ok(Operator::from(operator))
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    dto: operators_adapter::OperatorUpdate,
) -> Result<Operator, DomainError> {
    let operator = operators_adapter::update_profile(conn, operator_id, dto).await?;
    Ok(Operator::from(operator))
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    is_active: bool,
) -> Result<Operator, DomainError> {
    let operator = operators_adapter::set_active(conn, operator_id, is_active).await?;
    Ok(Operator::from(operator))
}

pub async fn set_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    role: Role,
) -> Result<Operator, DomainError> {
    let operator = operators_adapter::set_role(conn, operator_id, role).await?;
    Ok(Operator::from(operator))
}

pub async fn set_verified<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    verified: bool,
) -> Result<Operator, DomainError> {
    let operator = operators_adapter::set_verified(conn, operator_id, verified).await?;
    Ok(Operator::from(operator))
}

pub async fn set_engagement_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    score: i32,
) -> Result<Operator, DomainError> {
    let operator = operators_adapter::set_engagement_score(conn, operator_id, score).await?;
    Ok(Operator::from(operator))
}

pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Operator>, u64), DomainError> {
    let (rows, total) = operators_adapter::list_active(conn, offset, limit).await?;
    Ok((into_operators(rows), total))
}

pub async fn search_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    q: &str,
    limit: u64,
) -> Result<Vec<Operator>, DomainError> {
    let rows = operators_adapter::search_active(conn, q, limit).await?;
    Ok(into_operators(rows))
}

pub async fn list_filtered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &operators_adapter::OperatorFilter,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Operator>, u64), DomainError> {
    let (rows, total) = operators_adapter::list_filtered(conn, filter, offset, limit).await?;
    Ok((into_operators(rows), total))
}

pub async fn first_active_admin_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<i64>, DomainError> {
    Ok(operators_adapter::first_active_admin_id(conn).await?)
}

pub async fn counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<(u64, u64), DomainError> {
    Ok(operators_adapter::counts(conn).await?)
}
