//! Squad repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::squads_sea as squads_adapter;
use crate::entities::squads::{self, Specialty};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squad {
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Specialty,
    pub state: Option<String>,
    pub leader_id: Option<i64>,
    pub total_members: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl From<squads::Model> for Squad {
    fn from(model: squads::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            tag: model.tag,
            description: model.description,
            specialty: model.specialty,
            state: model.state,
            leader_id: model.leader_id,
            total_members: model.total_members,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

impl Squad {
    pub fn is_led_by(&self, operator_id: i64) -> bool {
        self.leader_id == Some(operator_id)
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Option<Squad>, DomainError> {
    let squad = squads_adapter::find_by_id(conn, squad_id).await?;
    Ok(squad.map(Squad::from))
}

pub async fn require_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Squad, DomainError> {
    find_by_id(conn, squad_id)
        .await?
        .ok_or_else(|| DomainError::squad_not_found(squad_id))
}

pub async fn name_taken<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<bool, DomainError> {
    Ok(squads_adapter::find_by_name(conn, name).await?.is_some())
}

pub async fn find_active_led_by<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    leader_id: i64,
) -> Result<Option<Squad>, DomainError> {
    let squad = squads_adapter::find_active_led_by(conn, leader_id).await?;
    Ok(squad.map(Squad::from))
}

pub async fn create_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: squads_adapter::SquadCreate,
) -> Result<Squad, DomainError> {
    let squad = squads_adapter::create_squad(conn, dto).await?;
    Ok(Squad::from(squad))
}

pub async fn update_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    dto: squads_adapter::SquadUpdate,
) -> Result<Squad, DomainError> {
    let squad = squads_adapter::update_squad(conn, squad_id, dto).await?;
    Ok(Squad::from(squad))
}

pub async fn adjust_total_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    delta: i32,
) -> Result<(), DomainError> {
    squads_adapter::adjust_total_members(conn, squad_id, delta).await?;
    Ok(())
}

pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Squad>, u64), DomainError> {
    let (rows, total) = squads_adapter::list_active(conn, offset, limit).await?;
    Ok((rows.into_iter().map(Squad::from).collect(), total))
}

pub async fn search_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<&str>,
) -> Result<Vec<Squad>, DomainError> {
    let rows = squads_adapter::search_all(conn, search).await?;
    Ok(rows.into_iter().map(Squad::from).collect())
}

pub async fn counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<(u64, u64), DomainError> {
    Ok(squads_adapter::counts(conn).await?)
}
