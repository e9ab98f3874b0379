//! SeaORM adapter for squads.

use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use super::search::contains_ci;
use crate::entities::squads::{self, Specialty};

#[derive(Debug, Clone)]
pub struct SquadCreate {
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Specialty,
    pub state: Option<String>,
    pub leader_id: Option<i64>,
    pub total_members: i32,
}

impl SquadCreate {
    pub fn new(name: impl Into<String>, total_members: i32) -> Self {
        Self {
            name: name.into(),
            tag: None,
            description: None,
            specialty: Specialty::Assalto,
            state: None,
            leader_id: None,
            total_members,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_specialty(mut self, specialty: Specialty) -> Self {
        self.specialty = specialty;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_leader(mut self, leader_id: i64) -> Self {
        self.leader_id = Some(leader_id);
        self
    }
}

/// Leader-editable squad fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SquadUpdate {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Option<Specialty>,
    pub state: Option<String>,
}

impl SquadUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.tag.is_none()
            && self.description.is_none()
            && self.specialty.is_none()
            && self.state.is_none()
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Option<squads::Model>, sea_orm::DbErr> {
    squads::Entity::find_by_id(squad_id).one(conn).await
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<squads::Model>, sea_orm::DbErr> {
    squads::Entity::find()
        .filter(squads::Column::Name.eq(name))
        .one(conn)
        .await
}

/// The active squad `leader_id` commands, if any.
pub async fn find_active_led_by<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    leader_id: i64,
) -> Result<Option<squads::Model>, sea_orm::DbErr> {
    squads::Entity::find()
        .filter(squads::Column::LeaderId.eq(leader_id))
        .filter(squads::Column::IsActive.eq(true))
        .one(conn)
        .await
}

pub async fn create_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SquadCreate,
) -> Result<squads::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    squads::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        tag: Set(dto.tag),
        description: Set(dto.description),
        specialty: Set(dto.specialty),
        state: Set(dto.state),
        leader_id: Set(dto.leader_id),
        total_members: Set(dto.total_members),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    dto: SquadUpdate,
) -> Result<squads::Model, sea_orm::DbErr> {
    let mut squad: squads::ActiveModel = squads::Entity::find_by_id(squad_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Squad not found".to_string()))?
        .into();

    if let Some(name) = dto.name {
        squad.name = Set(name);
    }
    if let Some(tag) = dto.tag {
        squad.tag = Set(Some(tag));
    }
    if let Some(description) = dto.description {
        squad.description = Set(Some(description));
    }
    if let Some(specialty) = dto.specialty {
        squad.specialty = Set(specialty);
    }
    if let Some(state) = dto.state {
        squad.state = Set(Some(state));
    }
    squad.updated_at = Set(OffsetDateTime::now_utc());

    squad.update(conn).await
}

/// Add `delta` (may be negative) to `total_members` in one statement.
pub async fn adjust_total_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    delta: i32,
) -> Result<(), sea_orm::DbErr> {
    let result = squads::Entity::update_many()
        .col_expr(
            squads::Column::TotalMembers,
            Expr::col(squads::Column::TotalMembers).add(delta),
        )
        .col_expr(
            squads::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(squads::Column::Id.eq(squad_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound("Squad not found".to_string()));
    }
    Ok(())
}

/// One page of active squads, largest first, plus the total count.
pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<squads::Model>, u64), sea_orm::DbErr> {
    let query = squads::Entity::find().filter(squads::Column::IsActive.eq(true));
    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(squads::Column::TotalMembers)
        .order_by_asc(squads::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

/// Every squad, active or not, optionally filtered by name or tag; by name.
pub async fn search_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<&str>,
) -> Result<Vec<squads::Model>, sea_orm::DbErr> {
    let mut query = squads::Entity::find();
    if let Some(q) = search {
        query = query.filter(
            Condition::any()
                .add(contains_ci(squads::Column::Name, q))
                .add(contains_ci(squads::Column::Tag, q)),
        );
    }
    query
        .order_by_asc(squads::Column::Name)
        .order_by_asc(squads::Column::Id)
        .all(conn)
        .await
}

/// `(all, active)` squad counts.
pub async fn counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<(u64, u64), sea_orm::DbErr> {
    let total = squads::Entity::find().count(conn).await?;
    let active = squads::Entity::find()
        .filter(squads::Column::IsActive.eq(true))
        .count(conn)
        .await?;
    Ok((total, active))
}
