//! SeaORM adapter for operators.

use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use super::search::contains_ci;
use crate::entities::operators::{self, Role};

#[derive(Debug, Clone)]
pub struct OperatorCreate {
    pub nickname: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

impl OperatorCreate {
    pub fn new(nickname: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            email: email.into(),
            full_name: None,
            phone: None,
            role: Role::Player,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Self-service profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct OperatorUpdate {
    pub nickname: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl OperatorUpdate {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.full_name.is_none()
            && self.phone.is_none()
            && self.avatar_url.is_none()
    }
}

/// Filters for the admin operator listing.
#[derive(Debug, Clone, Default)]
pub struct OperatorFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Option<operators::Model>, sea_orm::DbErr> {
    operators::Entity::find_by_id(operator_id).one(conn).await
}

pub async fn find_active_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Option<operators::Model>, sea_orm::DbErr> {
    operators::Entity::find_by_id(operator_id)
        .filter(operators::Column::IsActive.eq(true))
        .one(conn)
        .await
}

/// Those of `ids` that exist, in id order.
pub async fn find_existing_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<i64>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    operators::Entity::find()
        .select_only()
        .column(operators::Column::Id)
        .filter(operators::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(operators::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
}

pub async fn create_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: OperatorCreate,
) -> Result<operators::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    operators::ActiveModel {
        id: NotSet,
        nickname: Set(dto.nickname),
        full_name: Set(dto.full_name),
        email: Set(dto.email),
        phone: Set(dto.phone),
        avatar_url: Set(None),
        role: Set(dto.role),
        verified: Set(false),
        engagement_score: Set(0),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

async fn load_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<operators::ActiveModel, sea_orm::DbErr> {
    Ok(operators::Entity::find_by_id(operator_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Operator not found".to_string()))?
        .into())
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    dto: OperatorUpdate,
) -> Result<operators::Model, sea_orm::DbErr> {
    let mut operator = load_for_update(conn, operator_id).await?;

    if let Some(nickname) = dto.nickname {
        operator.nickname = Set(nickname);
    }
    if let Some(full_name) = dto.full_name {
        operator.full_name = Set(Some(full_name));
    }
    if let Some(phone) = dto.phone {
        operator.phone = Set(Some(phone));
    }
    if let Some(avatar_url) = dto.avatar_url {
        operator.avatar_url = Set(Some(avatar_url));
    }
    operator.updated_at = Set(OffsetDateTime::now_utc());
    operator.update(conn).await
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    is_active: bool,
) -> Result<operators::Model, sea_orm::DbErr> {
    let mut operator = load_for_update(conn, operator_id).await?;
    operator.is_active = Set(is_active);
    operator.updated_at = Set(OffsetDateTime::now_utc());
    operator.update(conn).await
}

pub async fn set_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    role: Role,
) -> Result<operators::Model, sea_orm::DbErr> {
    let mut operator = load_for_update(conn, operator_id).await?;
    operator.role = Set(role);
    operator.updated_at = Set(OffsetDateTime::now_utc());
    operator.update(conn).await
}

pub async fn set_verified<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    verified: bool,
) -> Result<operators::Model, sea_orm::DbErr> {
    let mut operator = load_for_update(conn, operator_id).await?;
    operator.verified = Set(verified);
    operator.updated_at = Set(OffsetDateTime::now_utc());
    operator.update(conn).await
}

pub async fn set_engagement_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
    score: i32,
) -> Result<operators::Model, sea_orm::DbErr> {
    let mut operator = load_for_update(conn, operator_id).await?;
    operator.engagement_score = Set(score);
    operator.updated_at = Set(OffsetDateTime::now_utc());
    operator.update(conn).await
}

/// One page of active operators, highest engagement first.
pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<operators::Model>, u64), sea_orm::DbErr> {
    let query = operators::Entity::find().filter(operators::Column::IsActive.eq(true));
    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(operators::Column::EngagementScore)
        .order_by_asc(operators::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

/// Active operators whose nickname or full name contains `q`.
pub async fn search_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    q: &str,
    limit: u64,
) -> Result<Vec<operators::Model>, sea_orm::DbErr> {
    operators::Entity::find()
        .filter(operators::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(contains_ci(operators::Column::Nickname, q))
                .add(contains_ci(operators::Column::FullName, q)),
        )
        .order_by_asc(operators::Column::Nickname)
        .limit(limit)
        .all(conn)
        .await
}

/// Admin listing over every operator, newest first.
pub async fn list_filtered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &OperatorFilter,
    offset: u64,
    limit: u64,
) -> Result<(Vec<operators::Model>, u64), sea_orm::DbErr> {
    let mut query = operators::Entity::find();
    if let Some(q) = filter.search.as_deref() {
        query = query.filter(
            Condition::any()
                .add(contains_ci(operators::Column::Nickname, q))
                .add(contains_ci(operators::Column::Email, q))
                .add(contains_ci(operators::Column::FullName, q)),
        );
    }
    if let Some(role) = filter.role {
        query = query.filter(operators::Column::Role.eq(role));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(operators::Column::CreatedAt)
        .order_by_desc(operators::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

/// Lowest id among active admins.
pub async fn first_active_admin_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<i64>, sea_orm::DbErr> {
    operators::Entity::find()
        .select_only()
        .column(operators::Column::Id)
        .filter(operators::Column::Role.eq(Role::Admin))
        .filter(operators::Column::IsActive.eq(true))
        .order_by_asc(operators::Column::Id)
        .into_tuple::<i64>()
        .one(conn)
        .await
}

/// `(all, active)` operator counts.
pub async fn counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<(u64, u64), sea_orm::DbErr> {
    let total = operators::Entity::find().count(conn).await?;
    let active = operators::Entity::find()
        .filter(operators::Column::IsActive.eq(true))
        .count(conn)
        .await?;
    Ok((total, active))
}
