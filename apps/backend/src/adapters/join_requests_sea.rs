//! SeaORM adapter for squad join requests.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::join_requests::{self, JoinRequestStatus};
use crate::entities::operators;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
) -> Result<Option<join_requests::Model>, sea_orm::DbErr> {
    join_requests::Entity::find_by_id(request_id).one(conn).await
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<Option<join_requests::Model>, sea_orm::DbErr> {
    join_requests::Entity::find()
        .filter(join_requests::Column::SquadId.eq(squad_id))
        .filter(join_requests::Column::OperatorId.eq(operator_id))
        .one(conn)
        .await
}

pub async fn insert_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<join_requests::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    join_requests::ActiveModel {
        id: NotSet,
        squad_id: Set(squad_id),
        operator_id: Set(operator_id),
        status: Set(JoinRequestStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
    status: JoinRequestStatus,
) -> Result<join_requests::Model, sea_orm::DbErr> {
    let mut request: join_requests::ActiveModel = join_requests::Entity::find_by_id(request_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Join request not found".to_string()))?
        .into();
    request.status = Set(status);
    request.updated_at = Set(OffsetDateTime::now_utc());
    request.update(conn).await
}

/// Pending requests for a squad with their operators, newest first.
pub async fn list_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Vec<(join_requests::Model, Option<operators::Model>)>, sea_orm::DbErr> {
    join_requests::Entity::find()
        .filter(join_requests::Column::SquadId.eq(squad_id))
        .filter(join_requests::Column::Status.eq(JoinRequestStatus::Pending))
        .find_also_related(operators::Entity)
        .order_by_desc(join_requests::Column::CreatedAt)
        .order_by_desc(join_requests::Column::Id)
        .all(conn)
        .await
}
