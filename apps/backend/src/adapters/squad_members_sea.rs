//! SeaORM adapter for the squad_members join table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::{operators, squad_members, squads};

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<Option<squad_members::Model>, sea_orm::DbErr> {
    squad_members::Entity::find()
        .filter(squad_members::Column::SquadId.eq(squad_id))
        .filter(squad_members::Column::OperatorId.eq(operator_id))
        .one(conn)
        .await
}

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<squad_members::Model, sea_orm::DbErr> {
    squad_members::ActiveModel {
        id: NotSet,
        squad_id: Set(squad_id),
        operator_id: Set(operator_id),
        joined_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    operator_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = squad_members::Entity::delete_many()
        .filter(squad_members::Column::SquadId.eq(squad_id))
        .filter(squad_members::Column::OperatorId.eq(operator_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Members of a squad with their operators, in join order.
pub async fn list_for_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Vec<(squad_members::Model, Option<operators::Model>)>, sea_orm::DbErr> {
    squad_members::Entity::find()
        .filter(squad_members::Column::SquadId.eq(squad_id))
        .find_also_related(operators::Entity)
        .order_by_asc(squad_members::Column::JoinedAt)
        .order_by_asc(squad_members::Column::Id)
        .all(conn)
        .await
}

/// Squads an operator belongs to, in join order.
pub async fn list_for_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Vec<(squad_members::Model, Option<squads::Model>)>, sea_orm::DbErr> {
    squad_members::Entity::find()
        .filter(squad_members::Column::OperatorId.eq(operator_id))
        .find_also_related(squads::Entity)
        .order_by_asc(squad_members::Column::JoinedAt)
        .order_by_asc(squad_members::Column::Id)
        .all(conn)
        .await
}
