use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rankings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "squad_id", unique)]
    pub squad_id: i64,
    pub position: i32,
    #[sea_orm(column_name = "total_points")]
    pub total_points: i32,
    #[sea_orm(column_name = "games_played")]
    pub games_played: i32,
    #[sea_orm(column_name = "games_won")]
    pub games_won: i32,
    #[sea_orm(column_name = "games_lost")]
    pub games_lost: i32,
    /// Derived: percentage in 0..=100
    #[sea_orm(column_name = "win_rate", column_type = "Double")]
    pub win_rate: f64,
    #[sea_orm(column_name = "total_eliminations")]
    pub total_eliminations: i32,
    /// Derived
    #[sea_orm(column_name = "average_eliminations_per_game", column_type = "Double")]
    pub average_eliminations_per_game: f64,
    #[sea_orm(column_name = "is_active")]
    pub is_active: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::squads::Entity",
        from = "Column::SquadId",
        to = "super::squads::Column::Id"
    )]
    Squad,
}

impl Related<super::squads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Squad.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
