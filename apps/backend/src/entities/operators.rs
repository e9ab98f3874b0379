use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "PLAYER")]
    Player,
    #[sea_orm(string_value = "SQUAD_LEADER")]
    SquadLeader,
    #[sea_orm(string_value = "ORGANIZER")]
    Organizer,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operators")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nickname: String,
    #[sea_orm(column_name = "full_name")]
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(column_name = "avatar_url")]
    pub avatar_url: Option<String>,
    pub role: Role,
    pub verified: bool,
    #[sea_orm(column_name = "engagement_score")]
    pub engagement_score: i32,
    #[sea_orm(column_name = "is_active")]
    pub is_active: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_operators::Entity")]
    GameOperators,
    #[sea_orm(has_many = "super::squad_members::Entity")]
    SquadMembers,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::game_operators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameOperators.def()
    }
}

impl Related<super::squad_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SquadMembers.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
