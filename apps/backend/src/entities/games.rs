use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    #[sea_orm(string_value = "REGISTRATION_OPEN")]
    RegistrationOpen,
    #[sea_orm(string_value = "REGISTRATION_CLOSED")]
    RegistrationClosed,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    #[sea_orm(string_value = "MILSIM")]
    Milsim,
    #[sea_orm(string_value = "CQB")]
    Cqb,
    #[sea_orm(string_value = "WOODLAND")]
    Woodland,
    #[sea_orm(string_value = "SKIRMISH")]
    Skirmish,
    #[sea_orm(string_value = "SCENARIO")]
    Scenario,
    #[sea_orm(string_value = "CTF")]
    Ctf,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[sea_orm(column_name = "start_date")]
    pub start_date: OffsetDateTime,
    #[sea_orm(column_name = "end_date")]
    pub end_date: Option<OffsetDateTime>,
    #[sea_orm(column_name = "game_type")]
    pub game_type: GameType,
    pub status: GameStatus,
    #[sea_orm(column_name = "max_players")]
    pub max_players: Option<i32>,
    #[sea_orm(column_name = "current_players")]
    pub current_players: i32,
    #[sea_orm(column_name = "registration_fee", column_type = "Double")]
    pub registration_fee: f64,
    #[sea_orm(column_name = "is_active")]
    pub is_active: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_squads::Entity")]
    GameSquads,
    #[sea_orm(has_many = "super::game_operators::Entity")]
    GameOperators,
}

impl Related<super::game_squads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameSquads.def()
    }
}

impl Related<super::game_operators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameOperators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
