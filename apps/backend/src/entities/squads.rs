use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialty {
    #[sea_orm(string_value = "ASSALTO")]
    Assalto,
    #[sea_orm(string_value = "RECONHECIMENTO")]
    Reconhecimento,
    #[sea_orm(string_value = "SUPORTE")]
    Suporte,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "squads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Specialty,
    /// Two-letter state code.
    pub state: Option<String>,
    #[sea_orm(column_name = "leader_id")]
    pub leader_id: Option<i64>,
    /// Kept in step with `squad_members` by the squad service.
    #[sea_orm(column_name = "total_members")]
    pub total_members: i32,
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
    #[sea_orm(has_one = "super::rankings::Entity")]
    Ranking,
    #[sea_orm(has_many = "super::squad_members::Entity")]
    SquadMembers,
    #[sea_orm(has_many = "super::join_requests::Entity")]
    JoinRequests,
    #[sea_orm(
        belongs_to = "super::operators::Entity",
        from = "Column::LeaderId",
        to = "super::operators::Column::Id"
    )]
    Leader,
}

impl Related<super::game_squads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameSquads.def()
    }
}

impl Related<super::rankings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ranking.def()
    }
}

impl Related<super::squad_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SquadMembers.def()
    }
}

impl Related<super::join_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JoinRequests.def()
    }
}

impl Related<super::operators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
