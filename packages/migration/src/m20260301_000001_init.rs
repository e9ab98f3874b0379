use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Operators {
    Table,
    Id,
    Nickname,
    FullName,
    Email,
    Phone,
    AvatarUrl,
    Role,
    Verified,
    EngagementScore,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Squads {
    Table,
    Id,
    Name,
    Tag,
    Description,
    Specialty,
    State,
    LeaderId,
    TotalMembers,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    Name,
    Description,
    Location,
    StartDate,
    EndDate,
    GameType,
    Status,
    MaxPlayers,
    CurrentPlayers,
    RegistrationFee,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GameSquads {
    Table,
    Id,
    GameId,
    SquadId,
    JoinedAt,
}

#[derive(Iden)]
enum GameOperators {
    Table,
    Id,
    GameId,
    OperatorId,
    JoinedAt,
}

#[derive(Iden)]
enum Rankings {
    Table,
    Id,
    SquadId,
    Position,
    TotalPoints,
    GamesPlayed,
    GamesWon,
    GamesLost,
    WinRate,
    TotalEliminations,
    AverageEliminationsPerGame,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SquadMembers {
    Table,
    Id,
    SquadId,
    OperatorId,
    JoinedAt,
}

#[derive(Iden)]
enum JoinRequests {
    Table,
    Id,
    SquadId,
    OperatorId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    OperatorId,
    GameId,
    Amount,
    Method,
    Status,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // operators
        manager
            .create_table(
                Table::create()
                    .table(Operators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operators::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Operators::Nickname).string_len(64).not_null())
                    .col(ColumnDef::new(Operators::FullName).string_len(200).null())
                    .col(ColumnDef::new(Operators::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Operators::Phone).string_len(20).null())
                    .col(ColumnDef::new(Operators::AvatarUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Operators::Role)
                            .string_len(32)
                            .not_null()
                            .default("PLAYER"),
                    )
                    .col(
                        ColumnDef::new(Operators::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Operators::EngagementScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Operators::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Operators::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Operators::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_operators_nickname")
                    .table(Operators::Table)
                    .col(Operators::Nickname)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_operators_email")
                    .table(Operators::Table)
                    .col(Operators::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // squads
        manager
            .create_table(
                Table::create()
                    .table(Squads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Squads::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Squads::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Squads::Tag).string_len(16).null())
                    .col(ColumnDef::new(Squads::Description).string_len(500).null())
                    .col(
                        ColumnDef::new(Squads::Specialty)
                            .string_len(32)
                            .not_null()
                            .default("ASSALTO"),
                    )
                    .col(ColumnDef::new(Squads::State).string_len(2).null())
                    .col(ColumnDef::new(Squads::LeaderId).big_integer().null())
                    .col(
                        ColumnDef::new(Squads::TotalMembers)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Squads::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Squads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Squads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_squads_leader_id")
                            .from(Squads::Table, Squads::LeaderId)
                            .to(Operators::Table, Operators::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_squads_name")
                    .table(Squads::Table)
                    .col(Squads::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_squads_leader_id")
                    .table(Squads::Table)
                    .col(Squads::LeaderId)
                    .to_owned(),
            )
            .await?;

        // squad_members
        manager
            .create_table(
                Table::create()
                    .table(SquadMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SquadMembers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(SquadMembers::SquadId).big_integer().not_null())
                    .col(
                        ColumnDef::new(SquadMembers::OperatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SquadMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_squad_members_squad_id")
                            .from(SquadMembers::Table, SquadMembers::SquadId)
                            .to(Squads::Table, Squads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_squad_members_operator_id")
                            .from(SquadMembers::Table, SquadMembers::OperatorId)
                            .to(Operators::Table, Operators::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_squad_members_squad_operator")
                    .table(SquadMembers::Table)
                    .col(SquadMembers::SquadId)
                    .col(SquadMembers::OperatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // join_requests
        manager
            .create_table(
                Table::create()
                    .table(JoinRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JoinRequests::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(JoinRequests::SquadId).big_integer().not_null())
                    .col(
                        ColumnDef::new(JoinRequests::OperatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JoinRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(JoinRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JoinRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_requests_squad_id")
                            .from(JoinRequests::Table, JoinRequests::SquadId)
                            .to(Squads::Table, Squads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_requests_operator_id")
                            .from(JoinRequests::Table, JoinRequests::OperatorId)
                            .to(Operators::Table, Operators::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_join_requests_squad_operator")
                    .table(JoinRequests::Table)
                    .col(JoinRequests::SquadId)
                    .col(JoinRequests::OperatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Games::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Games::Description).text().null())
                    .col(ColumnDef::new(Games::Location).string_len(255).null())
                    .col(
                        ColumnDef::new(Games::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::GameType)
                            .string_len(32)
                            .not_null()
                            .default("MILSIM"),
                    )
                    .col(
                        ColumnDef::new(Games::Status)
                            .string_len(32)
                            .not_null()
                            .default("SCHEDULED"),
                    )
                    .col(ColumnDef::new(Games::MaxPlayers).integer().null())
                    .col(
                        ColumnDef::new(Games::CurrentPlayers)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::RegistrationFee)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Games::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_status_start_date")
                    .table(Games::Table)
                    .col(Games::Status)
                    .col(Games::StartDate)
                    .to_owned(),
            )
            .await?;

        // game_squads
        manager
            .create_table(
                Table::create()
                    .table(GameSquads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSquads::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GameSquads::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GameSquads::SquadId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameSquads::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_squads_game_id")
                            .from(GameSquads::Table, GameSquads::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_squads_squad_id")
                            .from(GameSquads::Table, GameSquads::SquadId)
                            .to(Squads::Table, Squads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_squads_game_squad")
                    .table(GameSquads::Table)
                    .col(GameSquads::GameId)
                    .col(GameSquads::SquadId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // game_operators
        manager
            .create_table(
                Table::create()
                    .table(GameOperators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameOperators::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(GameOperators::GameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameOperators::OperatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameOperators::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_operators_game_id")
                            .from(GameOperators::Table, GameOperators::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_operators_operator_id")
                            .from(GameOperators::Table, GameOperators::OperatorId)
                            .to(Operators::Table, Operators::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_operators_game_operator")
                    .table(GameOperators::Table)
                    .col(GameOperators::GameId)
                    .col(GameOperators::OperatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // rankings
        manager
            .create_table(
                Table::create()
                    .table(Rankings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rankings::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Rankings::SquadId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rankings::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rankings::TotalPoints)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rankings::GamesPlayed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rankings::GamesWon)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rankings::GamesLost)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rankings::WinRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Rankings::TotalEliminations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rankings::AverageEliminationsPerGame)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Rankings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Rankings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rankings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rankings_squad_id")
                            .from(Rankings::Table, Rankings::SquadId)
                            .to(Squads::Table, Squads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_rankings_squad_id")
                    .table(Rankings::Table)
                    .col(Rankings::SquadId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_rankings_active_position")
                    .table(Rankings::Table)
                    .col(Rankings::IsActive)
                    .col(Rankings::Position)
                    .to_owned(),
            )
            .await?;

        // payments
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Payments::OperatorId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::GameId).big_integer().null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::Method).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Payments::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_operator_id")
                            .from(Payments::Table, Payments::OperatorId)
                            .to(Operators::Table, Operators::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_game_id")
                            .from(Payments::Table, Payments::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_payments_operator_created")
                    .table(Payments::Table)
                    .col(Payments::OperatorId)
                    .col(Payments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // dependents first; indexes go with their tables
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rankings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(GameOperators::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(GameSquads::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(JoinRequests::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SquadMembers::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Squads::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Operators::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
