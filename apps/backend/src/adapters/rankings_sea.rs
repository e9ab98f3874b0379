//! SeaORM adapter for rankings.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::{rankings, squads};

/// Raw counters as written by match-result recording.
#[derive(Debug, Clone, Default)]
pub struct RankingCreate {
    pub squad_id: i64,
    pub total_points: i32,
    pub games_played: i32,
    pub games_won: i32,
    pub games_lost: i32,
    pub total_eliminations: i32,
    pub is_active: bool,
}

impl RankingCreate {
    pub fn new(squad_id: i64) -> Self {
        Self {
            squad_id,
            is_active: true,
            ..Self::default()
        }
    }

    pub fn with_points(mut self, total_points: i32) -> Self {
        self.total_points = total_points;
        self
    }

    pub fn with_record(mut self, played: i32, won: i32, lost: i32) -> Self {
        self.games_played = played;
        self.games_won = won;
        self.games_lost = lost;
        self
    }

    pub fn with_eliminations(mut self, total_eliminations: i32) -> Self {
        self.total_eliminations = total_eliminations;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

pub async fn create_ranking<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RankingCreate,
) -> Result<rankings::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    rankings::ActiveModel {
        id: NotSet,
        squad_id: Set(dto.squad_id),
        position: Set(0),
        total_points: Set(dto.total_points),
        games_played: Set(dto.games_played),
        games_won: Set(dto.games_won),
        games_lost: Set(dto.games_lost),
        win_rate: Set(0.0),
        total_eliminations: Set(dto.total_eliminations),
        average_eliminations_per_game: Set(0.0),
        is_active: Set(dto.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ranking_id: i64,
) -> Result<Option<rankings::Model>, sea_orm::DbErr> {
    rankings::Entity::find_by_id(ranking_id).one(conn).await
}

/// All active rankings in id order.
pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<rankings::Model>, sea_orm::DbErr> {
    rankings::Entity::find()
        .filter(rankings::Column::IsActive.eq(true))
        .order_by_asc(rankings::Column::Id)
        .all(conn)
        .await
}

/// Write position and derived statistics for one ranking.
pub async fn update_placement<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ranking_id: i64,
    position: i32,
    win_rate: f64,
    average_eliminations_per_game: f64,
) -> Result<(), sea_orm::DbErr> {
    let result = rankings::Entity::update_many()
        .col_expr(rankings::Column::Position, Expr::val(position).into())
        .col_expr(rankings::Column::WinRate, Expr::val(win_rate).into())
        .col_expr(
            rankings::Column::AverageEliminationsPerGame,
            Expr::val(average_eliminations_per_game).into(),
        )
        .col_expr(
            rankings::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(rankings::Column::Id.eq(ranking_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(format!(
            "Ranking {ranking_id} not found"
        )));
    }
    Ok(())
}

/// One leaderboard page (position asc, squad id asc) plus the total count.
pub async fn leaderboard_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<(rankings::Model, Option<squads::Model>)>, u64), sea_orm::DbErr> {
    let base = rankings::Entity::find().filter(rankings::Column::IsActive.eq(true));
    let total = base.clone().count(conn).await?;

    let rows = base
        .find_also_related(squads::Entity)
        .order_by_asc(rankings::Column::Position)
        .order_by_asc(rankings::Column::SquadId)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;

    Ok((rows, total))
}

pub async fn find_active_by_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Option<(rankings::Model, Option<squads::Model>)>, sea_orm::DbErr> {
    rankings::Entity::find()
        .filter(rankings::Column::SquadId.eq(squad_id))
        .filter(rankings::Column::IsActive.eq(true))
        .find_also_related(squads::Entity)
        .one(conn)
        .await
}
