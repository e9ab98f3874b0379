//! Ranking repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::rankings_sea as rankings_adapter;
use crate::domain::ranking::{RankingPlacement, RankingStats};
use crate::entities::{rankings, squads};
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub id: i64,
    pub squad_id: i64,
    pub position: i32,
    pub total_points: i32,
    pub games_played: i32,
    pub games_won: i32,
    pub games_lost: i32,
    pub win_rate: f64,
    pub total_eliminations: i32,
    pub average_eliminations_per_game: f64,
    pub is_active: bool,
}

impl From<rankings::Model> for Ranking {
    fn from(model: rankings::Model) -> Self {
        Self {
            id: model.id,
            squad_id: model.squad_id,
            position: model.position,
            total_points: model.total_points,
            games_played: model.games_played,
            games_won: model.games_won,
            games_lost: model.games_lost,
            win_rate: model.win_rate,
            total_eliminations: model.total_eliminations,
            average_eliminations_per_game: model.average_eliminations_per_game,
            is_active: model.is_active,
        }
    }
}

impl From<&Ranking> for RankingStats {
    fn from(r: &Ranking) -> Self {
        RankingStats {
            ranking_id: r.id,
            squad_id: r.squad_id,
            total_points: r.total_points,
            games_played: r.games_played,
            games_won: r.games_won,
            total_eliminations: r.total_eliminations,
        }
    }
}

/// A ranking with its squad's display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub ranking: Ranking,
    pub squad_name: String,
    pub squad_tag: Option<String>,
}

fn entry((ranking, squad): (rankings::Model, Option<squads::Model>)) -> LeaderboardEntry {
    let (squad_name, squad_tag) = squad.map(|s| (s.name, s.tag)).unwrap_or_default();
    LeaderboardEntry {
        ranking: Ranking::from(ranking),
        squad_name,
        squad_tag,
    }
}

pub async fn create_ranking<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: rankings_adapter::RankingCreate,
) -> Result<Ranking, DomainError> {
    let ranking = rankings_adapter::create_ranking(conn, dto).await?;
    Ok(Ranking::from(ranking))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ranking_id: i64,
) -> Result<Option<Ranking>, DomainError> {
    let ranking = rankings_adapter::find_by_id(conn, ranking_id).await?;
    Ok(ranking.map(Ranking::from))
}

pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Ranking>, DomainError> {
    let rows = rankings_adapter::list_active(conn).await?;
    Ok(rows.into_iter().map(Ranking::from).collect())
}

pub async fn save_placement<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    placement: &RankingPlacement,
) -> Result<(), DomainError> {
    rankings_adapter::update_placement(
        conn,
        placement.ranking_id,
        placement.position,
        placement.win_rate,
        placement.average_eliminations_per_game,
    )
    .await?;
    Ok(())
}

pub async fn leaderboard_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<LeaderboardEntry>, u64), DomainError> {
    let (rows, total) = rankings_adapter::leaderboard_page(conn, offset, limit).await?;
    Ok((rows.into_iter().map(entry).collect(), total))
}

pub async fn require_active_by_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<LeaderboardEntry, DomainError> {
    rankings_adapter::find_active_by_squad(conn, squad_id)
        .await?
        .map(entry)
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Ranking,
                format!("No active ranking for squad {squad_id}"),
            )
        })
}

pub async fn find_active_by_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
) -> Result<Option<LeaderboardEntry>, DomainError> {
    let row = rankings_adapter::find_active_by_squad(conn, squad_id).await?;
    Ok(row.map(entry))
}
