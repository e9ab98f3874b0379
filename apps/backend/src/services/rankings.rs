//! Ranking recalculation and leaderboard reads.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::{error, info};

use crate::db::txn::with_nested_txn;
use crate::domain::pagination::{Page, PageMeta, PageRequest};
use crate::domain::ranking::{rank_squads, RankingStats};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::rankings::{self, LeaderboardEntry};

pub struct RankingService;

impl RankingService {
    pub fn new() -> Self {
        Self
    }

    /// Re-rank every active ranking and refresh its derived statistics.
    ///
    /// All rows are written in one transaction; any failure rolls the whole
    /// batch back. Returns the number of rankings processed.
    pub async fn recalculate<C: TransactionTrait>(&self, conn: &C) -> Result<usize, DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let active = rankings::list_active(txn).await?;
                let stats: Vec<RankingStats> = active.iter().map(RankingStats::from).collect();
                let placements = rank_squads(&stats);

                for placement in &placements {
                    rankings::save_placement(txn, placement)
                        .await
                        .map_err(|e| {
                            error!(
                                ranking_id = placement.ranking_id,
                                error = %e,
                                "Ranking write failed; rolling back recalculation"
                            );
                            DomainError::infra(
                                InfraErrorKind::Other("Recalculation".into()),
                                "Ranking recalculation failed",
                            )
                        })?;
                }

                info!(processed = placements.len(), "Rankings recalculated");
                Ok(placements.len())
            })
        })
        .await
    }

    pub async fn leaderboard<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        request: PageRequest,
    ) -> Result<Page<LeaderboardEntry>, DomainError> {
        let (data, total) = rankings::leaderboard_page(conn, request.offset(), request.limit).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(request, total),
        })
    }

    pub async fn squad_ranking<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        squad_id: i64,
    ) -> Result<LeaderboardEntry, DomainError> {
        rankings::require_active_by_squad(conn, squad_id).await
    }
}

impl Default for RankingService {
    fn default() -> Self {
        Self::new()
    }
}
