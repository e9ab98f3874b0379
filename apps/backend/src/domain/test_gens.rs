// Proptest generators for ranking inputs.

use proptest::prelude::*;

use crate::domain::ranking::RankingStats;

/// Counters consistent with each other: won <= played.
pub fn ranking_stats(squad_id: i64) -> impl Strategy<Value = RankingStats> {
    (0..500i32, 0..40i32, 0..400i32)
        .prop_flat_map(move |(points, played, elims)| {
            (Just(points), Just(played), 0..=played, Just(elims))
        })
        .prop_map(move |(points, played, won, elims)| RankingStats {
            ranking_id: squad_id + 1000,
            squad_id,
            total_points: points,
            games_played: played,
            games_won: won,
            total_eliminations: elims,
        })
}

/// Up to `max` rankings with distinct squad ids.
pub fn leaderboard(max: usize) -> impl Strategy<Value = Vec<RankingStats>> {
    (0..=max).prop_flat_map(|n| {
        (1..=n as i64)
            .map(ranking_stats)
            .collect::<Vec<_>>()
    })
}
