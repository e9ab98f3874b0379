//! Dense ranking and derived statistics.
//!
//! Ordering: `total_points` desc, then `games_won` desc, then `squad_id` asc.
//! Positions are 1-based with no gaps and no shared ranks.

use std::cmp::Ordering;

/// The raw counters a placement is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingStats {
    pub ranking_id: i64,
    pub squad_id: i64,
    pub total_points: i32,
    pub games_played: i32,
    pub games_won: i32,
    pub total_eliminations: i32,
}

/// Computed fields to persist for one ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingPlacement {
    pub ranking_id: i64,
    pub squad_id: i64,
    pub position: i32,
    pub win_rate: f64,
    pub average_eliminations_per_game: f64,
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of games won, 0 when no games were played.
pub fn win_rate(games_won: i32, games_played: i32) -> f64 {
    if games_played <= 0 {
        return 0.0;
    }
    round2(f64::from(games_won) / f64::from(games_played) * 100.0)
}

pub fn average_eliminations(total_eliminations: i32, games_played: i32) -> f64 {
    if games_played <= 0 {
        return 0.0;
    }
    round2(f64::from(total_eliminations) / f64::from(games_played))
}

fn leaderboard_order(a: &RankingStats, b: &RankingStats) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| b.games_won.cmp(&a.games_won))
        .then_with(|| a.squad_id.cmp(&b.squad_id))
}

/// Order `stats` and derive every placement. Input order is irrelevant.
pub fn rank_squads(stats: &[RankingStats]) -> Vec<RankingPlacement> {
    let mut sorted: Vec<&RankingStats> = stats.iter().collect();
    sorted.sort_by(|a, b| leaderboard_order(a, b));

    sorted
        .into_iter()
        .zip(1..)
        .map(|(s, position)| RankingPlacement {
            ranking_id: s.ranking_id,
            squad_id: s.squad_id,
            position,
            win_rate: win_rate(s.games_won, s.games_played),
            average_eliminations_per_game: average_eliminations(
                s.total_eliminations,
                s.games_played,
            ),
        })
        .collect()
}
