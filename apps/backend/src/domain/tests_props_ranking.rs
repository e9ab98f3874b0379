//! Property tests for ranking recalculation (pure domain, no DB).
//!
//! Properties tested:
//! - Positions are a dense permutation of 1..=N
//! - Points never increase down the leaderboard
//! - Output does not depend on input order
//! - Derived statistics stay in range

use proptest::prelude::*;

use crate::domain::ranking::rank_squads;
use crate::domain::test_gens;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_positions_are_dense(stats in test_gens::leaderboard(24)) {
        let placements = rank_squads(&stats);
        prop_assert_eq!(placements.len(), stats.len());

        let mut positions: Vec<i32> = placements.iter().map(|p| p.position).collect();
        positions.sort_unstable();
        let expected: Vec<i32> = (1..=stats.len() as i32).collect();
        prop_assert_eq!(positions, expected);
    }

    #[test]
    fn prop_points_descend(stats in test_gens::leaderboard(24)) {
        let placements = rank_squads(&stats);
        let points: Vec<i32> = placements
            .iter()
            .map(|p| {
                stats
                    .iter()
                    .find(|s| s.squad_id == p.squad_id)
                    .map(|s| s.total_points)
                    .unwrap_or_default()
            })
            .collect();
        prop_assert!(points.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prop_input_order_irrelevant(stats in test_gens::leaderboard(16)) {
        let mut reversed = stats.clone();
        reversed.reverse();
        prop_assert_eq!(rank_squads(&stats), rank_squads(&reversed));
    }

    #[test]
    fn prop_derived_stats_in_range(stats in test_gens::leaderboard(16)) {
        for (p, s) in rank_squads(&stats).iter().filter_map(|p| {
            stats.iter().find(|s| s.squad_id == p.squad_id).map(|s| (p, s))
        }) {
            prop_assert!((0.0..=100.0).contains(&p.win_rate));
            prop_assert!(p.average_eliminations_per_game >= 0.0);
            if s.games_played == 0 {
                prop_assert_eq!(p.win_rate, 0.0);
                prop_assert_eq!(p.average_eliminations_per_game, 0.0);
            }
        }
    }
}
