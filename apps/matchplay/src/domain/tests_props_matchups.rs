//! Property tests for matchup generation.
//!
//! Properties tested:
//! - Each unordered pair of players is teammates in exactly one combination
//! - Every combination uses all four players exactly once

use proptest::prelude::*;

use crate::domain::matchups::generate_combinations;
use crate::domain::roster::{Player, Roster};
use crate::domain::test_prelude;

fn distinct_roster() -> impl Strategy<Value = Roster> {
    prop::collection::hash_set("[a-z0-9]{1,8}", 4).prop_map(|ids| {
        let players: Vec<Player> = ids
            .into_iter()
            .map(|id| Player::new(id.clone(), id))
            .collect();
        Roster::try_from_players(players).expect("four distinct ids")
    })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_each_pair_teammates_exactly_once(roster in distinct_roster()) {
        let combos = generate_combinations(&roster);
        let ids = roster.ids();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let together = combos
                    .iter()
                    .filter(|c| c.teammates(ids[i], ids[j]))
                    .count();
                prop_assert_eq!(together, 1, "{} and {}", ids[i], ids[j]);
            }
        }
    }

    #[test]
    fn prop_combination_covers_whole_roster(roster in distinct_roster()) {
        for combo in generate_combinations(&roster) {
            for id in roster.ids() {
                let on_team1 = combo.team1.contains(id);
                let on_team2 = combo.team2.contains(id);
                prop_assert!(on_team1 ^ on_team2);
            }
        }
    }
}
