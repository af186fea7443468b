//! Reinforcement math.
//!
//! Territory and continent bonuses computed at the start of each turn, and
//! the escalating schedule for card-set trades. All functions here are pure;
//! pool bookkeeping lives in the turn controller.

use crate::board::map::{ContinentId, MapGraph};
use crate::board::player::PlayerId;
use crate::board::state::GameState;

/// Fixed bonus schedule for the first six traded sets.
const TRADE_SCHEDULE: [u32; 6] = [4, 6, 8, 10, 12, 15];

/// Per-set increment once the schedule is exhausted.
const TRADE_INCREMENT: u32 = 5;

/// Flat bonus placed on an occupied territory named by a traded card.
pub const OCCUPIED_CARD_BONUS: u32 = 2;

/// Armies for owning `owned` territories: one per three, floor, minimum 3.
pub fn territory_bonus(owned: usize) -> u32 {
    ((owned / 3) as u32).max(3)
}

/// Continents fully controlled by the player, in continent order.
pub fn controlled_continents(
    map: &MapGraph,
    state: &GameState,
    player: PlayerId,
) -> Vec<ContinentId> {
    map.continents()
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            !c.members.is_empty() && c.members.iter().all(|t| state.owner(*t) == Some(player))
        })
        .map(|(i, _)| ContinentId(i as u8))
        .collect()
}

/// Sum of bonuses for continents fully controlled by the player.
pub fn continent_bonus(map: &MapGraph, state: &GameState, player: PlayerId) -> u32 {
    controlled_continents(map, state, player)
        .iter()
        .map(|c| map.continent(*c).bonus_armies)
        .sum()
}

/// Bonus for the `set_index`-th set traded globally (1-based).
///
/// Indexes 1..=6 follow the fixed schedule {4,6,8,10,12,15}; beyond that the
/// bonus grows by 5 per set.
pub fn trade_bonus(set_index: u32) -> u32 {
    if set_index == 0 {
        return 0;
    }
    let i = set_index as usize;
    if i <= TRADE_SCHEDULE.len() {
        TRADE_SCHEDULE[i - 1]
    } else {
        TRADE_SCHEDULE[TRADE_SCHEDULE.len() - 1]
            + TRADE_INCREMENT * (set_index - TRADE_SCHEDULE.len() as u32)
    }
}

/// The territory + continent entitlement for a player's new turn. Neutral
/// seats never reinforce.
pub fn turn_entitlement(map: &MapGraph, state: &GameState, player: PlayerId) -> u32 {
    if state.player(player).neutral {
        return 0;
    }
    territory_bonus(state.owned_count(player)) + continent_bonus(map, state, player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::card::Deck;
    use crate::board::map::TerritoryId;
    use crate::board::player::Player;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::map::TINY_MAP;

    #[test]
    fn territory_bonus_floors_at_three() {
        for owned in 0..=11 {
            assert_eq!(territory_bonus(owned), 3, "owned = {}", owned);
        }
        assert_eq!(territory_bonus(12), 4);
        assert_eq!(territory_bonus(14), 4);
        assert_eq!(territory_bonus(15), 5);
        assert_eq!(territory_bonus(42), 14);
    }

    #[test]
    fn trade_bonus_follows_escalating_schedule() {
        let expected = [4, 6, 8, 10, 12, 15, 20, 25];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(trade_bonus(i as u32 + 1), *want, "set index {}", i + 1);
        }
        assert_eq!(trade_bonus(10), 35);
    }

    fn owned_state(owners: [Option<u8>; 4]) -> (MapGraph, GameState) {
        let map = MapGraph::from_json(TINY_MAP).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let deck = Deck::standard(&map, &mut rng);
        let players = vec![Player::new("P1", "Red"), Player::new("P2", "Blue")];
        let mut state = GameState::new(&map, players, deck, false);
        for (i, owner) in owners.iter().enumerate() {
            if let Some(p) = owner {
                state.set_owner(TerritoryId(i as u16), PlayerId(*p));
                state.add_armies(TerritoryId(i as u16), 1);
            }
        }
        (map, state)
    }

    #[test]
    fn continent_bonus_requires_full_ownership() {
        // P1 owns all of West (t0, t1) but only half of East.
        let (map, state) = owned_state([Some(0), Some(0), Some(0), Some(1)]);
        assert_eq!(continent_bonus(&map, &state, PlayerId(0)), 3);
        assert_eq!(continent_bonus(&map, &state, PlayerId(1)), 0);
    }

    #[test]
    fn continent_bonus_sums_multiple_continents() {
        let (map, state) = owned_state([Some(0), Some(0), Some(0), Some(0)]);
        assert_eq!(continent_bonus(&map, &state, PlayerId(0)), 5);
        let controlled = controlled_continents(&map, &state, PlayerId(0));
        assert_eq!(controlled.len(), 2);
    }

    #[test]
    fn turn_entitlement_combines_bonuses() {
        let (map, state) = owned_state([Some(0), Some(0), Some(0), Some(1)]);
        // 3 territories -> base 3, plus West's bonus 3.
        assert_eq!(turn_entitlement(&map, &state, PlayerId(0)), 6);
        // 1 territory -> base 3, no continent.
        assert_eq!(turn_entitlement(&map, &state, PlayerId(1)), 3);
    }
}
