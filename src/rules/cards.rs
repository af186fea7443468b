//! Card-set economy.
//!
//! Set validation, enumeration of tradeable sets in a hand, trade
//! application with the escalating bonus schedule, and the hand transfer
//! that accompanies elimination.

use crate::board::card::{Card, CardDesign};
use crate::board::player::PlayerId;
use crate::board::state::{GameState, StateError};

use super::reinforce::{trade_bonus, OCCUPIED_CARD_BONUS};

/// Hand size that forces a trade at the start of a REINFORCE phase.
pub const MANDATORY_TRADE_HAND: usize = 5;

/// Hand size that forces repeated trades after an elimination windfall.
pub const ELIMINATION_TRADE_HAND: usize = 6;

/// Hand size a post-elimination trade sequence must reach before play resumes.
pub const ELIMINATION_TRADE_TARGET: usize = 4;

/// Returns true if three cards form a tradeable set: three identical
/// designs, one of each non-Wild design, or any two cards plus a Wild.
pub fn is_valid_set(cards: [&Card; 3]) -> bool {
    let wilds = cards
        .iter()
        .filter(|c| c.design == CardDesign::Wild)
        .count();
    if wilds > 0 {
        return true;
    }
    let designs = [cards[0].design, cards[1].design, cards[2].design];
    let all_same = designs[0] == designs[1] && designs[1] == designs[2];
    let all_distinct =
        designs[0] != designs[1] && designs[1] != designs[2] && designs[0] != designs[2];
    all_same || all_distinct
}

/// Enumerates every distinct tradeable index triple in a hand, in
/// lexicographic order. Indices within each triple are sorted ascending.
pub fn valid_sets(hand: &[Card]) -> Vec<[usize; 3]> {
    let mut sets = Vec::new();
    for i in 0..hand.len() {
        for j in (i + 1)..hand.len() {
            for k in (j + 1)..hand.len() {
                if is_valid_set([&hand[i], &hand[j], &hand[k]]) {
                    sets.push([i, j, k]);
                }
            }
        }
    }
    sets
}

/// The result of a completed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeOutcome {
    /// 1-based global index of this set among all trades so far.
    pub set_index: u32,
    pub bonus_armies: u32,
    /// Territory that received the flat occupied-card bonus, if any.
    pub territory_bonus: Option<crate::board::map::TerritoryId>,
}

/// Applies a card trade: removes the three cards to the discard pile,
/// advances the global set counter, credits the escalating bonus to the
/// player's reinforcement pool, and places the flat occupied-territory
/// bonus on at most one named territory.
pub fn perform_trade(
    state: &mut GameState,
    player: PlayerId,
    indices: [usize; 3],
) -> Result<TradeOutcome, StateError> {
    let hand_len = state.player(player).hand.len();
    let mut sorted = indices;
    sorted.sort_unstable();
    if sorted[0] == sorted[1] || sorted[1] == sorted[2] {
        return Err(StateError::InvalidTradeSet);
    }
    for &i in &sorted {
        if i >= hand_len {
            return Err(StateError::BadCardIndex {
                index: i,
                hand: hand_len,
            });
        }
    }

    {
        let hand = &state.player(player).hand;
        if !is_valid_set([&hand[sorted[0]], &hand[sorted[1]], &hand[sorted[2]]]) {
            return Err(StateError::InvalidTradeSet);
        }
    }

    // Remove highest index first so the remaining indices stay valid.
    let mut traded = Vec::with_capacity(3);
    for &i in sorted.iter().rev() {
        traded.push(state.player_mut(player).hand.remove(i));
    }
    traded.reverse();

    // At most one occupied-card bonus per trade, on the first match.
    let territory_bonus = traded
        .iter()
        .filter_map(|c| c.territory)
        .find(|t| state.owner(*t) == Some(player));
    if let Some(t) = territory_bonus {
        state.add_armies(t, OCCUPIED_CARD_BONUS);
    }

    for card in traded {
        state.deck.discard(card);
    }

    state.traded_sets += 1;
    let set_index = state.traded_sets;
    let bonus_armies = trade_bonus(set_index);
    state.reinforcement_pool[player.0 as usize] += bonus_armies;

    Ok(TradeOutcome {
        set_index,
        bonus_armies,
        territory_bonus,
    })
}

/// Moves the whole hand of `from` into the hand of `to`, preserving order.
/// Returns the number of cards transferred.
pub fn transfer_hand(state: &mut GameState, from: PlayerId, to: PlayerId) -> usize {
    let mut hand = std::mem::take(&mut state.player_mut(from).hand);
    let count = hand.len();
    state.player_mut(to).hand.append(&mut hand);
    count
}
