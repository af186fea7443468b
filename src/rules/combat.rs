//! Dice-based combat resolution.
//!
//! Rolls are sorted descending and compared pairwise; each comparison costs
//! the loser one army and ties favor the defender. Conquest is detected when
//! the defending territory empties, and the bounds of the mandatory
//! post-attack move are computed here.

use rand::Rng;

use crate::board::map::TerritoryId;
use crate::board::state::{ConquestMarker, GameState, StateError};

/// Upper bound on attacker dice per battle.
pub const MAX_ATTACK_DICE: u32 = 3;

/// Upper bound on defender dice per battle.
pub const MAX_DEFENSE_DICE: u32 = 2;

/// The outcome of one battle (one dice comparison round).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker_rolls: Vec<u8>,
    pub defender_rolls: Vec<u8>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub conquered: bool,
    /// Mandatory post-attack move bounds, present iff `conquered`.
    pub conquest: Option<ConquestMarker>,
}

/// The defender dice count used when no explicit choice applies: two dice
/// when the territory can afford them, otherwise one.
pub fn auto_defense_dice(defending_armies: u32) -> u32 {
    if defending_armies >= 2 {
        2
    } else {
        1
    }
}

/// Clamps an explicit defender dice choice (the 2-player variant's
/// neutral-defense decision) into the legal range for the territory.
pub fn clamp_defense_dice(choice: u32, defending_armies: u32) -> u32 {
    choice.clamp(1, auto_defense_dice(defending_armies))
}

/// Rolls `count` six-sided dice, sorted descending.
fn roll(count: u32, rng: &mut impl Rng) -> Vec<u8> {
    let mut dice: Vec<u8> = (0..count).map(|_| rng.gen_range(1..=6)).collect();
    dice.sort_unstable_by(|a, b| b.cmp(a));
    dice
}

/// Resolves one battle between adjacent territories and applies the losses.
///
/// `committed` is the number of attacking armies (equal to the attacker dice
/// count, already validated to be 1..=3 and to leave one army behind).
/// `defense_dice` is the defender's dice count, already resolved through
/// [`auto_defense_dice`] or the explicit 2-player decision point.
///
/// On conquest the defending territory is left at zero armies and ownership
/// untouched; the caller transfers ownership and queues the returned
/// [`ConquestMarker`].
pub fn resolve_attack(
    state: &mut GameState,
    from: TerritoryId,
    to: TerritoryId,
    committed: u32,
    defense_dice: u32,
    rng: &mut impl Rng,
) -> Result<AttackOutcome, StateError> {
    let attacker_rolls = roll(committed, rng);
    let defender_rolls = roll(defense_dice, rng);

    let mut attacker_losses = 0u32;
    let mut defender_losses = 0u32;
    let pairs = attacker_rolls.len().min(defender_rolls.len());
    for i in 0..pairs {
        if attacker_rolls[i] > defender_rolls[i] {
            defender_losses += 1;
        } else {
            attacker_losses += 1;
        }
    }

    // A battle can only cost the defender what it has.
    let defender_losses = defender_losses.min(state.armies(to));
    state.remove_armies(from, attacker_losses)?;
    state.remove_armies(to, defender_losses)?;

    let conquered = state.armies(to) == 0;
    let conquest = if conquered {
        let max_armies = state.armies(from).saturating_sub(1);
        let min_armies = committed.min(max_armies).max(1);
        Some(ConquestMarker {
            from,
            to,
            min_armies,
            max_armies,
        })
    } else {
        None
    };

    Ok(AttackOutcome {
        attacker_rolls,
        defender_rolls,
        attacker_losses,
        defender_losses,
        conquered,
        conquest,
    })
}
