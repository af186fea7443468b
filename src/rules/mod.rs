//! Numeric game rules.
//!
//! Reinforcement math, the card-trade economy, and dice combat. Everything
//! here operates on explicit state references passed in by the turn
//! controller; no module keeps state of its own.

pub mod cards;
pub mod combat;
pub mod reinforce;

pub use cards::{
    is_valid_set, perform_trade, transfer_hand, valid_sets, TradeOutcome,
    ELIMINATION_TRADE_HAND, ELIMINATION_TRADE_TARGET, MANDATORY_TRADE_HAND,
};
pub use combat::{
    auto_defense_dice, clamp_defense_dice, resolve_attack, AttackOutcome, MAX_ATTACK_DICE,
    MAX_DEFENSE_DICE,
};
pub use reinforce::{
    continent_bonus, controlled_continents, territory_bonus, trade_bonus, turn_entitlement,
    OCCUPIED_CARD_BONUS,
};
