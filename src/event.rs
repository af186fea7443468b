//! Structured engine events.
//!
//! The engine appends every event to the game's own history and also offers
//! it to an [`EventSink`] for rendering or logging layers. Sinks are fire-and-
//! forget: the engine never depends on their success.

use serde::Serialize;

use crate::board::state::DiplomacyStatus;

/// An event emitted by the engine as game state changes.
///
/// Serialized with a `type` tag in the wire's SCREAMING_SNAKE_CASE, matching
/// the action format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    AttackResult {
        turn: u32,
        attacker: String,
        defender: String,
        from: String,
        to: String,
        attacker_rolls: Vec<u8>,
        defender_rolls: Vec<u8>,
        attacker_losses: u32,
        defender_losses: u32,
        conquered: bool,
        betrayal: bool,
    },
    CardTrade {
        turn: u32,
        player: String,
        set_index: u32,
        bonus_armies: u32,
        /// Territory that received the flat +2 for a matching traded card.
        territory_bonus: Option<String>,
    },
    CardAwarded {
        turn: u32,
        player: String,
    },
    Elimination {
        turn: u32,
        eliminator: String,
        eliminated: String,
        cards_transferred: usize,
    },
    ContinentControlUpdate {
        turn: u32,
        player: String,
        continents: Vec<String>,
        bonus_armies: u32,
    },
    DiplomacyChange {
        turn: u32,
        a: String,
        b: String,
        old: DiplomacyStatus,
        new: DiplomacyStatus,
    },
    GameOver {
        turn: u32,
        winner: Option<String>,
    },
}

/// Consumer of engine events. Implementations must not assume they see a
/// complete game; the engine keeps its own history.
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Collects events into a vector, for tests and tooling.
#[derive(Debug, Default, Clone)]
pub struct VecSink(pub Vec<GameEvent>);

impl EventSink for VecSink {
    fn emit(&mut self, event: &GameEvent) {
        self.0.push(event.clone());
    }
}
