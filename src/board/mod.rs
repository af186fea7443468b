//! Board representation and game-state types.
//!
//! Contains the core data structures for the territory graph, cards,
//! players, and the overall game state.

pub mod card;
pub mod map;
pub mod player;
pub mod state;

pub use card::{Card, CardDesign, Deck, WILD_COUNT};
pub use map::{ContinentId, ContinentInfo, MapConfig, MapError, MapGraph, TerritoryId, TerritoryInfo};
pub use player::{Player, PlayerId, PlayerStatus};
pub use state::{ConquestMarker, DiplomacyStatus, GameState, Phase, StateError};
