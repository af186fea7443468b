//! Mutable game state.
//!
//! Holds the complete snapshot of a game at a point in time: ownership and
//! army counts per territory, player hands, the deck, phase and turn order,
//! reinforcement pools, and the pending-conquest marker. The state is owned
//! exclusively by the turn controller and mutated only through validated
//! actions; helpers here fail with [`StateError`] when a mutation would
//! corrupt the model, which callers treat as fatal for the game instance.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use super::card::Deck;
use super::map::{MapGraph, TerritoryId};
use super::player::{Player, PlayerId, PlayerStatus};
use crate::event::{EventSink, GameEvent};

/// The phase of the setup or turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    #[serde(rename = "SETUP_CLAIM_TERRITORIES")]
    SetupClaimTerritories,
    #[serde(rename = "SETUP_PLACE_ARMIES")]
    SetupPlaceArmies,
    #[serde(rename = "SETUP_2P_DEAL_CARDS")]
    Setup2pDealCards,
    #[serde(rename = "SETUP_2P_PLACE_REMAINING")]
    Setup2pPlaceRemaining,
    #[serde(rename = "REINFORCE")]
    Reinforce,
    #[serde(rename = "ATTACK")]
    Attack,
    #[serde(rename = "FORTIFY")]
    Fortify,
    #[serde(rename = "GAME_OVER")]
    GameOver,
}

impl Phase {
    pub const fn is_setup(self) -> bool {
        matches!(
            self,
            Phase::SetupClaimTerritories
                | Phase::SetupPlaceArmies
                | Phase::Setup2pDealCards
                | Phase::Setup2pPlaceRemaining
        )
    }
}

/// Diplomatic standing between a pair of players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiplomacyStatus {
    Neutral,
    Alliance,
    War,
}

/// A conquest awaiting its mandatory post-attack fortification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConquestMarker {
    pub from: TerritoryId,
    pub to: TerritoryId,
    pub min_armies: u32,
    pub max_armies: u32,
}

/// Internal invariant violations. These indicate model corruption and abort
/// the affected game instance rather than being retried.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("army count underflow on territory #{0}")]
    ArmyUnderflow(u16),

    #[error("territory #{0} has no owner")]
    UnownedTerritory(u16),

    #[error("player #{0} does not exist")]
    NoSuchPlayer(u8),

    #[error("card index {index} outside hand of size {hand}")]
    BadCardIndex { index: usize, hand: usize },

    #[error("traded cards do not form a valid set")]
    InvalidTradeSet,

    #[error("setup pool underflow for player #{0}")]
    SetupPoolUnderflow(u8),

    #[error("reinforcement pool underflow for player #{0}")]
    PoolUnderflow(u8),

    #[error("no active players remain")]
    NoActivePlayers,
}

/// Complete game state. Territory-indexed data lives in flat vectors keyed
/// by `TerritoryId` so lookups are O(1) without hashing.
#[derive(Debug, Clone)]
pub struct GameState {
    pub turn: u32,
    pub phase: Phase,
    pub active_player: PlayerId,
    pub players: Vec<Player>,
    /// Owner per territory; None only before/during the claim phase.
    pub owner: Vec<Option<PlayerId>>,
    /// Army count per territory.
    pub armies: Vec<u32>,
    /// Remaining setup armies per player.
    pub setup_pool: Vec<u32>,
    /// Reinforcement armies available to deploy, per player.
    pub reinforcement_pool: Vec<u32>,
    pub deck: Deck,
    /// Conquest awaiting its mandatory post-attack move.
    pub conquest: Option<ConquestMarker>,
    /// Player forced into repeated trades after an elimination windfall.
    pub pending_elimination_trade: Option<PlayerId>,
    /// Global count of card sets traded, across all players.
    pub traded_sets: u32,
    pub fortified_this_turn: bool,
    pub conquered_this_turn: bool,
    pub two_player: bool,
    /// Rotation of players still placing during setup phases.
    pub setup_order: Vec<PlayerId>,
    pub setup_index: usize,
    pub diplomacy: BTreeMap<(PlayerId, PlayerId), DiplomacyStatus>,
    pub history: Vec<GameEvent>,
}

impl GameState {
    /// Creates a pre-setup state: all territories unowned, all pools empty.
    pub fn new(map: &MapGraph, players: Vec<Player>, deck: Deck, two_player: bool) -> GameState {
        let n = map.territory_count();
        let player_count = players.len();
        GameState {
            turn: 1,
            phase: Phase::SetupClaimTerritories,
            active_player: PlayerId(0),
            players,
            owner: vec![None; n],
            armies: vec![0; n],
            setup_pool: vec![0; player_count],
            reinforcement_pool: vec![0; player_count],
            deck,
            conquest: None,
            pending_elimination_trade: None,
            traded_sets: 0,
            fortified_this_turn: false,
            conquered_this_turn: false,
            two_player,
            setup_order: Vec::new(),
            setup_index: 0,
            diplomacy: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.0 as usize]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.0 as usize]
    }

    /// Looks up a player id by name.
    pub fn player_by_name(&self, name: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .map(|i| PlayerId(i as u8))
    }

    pub fn owner(&self, t: TerritoryId) -> Option<PlayerId> {
        self.owner[t.0 as usize]
    }

    pub fn armies(&self, t: TerritoryId) -> u32 {
        self.armies[t.0 as usize]
    }

    pub fn set_owner(&mut self, t: TerritoryId, player: PlayerId) {
        self.owner[t.0 as usize] = Some(player);
    }

    pub fn add_armies(&mut self, t: TerritoryId, n: u32) {
        self.armies[t.0 as usize] += n;
    }

    /// Removes armies, failing on underflow rather than wrapping.
    pub fn remove_armies(&mut self, t: TerritoryId, n: u32) -> Result<(), StateError> {
        let slot = &mut self.armies[t.0 as usize];
        *slot = slot.checked_sub(n).ok_or(StateError::ArmyUnderflow(t.0))?;
        Ok(())
    }

    /// Number of territories owned by a player.
    pub fn owned_count(&self, player: PlayerId) -> usize {
        self.owner.iter().filter(|o| **o == Some(player)).count()
    }

    /// Territory ids owned by a player, in id order.
    pub fn territories_of(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.owner
            .iter()
            .enumerate()
            .filter(|(_, o)| **o == Some(player))
            .map(|(i, _)| TerritoryId(i as u16))
            .collect()
    }

    /// Territory ids with no owner yet, in id order.
    pub fn unclaimed(&self) -> Vec<TerritoryId> {
        self.owner
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_none())
            .map(|(i, _)| TerritoryId(i as u16))
            .collect()
    }

    /// Ids of all players, in seat order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.players.len() as u8).map(PlayerId)
    }

    /// Active, non-neutral players in seat order.
    pub fn active_humans(&self) -> Vec<PlayerId> {
        self.player_ids()
            .filter(|id| {
                let p = self.player(*id);
                p.is_active() && !p.neutral
            })
            .collect()
    }

    /// The next active human seat after `current`, wrapping around.
    /// Eliminated players are skipped permanently.
    pub fn next_active_human(&self, current: PlayerId) -> Result<PlayerId, StateError> {
        let n = self.players.len() as u8;
        if n == 0 {
            return Err(StateError::NoActivePlayers);
        }
        let mut id = current;
        for _ in 0..n {
            id = PlayerId((id.0 + 1) % n);
            let p = self.player(id);
            if p.is_active() && !p.neutral {
                return Ok(id);
            }
        }
        Err(StateError::NoActivePlayers)
    }

    /// The player currently expected to act: the setup rotation during setup
    /// phases, the active player otherwise.
    pub fn acting_player(&self) -> PlayerId {
        if self.phase.is_setup() && !self.setup_order.is_empty() {
            self.setup_order[self.setup_index % self.setup_order.len()]
        } else {
            self.active_player
        }
    }

    /// Marks a player eliminated. Callers are responsible for the hand
    /// transfer that accompanies elimination-by-conquest.
    pub fn eliminate(&mut self, player: PlayerId) {
        self.player_mut(player).status = PlayerStatus::Eliminated;
    }

    fn pair(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn diplomacy_between(&self, a: PlayerId, b: PlayerId) -> DiplomacyStatus {
        self.diplomacy
            .get(&Self::pair(a, b))
            .copied()
            .unwrap_or(DiplomacyStatus::Neutral)
    }

    pub fn set_diplomacy(&mut self, a: PlayerId, b: PlayerId, status: DiplomacyStatus) {
        self.diplomacy.insert(Self::pair(a, b), status);
    }

    /// Appends an event to the game history and offers it to the sink.
    pub fn record(&mut self, event: GameEvent, sink: &mut dyn EventSink) {
        sink.emit(&event);
        self.history.push(event);
    }

    /// Read-only JSON snapshot handed to decision sources.
    pub fn snapshot(&self, map: &MapGraph) -> Value {
        let territories: serde_json::Map<String, Value> = map
            .territory_ids()
            .map(|tid| {
                let info = map.territory(tid);
                let owner = self.owner(tid).map(|p| self.player(p).name.clone());
                let adjacent: Vec<&str> = info.adjacent.iter().map(|a| map.name(*a)).collect();
                (
                    info.name.clone(),
                    json!({
                        "continent": map.continent(info.continent).name,
                        "owner": owner,
                        "armies": self.armies(tid),
                        "adjacent_to": adjacent,
                    }),
                )
            })
            .collect();

        let continents: serde_json::Map<String, Value> = map
            .continents()
            .iter()
            .map(|c| {
                let members: Vec<&str> = c.members.iter().map(|m| map.name(*m)).collect();
                (
                    c.name.clone(),
                    json!({ "bonus_armies": c.bonus_armies, "territories": members }),
                )
            })
            .collect();

        let players: Vec<Value> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let id = PlayerId(i as u8);
                let hand: Vec<Value> = p
                    .hand
                    .iter()
                    .map(|c| {
                        json!({
                            "design": c.design,
                            "territory": c.territory.map(|t| map.name(t)),
                        })
                    })
                    .collect();
                json!({
                    "name": p.name,
                    "color": p.color,
                    "status": p.status,
                    "neutral": p.neutral,
                    "territory_count": self.owned_count(id),
                    "armies_to_deploy": self.reinforcement_pool[i],
                    "hand": hand,
                })
            })
            .collect();

        json!({
            "turn": self.turn,
            "phase": self.phase,
            "current_player": self.player(self.acting_player()).name,
            "territories": territories,
            "continents": continents,
            "players": players,
            "deck_size": self.deck.draw_len(),
        })
    }
}
