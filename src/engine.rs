//! Turn orchestration.
//!
//! The [`TurnController`] owns the game state for one game instance. It
//! generates the legal templates for the acting player, checks proposals
//! from the outside world against them, applies validated actions through
//! the rules modules, and advances the phase state machine. Exactly one
//! action is in flight at a time; templates are regenerated after every
//! mutation by virtue of being computed on demand from the state.

use rand::Rng;
use serde_json::Value;
use thiserror::Error;

use crate::actions::{self, Action, ActionReject, ActionTemplate};
use crate::board::card::Deck;
use crate::board::map::{MapGraph, TerritoryId};
use crate::board::player::{Player, PlayerId};
use crate::board::state::{DiplomacyStatus, GameState, Phase, StateError};
use crate::event::{EventSink, GameEvent};
use crate::rules::{cards, combat, reinforce};

/// Armies in the 2-player variant's setup pools, for humans and Neutral alike.
const TWO_PLAYER_POOL: u32 = 40;

/// Cards dealt per seat during the 2-player setup.
const TWO_PLAYER_DEAL: usize = 14;

/// Setup pool for the standard variant, by player count.
fn standard_pool(players: usize) -> u32 {
    match players {
        3 => 35,
        4 => 30,
        5 => 25,
        _ => 20,
    }
}

/// Engine configuration. Retry and turn caps guarantee the engine never
/// stalls on a hostile or broken decision source.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Invalid proposals tolerated per solicitation before the engine
    /// applies [`TurnController::fallback_action`].
    pub max_invalid_proposals: u32,
    /// Round cap after which the game ends with no winner.
    pub max_turns: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_invalid_proposals: 5,
            max_turns: 200,
        }
    }
}

/// Errors creating a game.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("a game needs 2..=6 players, got {0}")]
    PlayerCount(usize),

    #[error("player name '{0}' is duplicated")]
    DuplicateName(String),

    #[error("'Neutral' is a reserved seat name")]
    ReservedName,

    #[error("the 2-player variant needs a {expected}-territory map, got {found}")]
    TwoPlayerMapSize { expected: usize, found: usize },
}

/// Fatal errors while applying a validated action. These indicate engine or
/// model corruption; the affected game instance must be aborted.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game instance is over")]
    GameOver,

    #[error("unknown territory '{0}' in a validated action")]
    UnknownTerritory(String),

    #[error("unknown player '{0}' in a validated action")]
    UnknownPlayer(String),

    #[error("no post-attack fortification is pending")]
    NoPendingConquest,

    #[error(transparent)]
    State(#[from] StateError),
}

/// What an applied action did, beyond mutating state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Continue,
    /// The game ended; `None` means a draw against the turn cap.
    GameOver { winner: Option<PlayerId> },
    /// Chat to broadcast. Chat never mutates game state.
    GlobalChat { message: String },
    /// Chat to route to one player.
    PrivateChat { target: PlayerId, message: String },
}

/// Owns and advances a single game instance.
pub struct TurnController<'m> {
    map: &'m MapGraph,
    state: GameState,
    config: EngineConfig,
}

impl<'m> TurnController<'m> {
    /// Creates a game from (name, color) seats in turn order.
    ///
    /// Two seats select the 2-player variant: a Neutral seat is added, each
    /// pool holds 40 armies, and the territory deal runs immediately, so the
    /// returned controller is already in SETUP_2P_PLACE_REMAINING. With 3-6
    /// seats the standard claim/place setup applies.
    pub fn new(
        map: &'m MapGraph,
        seats: &[(&str, &str)],
        config: EngineConfig,
        rng: &mut impl Rng,
    ) -> Result<TurnController<'m>, SetupError> {
        if !(2..=6).contains(&seats.len()) {
            return Err(SetupError::PlayerCount(seats.len()));
        }
        for (i, (name, _)) in seats.iter().enumerate() {
            if *name == "Neutral" {
                return Err(SetupError::ReservedName);
            }
            if seats[..i].iter().any(|(other, _)| other == name) {
                return Err(SetupError::DuplicateName(name.to_string()));
            }
        }

        let two_player = seats.len() == 2;
        let mut players: Vec<Player> =
            seats.iter().map(|(n, c)| Player::new(n, c)).collect();

        let mut controller = if two_player {
            if map.territory_count() != TWO_PLAYER_DEAL * 3 {
                return Err(SetupError::TwoPlayerMapSize {
                    expected: TWO_PLAYER_DEAL * 3,
                    found: map.territory_count(),
                });
            }
            players.push(Player::neutral(neutral_color(seats)));
            let deck = Deck::territory_only(map, rng);
            let mut state = GameState::new(map, players, deck, true);
            state.phase = Phase::Setup2pDealCards;
            state.setup_pool = vec![TWO_PLAYER_POOL; 3];
            state.setup_order = vec![PlayerId(0), PlayerId(1)];
            TurnController {
                map,
                state,
                config,
            }
        } else {
            let pool = standard_pool(seats.len());
            let deck = Deck::standard(map, rng);
            let mut state = GameState::new(map, players, deck, false);
            state.setup_pool = vec![pool; seats.len()];
            state.setup_order = (0..seats.len() as u8).map(PlayerId).collect();
            TurnController {
                map,
                state,
                config,
            }
        };

        if two_player {
            controller.deal_two_player(rng);
        }
        Ok(controller)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn map(&self) -> &MapGraph {
        self.map
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Read-only JSON snapshot for decision sources.
    pub fn snapshot(&self) -> Value {
        self.state.snapshot(self.map)
    }

    /// The legal templates for the acting player, freshly generated.
    pub fn legal_templates(&self) -> Vec<ActionTemplate> {
        actions::legal_templates(self.map, &self.state)
    }

    /// Parses and validates an untrusted proposal against the current
    /// templates. Never mutates state.
    pub fn check(&self, proposal: &Value) -> Result<Action, ActionReject> {
        let action = actions::parse_action(proposal)?;
        actions::validate(&action, &self.legal_templates())?;
        Ok(action)
    }

    /// The 2-player variant's neutral-defense decision point.
    ///
    /// When the given (validated) attack targets a Neutral territory,
    /// returns the human opponent who chooses the defense dice, the
    /// territory, and the highest dice count it supports. The engine never
    /// makes this choice itself.
    pub fn defense_choice(&self, action: &Action) -> Option<(PlayerId, TerritoryId, u32)> {
        if !self.state.two_player {
            return None;
        }
        let Action::Attack { to, .. } = action else {
            return None;
        };
        let to_id = self.map.territory_by_name(to)?;
        let owner = self.state.owner(to_id)?;
        if !self.state.player(owner).neutral {
            return None;
        }
        let chooser = self
            .state
            .active_humans()
            .into_iter()
            .find(|id| *id != self.state.active_player)?;
        Some((
            chooser,
            to_id,
            combat::auto_defense_dice(self.state.armies(to_id)),
        ))
    }

    /// Applies a validated action.
    ///
    /// `defense_dice` carries the answer from [`defense_choice`] when one
    /// applies; it is clamped into the territory's legal range.
    ///
    /// [`defense_choice`]: TurnController::defense_choice
    pub fn apply(
        &mut self,
        action: &Action,
        defense_dice: Option<u32>,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<ApplyOutcome, EngineError> {
        if self.state.phase == Phase::GameOver {
            return Err(EngineError::GameOver);
        }
        match action {
            Action::SetupClaim { territory } => self.apply_setup_claim(territory),
            Action::SetupPlaceArmy { territory } => self.apply_setup_place(territory, sink),
            Action::Setup2pPlaceArmies {
                own_army_placements,
                neutral_army_placement,
            } => self.apply_setup_2p(
                own_army_placements,
                neutral_army_placement.as_ref(),
                rng,
                sink,
            ),
            Action::Deploy {
                territory,
                num_armies,
            } => self.apply_deploy(territory, *num_armies),
            Action::TradeCards { card_indices } => self.apply_trade(card_indices, sink),
            Action::Attack {
                from,
                to,
                num_armies,
            } => self.apply_attack(from, to, *num_armies, defense_dice, rng, sink),
            Action::PostAttackFortify { num_armies } => self.apply_post_attack(*num_armies),
            Action::Fortify {
                from,
                to,
                num_armies,
            } => self.apply_fortify(from, to, *num_armies),
            Action::EndReinforcePhase => {
                self.state.phase = Phase::Attack;
                Ok(ApplyOutcome::Continue)
            }
            Action::EndAttackPhase => self.apply_end_attack(rng, sink),
            Action::EndTurn => self.apply_end_turn(sink),
            Action::GlobalChat { message } => Ok(ApplyOutcome::GlobalChat {
                message: message.clone(),
            }),
            Action::PrivateChat { target, message } => {
                let target = self
                    .state
                    .player_by_name(target)
                    .ok_or_else(|| EngineError::UnknownPlayer(target.clone()))?;
                Ok(ApplyOutcome::PrivateChat {
                    target,
                    message: message.clone(),
                })
            }
        }
    }

    /// The engine-chosen action applied after the invalid-proposal budget is
    /// exhausted: deterministic, always legal, and biased towards finishing
    /// the phase so a hostile source can only forfeit its own options.
    pub fn fallback_action(&self) -> Option<Action> {
        let templates = self.legal_templates();
        if templates.is_empty() {
            return None;
        }

        for t in &templates {
            if let ActionTemplate::PostAttackFortify { min_armies, .. } = t {
                return Some(Action::PostAttackFortify {
                    num_armies: *min_armies,
                });
            }
        }
        for t in &templates {
            if let ActionTemplate::TradeCards {
                card_indices,
                mandatory: true,
                ..
            } = t
            {
                return Some(Action::TradeCards {
                    card_indices: card_indices.clone(),
                });
            }
        }
        for t in &templates {
            match t {
                ActionTemplate::EndReinforcePhase => return Some(Action::EndReinforcePhase),
                ActionTemplate::EndAttackPhase => return Some(Action::EndAttackPhase),
                ActionTemplate::EndTurn => return Some(Action::EndTurn),
                _ => {}
            }
        }

        // Remaining pool armies drip out round-robin over the deploy
        // templates, one per fallback.
        let deploys: Vec<&ActionTemplate> = templates
            .iter()
            .filter(|t| matches!(t, ActionTemplate::Deploy { .. }))
            .collect();
        if !deploys.is_empty() {
            let pool =
                self.state.reinforcement_pool[self.state.acting_player().0 as usize] as usize;
            if let ActionTemplate::Deploy { territory, .. } = deploys[pool % deploys.len()] {
                return Some(Action::Deploy {
                    territory: territory.clone(),
                    num_armies: 1,
                });
            }
        }

        match &templates[0] {
            ActionTemplate::SetupClaim { territory } => Some(Action::SetupClaim {
                territory: territory.clone(),
            }),
            ActionTemplate::SetupPlaceArmy { territory } => Some(Action::SetupPlaceArmy {
                territory: territory.clone(),
            }),
            ActionTemplate::Setup2pPlaceArmies {
                own_allotment,
                own_territories,
                neutral_can_place,
                neutral_territories,
            } => Some(Action::Setup2pPlaceArmies {
                own_army_placements: vec![(own_territories.first()?.clone(), *own_allotment)],
                neutral_army_placement: if *neutral_can_place {
                    neutral_territories.first().map(|t| (t.clone(), 1))
                } else {
                    None
                },
            }),
            _ => None,
        }
    }

    /// Adjusts the diplomacy ledger from the orchestration layer (the engine
    /// itself only ever downgrades an alliance on betrayal).
    pub fn set_diplomacy(
        &mut self,
        a: PlayerId,
        b: PlayerId,
        status: DiplomacyStatus,
        sink: &mut dyn EventSink,
    ) {
        let old = self.state.diplomacy_between(a, b);
        if old == status {
            return;
        }
        self.state.set_diplomacy(a, b, status);
        let event = GameEvent::DiplomacyChange {
            turn: self.state.turn,
            a: self.state.player(a).name.clone(),
            b: self.state.player(b).name.clone(),
            old,
            new: status,
        };
        self.state.record(event, sink);
    }

    fn territory(&self, name: &str) -> Result<TerritoryId, EngineError> {
        self.map
            .territory_by_name(name)
            .ok_or_else(|| EngineError::UnknownTerritory(name.to_string()))
    }

    /// Deals the whole territory deck around the three 2-player seats, one
    /// army per dealt territory, then opens the placement phase.
    fn deal_two_player(&mut self, rng: &mut impl Rng) {
        let seats = [PlayerId(0), PlayerId(1), PlayerId(2)];
        for _ in 0..TWO_PLAYER_DEAL {
            for seat in seats {
                if let Some(card) = self.state.deck.draw(rng) {
                    if let Some(t) = card.territory {
                        self.state.set_owner(t, seat);
                        self.state.add_armies(t, 1);
                        self.state.setup_pool[seat.0 as usize] -= 1;
                    }
                }
            }
        }
        self.state.phase = Phase::Setup2pPlaceRemaining;
        self.state.setup_index = 0;
    }

    fn apply_setup_claim(&mut self, territory: &str) -> Result<ApplyOutcome, EngineError> {
        let t = self.territory(territory)?;
        let actor = self.state.acting_player();
        self.state.set_owner(t, actor);
        self.state.add_armies(t, 1);
        self.decrement_setup_pool(actor, 1)?;

        if self.state.unclaimed().is_empty() {
            self.state.phase = Phase::SetupPlaceArmies;
            self.state.setup_index = 0;
        } else {
            self.advance_setup_rotation();
        }
        Ok(ApplyOutcome::Continue)
    }

    fn apply_setup_place(
        &mut self,
        territory: &str,
        sink: &mut dyn EventSink,
    ) -> Result<ApplyOutcome, EngineError> {
        let t = self.territory(territory)?;
        let actor = self.state.acting_player();
        self.state.add_armies(t, 1);
        self.decrement_setup_pool(actor, 1)?;

        if self.state.setup_pool.iter().all(|p| *p == 0) {
            self.begin_play(sink);
        } else {
            self.advance_setup_rotation();
        }
        Ok(ApplyOutcome::Continue)
    }

    fn apply_setup_2p(
        &mut self,
        own: &[(String, u32)],
        neutral: Option<&(String, u32)>,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<ApplyOutcome, EngineError> {
        let actor = self.state.acting_player();
        for (name, count) in own {
            let t = self.territory(name)?;
            self.state.add_armies(t, *count);
            self.decrement_setup_pool(actor, *count)?;
        }

        if let Some((name, count)) = neutral {
            let neutral_seat = PlayerId(2);
            if self.state.setup_pool[neutral_seat.0 as usize] > 0 {
                let t = self.territory(name)?;
                self.state.add_armies(t, *count);
                self.decrement_setup_pool(neutral_seat, *count)?;
            }
        }

        let humans_done = self
            .state
            .setup_order
            .iter()
            .all(|p| self.state.setup_pool[p.0 as usize] == 0);
        if humans_done {
            self.state.deck.add_wilds(rng);
            self.begin_play(sink);
        } else {
            self.advance_setup_rotation();
        }
        Ok(ApplyOutcome::Continue)
    }

    fn apply_deploy(&mut self, territory: &str, n: u32) -> Result<ApplyOutcome, EngineError> {
        let t = self.territory(territory)?;
        let actor = self.state.active_player;
        let pool = &mut self.state.reinforcement_pool[actor.0 as usize];
        *pool = pool
            .checked_sub(n)
            .ok_or(StateError::PoolUnderflow(actor.0))?;
        self.state.add_armies(t, n);
        Ok(ApplyOutcome::Continue)
    }

    fn apply_trade(
        &mut self,
        card_indices: &[usize],
        sink: &mut dyn EventSink,
    ) -> Result<ApplyOutcome, EngineError> {
        let actor = self.state.active_player;
        let indices: [usize; 3] = card_indices
            .try_into()
            .map_err(|_| StateError::InvalidTradeSet)?;
        let outcome = cards::perform_trade(&mut self.state, actor, indices)?;

        let event = GameEvent::CardTrade {
            turn: self.state.turn,
            player: self.state.player(actor).name.clone(),
            set_index: outcome.set_index,
            bonus_armies: outcome.bonus_armies,
            territory_bonus: outcome.territory_bonus.map(|t| self.map.name(t).to_string()),
        };
        self.state.record(event, sink);

        if self.state.pending_elimination_trade == Some(actor)
            && self.state.player(actor).hand.len() <= cards::ELIMINATION_TRADE_TARGET
        {
            self.state.pending_elimination_trade = None;
        }
        Ok(ApplyOutcome::Continue)
    }

    fn apply_attack(
        &mut self,
        from: &str,
        to: &str,
        committed: u32,
        defense_dice: Option<u32>,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<ApplyOutcome, EngineError> {
        let from_id = self.territory(from)?;
        let to_id = self.territory(to)?;
        let attacker = self.state.active_player;
        let defender = self
            .state
            .owner(to_id)
            .ok_or(StateError::UnownedTerritory(to_id.0))?;

        // Attacking an ally is a betrayal: the alliance collapses to war
        // before the dice are cast.
        let mut betrayal = false;
        if !self.state.player(defender).neutral
            && self.state.diplomacy_between(attacker, defender) == DiplomacyStatus::Alliance
        {
            betrayal = true;
            self.state
                .set_diplomacy(attacker, defender, DiplomacyStatus::War);
            let event = GameEvent::DiplomacyChange {
                turn: self.state.turn,
                a: self.state.player(attacker).name.clone(),
                b: self.state.player(defender).name.clone(),
                old: DiplomacyStatus::Alliance,
                new: DiplomacyStatus::War,
            };
            self.state.record(event, sink);
        }

        let dice = match defense_dice {
            Some(choice) => combat::clamp_defense_dice(choice, self.state.armies(to_id)),
            None => combat::auto_defense_dice(self.state.armies(to_id)),
        };
        let outcome = combat::resolve_attack(&mut self.state, from_id, to_id, committed, dice, rng)?;

        let event = GameEvent::AttackResult {
            turn: self.state.turn,
            attacker: self.state.player(attacker).name.clone(),
            defender: self.state.player(defender).name.clone(),
            from: from.to_string(),
            to: to.to_string(),
            attacker_rolls: outcome.attacker_rolls.clone(),
            defender_rolls: outcome.defender_rolls.clone(),
            attacker_losses: outcome.attacker_losses,
            defender_losses: outcome.defender_losses,
            conquered: outcome.conquered,
            betrayal,
        };
        self.state.record(event, sink);

        if !outcome.conquered {
            return Ok(ApplyOutcome::Continue);
        }

        self.state.set_owner(to_id, attacker);
        self.state.conquest = outcome.conquest;
        self.state.conquered_this_turn = true;

        if !self.state.player(defender).neutral && self.state.owned_count(defender) == 0 {
            self.state.eliminate(defender);
            let transferred = cards::transfer_hand(&mut self.state, defender, attacker);
            let event = GameEvent::Elimination {
                turn: self.state.turn,
                eliminator: self.state.player(attacker).name.clone(),
                eliminated: self.state.player(defender).name.clone(),
                cards_transferred: transferred,
            };
            self.state.record(event, sink);
            if self.state.player(attacker).hand.len() >= cards::ELIMINATION_TRADE_HAND {
                self.state.pending_elimination_trade = Some(attacker);
            }
        }

        if let Some(winner) = self.winner() {
            return Ok(self.finish(Some(winner), sink));
        }
        Ok(ApplyOutcome::Continue)
    }

    fn apply_post_attack(&mut self, n: u32) -> Result<ApplyOutcome, EngineError> {
        let marker = self.state.conquest.ok_or(EngineError::NoPendingConquest)?;
        self.state.remove_armies(marker.from, n)?;
        self.state.add_armies(marker.to, n);
        self.state.conquest = None;
        Ok(ApplyOutcome::Continue)
    }

    fn apply_fortify(&mut self, from: &str, to: &str, n: u32) -> Result<ApplyOutcome, EngineError> {
        let from_id = self.territory(from)?;
        let to_id = self.territory(to)?;
        self.state.remove_armies(from_id, n)?;
        self.state.add_armies(to_id, n);
        self.state.fortified_this_turn = true;
        Ok(ApplyOutcome::Continue)
    }

    fn apply_end_attack(
        &mut self,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<ApplyOutcome, EngineError> {
        // One card per attack phase with at least one conquest, however many
        // territories fell.
        if self.state.conquered_this_turn {
            if let Some(card) = self.state.deck.draw(rng) {
                let actor = self.state.active_player;
                self.state.player_mut(actor).hand.push(card);
                let event = GameEvent::CardAwarded {
                    turn: self.state.turn,
                    player: self.state.player(actor).name.clone(),
                };
                self.state.record(event, sink);
            }
        }
        self.state.phase = Phase::Fortify;
        Ok(ApplyOutcome::Continue)
    }

    fn apply_end_turn(&mut self, sink: &mut dyn EventSink) -> Result<ApplyOutcome, EngineError> {
        let current = self.state.active_player;
        let next = self.state.next_active_human(current)?;
        if next.0 <= current.0 {
            self.state.turn += 1;
            if self.state.turn > self.config.max_turns {
                return Ok(self.finish(None, sink));
            }
        }
        self.state.active_player = next;
        self.state.phase = Phase::Reinforce;
        self.start_turn(sink);
        Ok(ApplyOutcome::Continue)
    }

    /// Opens regular play once every setup pool is drained.
    fn begin_play(&mut self, sink: &mut dyn EventSink) {
        self.state.phase = Phase::Reinforce;
        self.state.active_player = PlayerId(0);
        self.start_turn(sink);
    }

    /// Start-of-turn bookkeeping: per-turn flags and the reinforcement
    /// entitlement. Trade bonuses already in the pool (post-elimination
    /// trades from a previous attack phase) carry over, so the entitlement
    /// adds rather than overwrites.
    fn start_turn(&mut self, sink: &mut dyn EventSink) {
        self.state.fortified_this_turn = false;
        self.state.conquered_this_turn = false;

        let p = self.state.active_player;
        let entitlement = reinforce::turn_entitlement(self.map, &self.state, p);
        self.state.reinforcement_pool[p.0 as usize] += entitlement;

        let controlled = reinforce::controlled_continents(self.map, &self.state, p);
        if !controlled.is_empty() {
            let bonus: u32 = controlled
                .iter()
                .map(|c| self.map.continent(*c).bonus_armies)
                .sum();
            let event = GameEvent::ContinentControlUpdate {
                turn: self.state.turn,
                player: self.state.player(p).name.clone(),
                continents: controlled
                    .iter()
                    .map(|c| self.map.continent(*c).name.clone())
                    .collect(),
                bonus_armies: bonus,
            };
            self.state.record(event, sink);
        }
    }

    /// Win condition, checked after every ownership change. The standard
    /// game ends when one player owns every territory; the 2-player game
    /// ends when only one human remains, Neutral holdings notwithstanding.
    fn winner(&self) -> Option<PlayerId> {
        if self.state.phase.is_setup() {
            return None;
        }
        if self.state.two_player {
            let humans = self.state.active_humans();
            if humans.len() == 1 {
                return Some(humans[0]);
            }
            return None;
        }
        let first = self.state.owner.first().copied().flatten()?;
        self.state
            .owner
            .iter()
            .all(|o| *o == Some(first))
            .then_some(first)
    }

    fn finish(&mut self, winner: Option<PlayerId>, sink: &mut dyn EventSink) -> ApplyOutcome {
        self.state.phase = Phase::GameOver;
        let event = GameEvent::GameOver {
            turn: self.state.turn,
            winner: winner.map(|w| self.state.player(w).name.clone()),
        };
        self.state.record(event, sink);
        ApplyOutcome::GameOver { winner }
    }

    fn decrement_setup_pool(&mut self, player: PlayerId, n: u32) -> Result<(), EngineError> {
        let pool = &mut self.state.setup_pool[player.0 as usize];
        *pool = pool
            .checked_sub(n)
            .ok_or(StateError::SetupPoolUnderflow(player.0))?;
        Ok(())
    }

    /// Advances the setup rotation, skipping seats whose pool is drained.
    fn advance_setup_rotation(&mut self) {
        let n = self.state.setup_order.len();
        for _ in 0..n {
            self.state.setup_index = (self.state.setup_index + 1) % n;
            let p = self.state.setup_order[self.state.setup_index];
            if self.state.setup_pool[p.0 as usize] > 0 {
                return;
            }
        }
    }
}

/// Picks a Neutral seat color not used by either human seat.
fn neutral_color(seats: &[(&str, &str)]) -> &'static str {
    const CANDIDATES: [&str; 5] = ["Gray", "LightBlue", "Brown", "Pink", "Orange"];
    let used: Vec<String> = seats.iter().map(|(_, c)| c.to_lowercase()).collect();
    CANDIDATES
        .iter()
        .find(|c| !used.contains(&c.to_lowercase()))
        .copied()
        .unwrap_or("Gray")
}
