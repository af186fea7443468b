//! Decision-source interface.
//!
//! A decision source is anything that can pick a move: a scripted bot, a
//! remote model, an interactive player. The engine only ever hands it
//! read-only snapshots and the current templates, and treats whatever comes
//! back as untrusted JSON. [`RandomSource`] is the built-in implementation
//! used by self-play and tests.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::actions::{Action, ActionTemplate};

/// One chat utterance, global (`to == None`) or private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: String,
    pub to: Option<String>,
    pub text: String,
}

/// A pluggable move chooser. All methods take read-only views; the returned
/// action value is validated by the engine before anything mutates.
pub trait DecisionSource {
    /// Proposes one action matching (ideally) one of the supplied templates.
    fn propose_action(&mut self, snapshot: &Value, templates: &[ActionTemplate]) -> Value;

    /// Composes a private chat message to `recipient`.
    fn private_chat(&mut self, history: &[ChatMessage], recipient: &str) -> String;

    /// The 2-player variant's neutral-defense choice: how many dice the
    /// Neutral territory rolls, 1..=`max_dice`.
    fn choose_defense_dice(&mut self, snapshot: &Value, territory: &str, max_dice: u32) -> u32;
}

/// Uniformly random legal play. Skips chat templates so phases always make
/// progress, and fills every numeric field inside its template bounds.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: SmallRng,
}

impl RandomSource {
    pub fn new(seed: u64) -> RandomSource {
        RandomSource {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn fill(&mut self, template: &ActionTemplate) -> Option<Action> {
        match template {
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
            } => {
                let mut placements: Vec<(String, u32)> = Vec::new();
                for _ in 0..*own_allotment {
                    let territory = own_territories.choose(&mut self.rng)?;
                    match placements.iter_mut().find(|(t, _)| t == territory) {
                        Some((_, count)) => *count += 1,
                        None => placements.push((territory.clone(), 1)),
                    }
                }
                let neutral_army_placement = if *neutral_can_place {
                    neutral_territories
                        .choose(&mut self.rng)
                        .map(|t| (t.clone(), 1))
                } else {
                    None
                };
                Some(Action::Setup2pPlaceArmies {
                    own_army_placements: placements,
                    neutral_army_placement,
                })
            }
            ActionTemplate::Deploy {
                territory,
                max_armies,
            } => Some(Action::Deploy {
                territory: territory.clone(),
                num_armies: self.rng.gen_range(1..=*max_armies),
            }),
            ActionTemplate::TradeCards { card_indices, .. } => Some(Action::TradeCards {
                card_indices: card_indices.clone(),
            }),
            ActionTemplate::Attack {
                from,
                to,
                max_armies_for_attack,
            } => Some(Action::Attack {
                from: from.clone(),
                to: to.clone(),
                num_armies: self.rng.gen_range(1..=*max_armies_for_attack),
            }),
            ActionTemplate::PostAttackFortify {
                min_armies,
                max_armies,
                ..
            } => Some(Action::PostAttackFortify {
                num_armies: self.rng.gen_range(*min_armies..=*max_armies),
            }),
            ActionTemplate::Fortify {
                from,
                to,
                max_armies_to_move,
            } => Some(Action::Fortify {
                from: from.clone(),
                to: to.clone(),
                num_armies: self.rng.gen_range(1..=*max_armies_to_move),
            }),
            ActionTemplate::EndReinforcePhase => Some(Action::EndReinforcePhase),
            ActionTemplate::EndAttackPhase => Some(Action::EndAttackPhase),
            ActionTemplate::EndTurn => Some(Action::EndTurn),
            ActionTemplate::GlobalChat | ActionTemplate::PrivateChat { .. } => None,
        }
    }
}

impl DecisionSource for RandomSource {
    fn propose_action(&mut self, _snapshot: &Value, templates: &[ActionTemplate]) -> Value {
        let playable: Vec<&ActionTemplate> = templates
            .iter()
            .filter(|t| {
                !matches!(
                    t,
                    ActionTemplate::GlobalChat | ActionTemplate::PrivateChat { .. }
                )
            })
            .collect();
        let action = playable
            .choose(&mut self.rng)
            .and_then(|t| self.fill(t));
        match action {
            Some(action) => serde_json::to_value(&action).unwrap_or(Value::Null),
            None => Value::Null,
        }
    }

    fn private_chat(&mut self, _history: &[ChatMessage], recipient: &str) -> String {
        format!("({} keeps its own counsel)", recipient)
    }

    fn choose_defense_dice(&mut self, _snapshot: &Value, _territory: &str, max_dice: u32) -> u32 {
        self.rng.gen_range(1..=max_dice.max(1))
    }
}

/// Replays a fixed queue of raw proposals, then falls silent with nulls.
/// Used to exercise the engine's rejection and fallback paths.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: std::collections::VecDeque<Value>,
}

impl ScriptedSource {
    pub fn new(proposals: Vec<Value>) -> ScriptedSource {
        ScriptedSource {
            queue: proposals.into(),
        }
    }
}

impl DecisionSource for ScriptedSource {
    fn propose_action(&mut self, _snapshot: &Value, _templates: &[ActionTemplate]) -> Value {
        self.queue.pop_front().unwrap_or(Value::Null)
    }

    fn private_chat(&mut self, _history: &[ChatMessage], _recipient: &str) -> String {
        String::new()
    }

    fn choose_defense_dice(&mut self, _snapshot: &Value, _territory: &str, max_dice: u32) -> u32 {
        max_dice
    }
}
