//! Legal move-shape generation.
//!
//! Enumerates every structurally distinct legal move for the current phase
//! and acting player. Templates are ephemeral: the controller regenerates
//! them after every applied action, and generation is a pure function of the
//! state, so the same state always yields the identical list.

use crate::board::map::MapGraph;
use crate::board::player::PlayerId;
use crate::board::state::{GameState, Phase};
use crate::rules::cards::{valid_sets, ELIMINATION_TRADE_TARGET, MANDATORY_TRADE_HAND};
use crate::rules::combat::MAX_ATTACK_DICE;

use super::ActionTemplate;

/// Enumerates the legal templates for the acting player in the given state.
pub fn legal_templates(map: &MapGraph, state: &GameState) -> Vec<ActionTemplate> {
    if state.phase == Phase::GameOver {
        return Vec::new();
    }
    let actor = state.acting_player();

    // A post-elimination windfall forces repeated trades before anything
    // else, including a pending conquest move.
    if let Some(victor) = state.pending_elimination_trade {
        if victor == actor && state.player(victor).hand.len() > ELIMINATION_TRADE_TARGET {
            let sets = valid_sets(&state.player(victor).hand);
            if !sets.is_empty() {
                return sets
                    .into_iter()
                    .map(|set| ActionTemplate::TradeCards {
                        card_indices: set.to_vec(),
                        mandatory: true,
                        post_elimination: true,
                    })
                    .collect();
            }
        }
    }

    // A queued conquest blocks any further attack until resolved.
    if let Some(marker) = state.conquest {
        return vec![ActionTemplate::PostAttackFortify {
            from: map.name(marker.from).to_string(),
            to: map.name(marker.to).to_string(),
            min_armies: marker.min_armies,
            max_armies: marker.max_armies,
        }];
    }

    match state.phase {
        Phase::SetupClaimTerritories => state
            .unclaimed()
            .into_iter()
            .map(|t| ActionTemplate::SetupClaim {
                territory: map.name(t).to_string(),
            })
            .collect(),

        Phase::SetupPlaceArmies => state
            .territories_of(actor)
            .into_iter()
            .map(|t| ActionTemplate::SetupPlaceArmy {
                territory: map.name(t).to_string(),
            })
            .collect(),

        Phase::Setup2pPlaceRemaining => setup_2p_template(map, state, actor),

        Phase::Reinforce => reinforce_templates(map, state, actor),
        Phase::Attack => attack_templates(map, state, actor),
        Phase::Fortify => fortify_templates(map, state, actor),

        // The 2-player deal is resolved by the engine itself; nothing to ask.
        Phase::Setup2pDealCards | Phase::GameOver => Vec::new(),
    }
}

fn setup_2p_template(map: &MapGraph, state: &GameState, actor: PlayerId) -> Vec<ActionTemplate> {
    let own_remaining = state.setup_pool[actor.0 as usize];
    let neutral = state
        .players
        .iter()
        .position(|p| p.neutral)
        .map(|i| PlayerId(i as u8));
    let (neutral_can_place, neutral_territories) = match neutral {
        Some(n) => (
            state.setup_pool[n.0 as usize] > 0,
            state
                .territories_of(n)
                .into_iter()
                .map(|t| map.name(t).to_string())
                .collect(),
        ),
        None => (false, Vec::new()),
    };
    vec![ActionTemplate::Setup2pPlaceArmies {
        own_allotment: own_remaining.min(2),
        own_territories: state
            .territories_of(actor)
            .into_iter()
            .map(|t| map.name(t).to_string())
            .collect(),
        neutral_can_place,
        neutral_territories,
    }]
}

fn reinforce_templates(map: &MapGraph, state: &GameState, actor: PlayerId) -> Vec<ActionTemplate> {
    let hand = &state.player(actor).hand;
    let mandatory = hand.len() >= MANDATORY_TRADE_HAND;
    let trades: Vec<ActionTemplate> = valid_sets(hand)
        .into_iter()
        .map(|set| ActionTemplate::TradeCards {
            card_indices: set.to_vec(),
            mandatory,
            post_elimination: false,
        })
        .collect();

    let mut out = Vec::new();
    if mandatory && !trades.is_empty() {
        out.extend(trades);
    } else {
        let pool = state.reinforcement_pool[actor.0 as usize];
        if pool > 0 {
            for t in state.territories_of(actor) {
                out.push(ActionTemplate::Deploy {
                    territory: map.name(t).to_string(),
                    max_armies: pool,
                });
            }
        }
        out.extend(trades);
        if pool == 0 {
            out.push(ActionTemplate::EndReinforcePhase);
        }
    }
    push_chat(&mut out, state, actor);
    out
}

fn attack_templates(map: &MapGraph, state: &GameState, actor: PlayerId) -> Vec<ActionTemplate> {
    let mut out = Vec::new();
    for from in state.territories_of(actor) {
        let armies = state.armies(from);
        if armies < 2 {
            continue;
        }
        for &to in &map.territory(from).adjacent {
            if state.owner(to).is_some_and(|o| o != actor) {
                out.push(ActionTemplate::Attack {
                    from: map.name(from).to_string(),
                    to: map.name(to).to_string(),
                    max_armies_for_attack: (armies - 1).min(MAX_ATTACK_DICE),
                });
            }
        }
    }
    out.push(ActionTemplate::EndAttackPhase);
    push_chat(&mut out, state, actor);
    out
}

fn fortify_templates(map: &MapGraph, state: &GameState, actor: PlayerId) -> Vec<ActionTemplate> {
    let mut out = Vec::new();
    if !state.fortified_this_turn {
        for from in state.territories_of(actor) {
            let armies = state.armies(from);
            if armies < 2 {
                continue;
            }
            for &to in &map.territory(from).adjacent {
                if state.owner(to) == Some(actor) {
                    out.push(ActionTemplate::Fortify {
                        from: map.name(from).to_string(),
                        to: map.name(to).to_string(),
                        max_armies_to_move: armies - 1,
                    });
                }
            }
        }
    }
    out.push(ActionTemplate::EndTurn);
    push_chat(&mut out, state, actor);
    out
}

/// Chat never consumes the phase action, so it rides along with every play
/// phase's templates.
fn push_chat(out: &mut Vec<ActionTemplate>, state: &GameState, actor: PlayerId) {
    out.push(ActionTemplate::GlobalChat);
    for id in state.active_humans() {
        if id != actor {
            out.push(ActionTemplate::PrivateChat {
                target: state.player(id).name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::card::{Card, CardDesign, Deck};
    use crate::board::map::TerritoryId;
    use crate::board::player::Player;
    use crate::board::state::ConquestMarker;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::map::TINY_MAP;

    fn card(design: CardDesign) -> Card {
        Card {
            design,
            territory: None,
        }
    }

    /// Two players, P1 owning Aria+Boreal, P2 owning Cinder+Dune,
    /// everyone with a few armies, in the given phase.
    fn play_state(phase: Phase) -> (MapGraph, GameState) {
        let map = MapGraph::from_json(TINY_MAP).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let deck = Deck::standard(&map, &mut rng);
        let players = vec![Player::new("P1", "Red"), Player::new("P2", "Blue")];
        let mut state = GameState::new(&map, players, deck, false);
        for (i, owner) in [0u8, 0, 1, 1].iter().enumerate() {
            state.set_owner(TerritoryId(i as u16), PlayerId(*owner));
            state.add_armies(TerritoryId(i as u16), 3);
        }
        state.phase = phase;
        state.active_player = PlayerId(0);
        (map, state)
    }

    #[test]
    fn claim_phase_offers_every_unclaimed_territory() {
        let map = MapGraph::from_json(TINY_MAP).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let deck = Deck::standard(&map, &mut rng);
        let players = vec![Player::new("P1", "Red"), Player::new("P2", "Blue")];
        let mut state = GameState::new(&map, players, deck, false);
        state.setup_order = vec![PlayerId(0), PlayerId(1)];
        state.set_owner(TerritoryId(0), PlayerId(0));
        state.add_armies(TerritoryId(0), 1);

        let templates = legal_templates(&map, &state);
        assert_eq!(templates.len(), 3);
        assert!(templates
            .iter()
            .all(|t| matches!(t, ActionTemplate::SetupClaim { .. })));
    }

    #[test]
    fn deploy_templates_carry_remaining_pool() {
        let (map, mut state) = play_state(Phase::Reinforce);
        state.reinforcement_pool[0] = 4;

        let templates = legal_templates(&map, &state);
        let deploys: Vec<_> = templates
            .iter()
            .filter(|t| matches!(t, ActionTemplate::Deploy { .. }))
            .collect();
        assert_eq!(deploys.len(), 2);
        for t in deploys {
            if let ActionTemplate::Deploy { max_armies, .. } = t {
                assert_eq!(*max_armies, 4);
            }
        }
        // Pool not empty: ending the phase is not yet on offer.
        assert!(!templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::EndReinforcePhase)));
    }

    #[test]
    fn end_reinforce_offered_only_at_empty_pool() {
        let (map, mut state) = play_state(Phase::Reinforce);
        state.reinforcement_pool[0] = 0;
        let templates = legal_templates(&map, &state);
        assert!(templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::EndReinforcePhase)));
        assert!(!templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::Deploy { .. })));
    }

    #[test]
    fn five_card_hand_forces_trades_only() {
        let (map, mut state) = play_state(Phase::Reinforce);
        state.reinforcement_pool[0] = 4;
        state.player_mut(PlayerId(0)).hand = vec![
            card(CardDesign::Infantry),
            card(CardDesign::Infantry),
            card(CardDesign::Infantry),
            card(CardDesign::Cavalry),
            card(CardDesign::Artillery),
        ];

        let templates = legal_templates(&map, &state);
        let trades: Vec<_> = templates
            .iter()
            .filter(|t| matches!(t, ActionTemplate::TradeCards { .. }))
            .collect();
        assert!(!trades.is_empty());
        for t in &trades {
            if let ActionTemplate::TradeCards { mandatory, .. } = t {
                assert!(mandatory);
            }
        }
        assert!(!templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::Deploy { .. })));
    }

    #[test]
    fn optional_trades_ride_along_below_threshold() {
        let (map, mut state) = play_state(Phase::Reinforce);
        state.reinforcement_pool[0] = 1;
        state.player_mut(PlayerId(0)).hand = vec![
            card(CardDesign::Infantry),
            card(CardDesign::Cavalry),
            card(CardDesign::Artillery),
        ];
        let templates = legal_templates(&map, &state);
        let trade = templates
            .iter()
            .find(|t| matches!(t, ActionTemplate::TradeCards { .. }))
            .unwrap();
        if let ActionTemplate::TradeCards { mandatory, .. } = trade {
            assert!(!mandatory);
        }
        assert!(templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::Deploy { .. })));
    }

    #[test]
    fn attack_templates_need_two_armies_and_a_foreign_neighbour() {
        let (map, mut state) = play_state(Phase::Attack);
        // Aria keeps 3 armies; Boreal drops to 1 and cannot attack.
        state.armies[1] = 1;

        let templates = legal_templates(&map, &state);
        let attacks: Vec<_> = templates
            .iter()
            .filter_map(|t| match t {
                ActionTemplate::Attack {
                    from,
                    to,
                    max_armies_for_attack,
                } => Some((from.clone(), to.clone(), *max_armies_for_attack)),
                _ => None,
            })
            .collect();
        // Aria -> Cinder is the only enemy border with enough armies.
        assert_eq!(attacks, vec![("Aria".to_string(), "Cinder".to_string(), 2)]);
        assert!(templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::EndAttackPhase)));
    }

    #[test]
    fn attack_dice_cap_at_three() {
        let (map, mut state) = play_state(Phase::Attack);
        state.armies[0] = 10;
        let templates = legal_templates(&map, &state);
        let max = templates
            .iter()
            .find_map(|t| match t {
                ActionTemplate::Attack {
                    max_armies_for_attack,
                    ..
                } => Some(*max_armies_for_attack),
                _ => None,
            })
            .unwrap();
        assert_eq!(max, 3);
    }

    #[test]
    fn pending_conquest_blocks_everything_else() {
        let (map, mut state) = play_state(Phase::Attack);
        state.conquest = Some(ConquestMarker {
            from: TerritoryId(0),
            to: TerritoryId(2),
            min_armies: 2,
            max_armies: 4,
        });
        let templates = legal_templates(&map, &state);
        assert_eq!(
            templates,
            vec![ActionTemplate::PostAttackFortify {
                from: "Aria".to_string(),
                to: "Cinder".to_string(),
                min_armies: 2,
                max_armies: 4,
            }]
        );
    }

    #[test]
    fn fortify_pairs_are_owned_and_adjacent() {
        let (map, state) = play_state(Phase::Fortify);
        let templates = legal_templates(&map, &state);
        let forts: Vec<_> = templates
            .iter()
            .filter_map(|t| match t {
                ActionTemplate::Fortify { from, to, .. } => Some((from.clone(), to.clone())),
                _ => None,
            })
            .collect();
        // P1 owns Aria(0) and Boreal(1), which border each other.
        assert_eq!(
            forts,
            vec![
                ("Aria".to_string(), "Boreal".to_string()),
                ("Boreal".to_string(), "Aria".to_string()),
            ]
        );
        assert!(templates.iter().any(|t| matches!(t, ActionTemplate::EndTurn)));
    }

    #[test]
    fn fortify_spent_leaves_only_end_turn_and_chat() {
        let (map, mut state) = play_state(Phase::Fortify);
        state.fortified_this_turn = true;
        let templates = legal_templates(&map, &state);
        assert!(!templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::Fortify { .. })));
        assert!(templates.iter().any(|t| matches!(t, ActionTemplate::EndTurn)));
    }

    #[test]
    fn elimination_trades_preempt_conquest_moves() {
        let (map, mut state) = play_state(Phase::Attack);
        state.conquest = Some(ConquestMarker {
            from: TerritoryId(0),
            to: TerritoryId(2),
            min_armies: 1,
            max_armies: 2,
        });
        state.pending_elimination_trade = Some(PlayerId(0));
        state.player_mut(PlayerId(0)).hand = vec![
            card(CardDesign::Infantry),
            card(CardDesign::Infantry),
            card(CardDesign::Infantry),
            card(CardDesign::Cavalry),
            card(CardDesign::Artillery),
            card(CardDesign::Wild),
        ];

        let templates = legal_templates(&map, &state);
        assert!(!templates.is_empty());
        for t in &templates {
            match t {
                ActionTemplate::TradeCards {
                    mandatory,
                    post_elimination,
                    ..
                } => {
                    assert!(mandatory);
                    assert!(post_elimination);
                }
                other => panic!("unexpected template {:?}", other),
            }
        }
    }

    #[test]
    fn chat_targets_every_other_active_human() {
        let (map, state) = play_state(Phase::Attack);
        let templates = legal_templates(&map, &state);
        assert!(templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::GlobalChat)));
        let targets: Vec<_> = templates
            .iter()
            .filter_map(|t| match t {
                ActionTemplate::PrivateChat { target } => Some(target.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec!["P2".to_string()]);
    }

    #[test]
    fn generation_is_idempotent() {
        for phase in [Phase::Reinforce, Phase::Attack, Phase::Fortify] {
            let (map, mut state) = play_state(phase);
            state.reinforcement_pool[0] = 3;
            let a = legal_templates(&map, &state);
            let b = legal_templates(&map, &state);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn setup_2p_single_template_carries_both_pools() {
        let map = MapGraph::from_json(TINY_MAP).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let deck = Deck::territory_only(&map, &mut rng);
        let players = vec![
            Player::new("P1", "Red"),
            Player::new("P2", "Blue"),
            Player::neutral("Gray"),
        ];
        let mut state = GameState::new(&map, players, deck, true);
        state.phase = Phase::Setup2pPlaceRemaining;
        state.setup_order = vec![PlayerId(0), PlayerId(1)];
        state.setup_index = 0;
        state.setup_pool = vec![10, 10, 5];
        state.set_owner(TerritoryId(0), PlayerId(0));
        state.add_armies(TerritoryId(0), 1);
        state.set_owner(TerritoryId(1), PlayerId(1));
        state.add_armies(TerritoryId(1), 1);
        state.set_owner(TerritoryId(2), PlayerId(2));
        state.add_armies(TerritoryId(2), 1);

        let templates = legal_templates(&map, &state);
        assert_eq!(templates.len(), 1);
        match &templates[0] {
            ActionTemplate::Setup2pPlaceArmies {
                own_allotment,
                own_territories,
                neutral_can_place,
                neutral_territories,
            } => {
                assert_eq!(*own_allotment, 2);
                assert_eq!(own_territories, &vec!["Aria".to_string()]);
                assert!(neutral_can_place);
                assert_eq!(neutral_territories, &vec!["Cinder".to_string()]);
            }
            other => panic!("unexpected template {:?}", other),
        }
    }
}
