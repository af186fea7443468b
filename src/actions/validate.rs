//! Semantic action validation.
//!
//! Checks a parsed action against the current template set: the type must
//! have at least one template, fixed identifying fields must match a
//! template exactly, and numeric fields must fall inside that template's
//! bounds. Validation never mutates state and never panics; it returns the
//! typed rejection reason the engine reports back to the decision source.

use super::{Action, ActionReject, ActionTemplate};

fn no_match(action: &Action) -> ActionReject {
    ActionReject::NoMatchingTemplate {
        action_type: action.type_tag().to_string(),
    }
}

fn structural(reason: impl Into<String>) -> ActionReject {
    ActionReject::StructuralViolation {
        reason: reason.into(),
    }
}

/// Validates a proposed action against the current templates.
pub fn validate(action: &Action, templates: &[ActionTemplate]) -> Result<(), ActionReject> {
    let matching: Vec<&ActionTemplate> = templates
        .iter()
        .filter(|t| t.type_tag() == action.type_tag())
        .collect();

    if matching.is_empty() {
        // A mandatory trade swallows every phase action except the trade
        // itself; chat stays available when its templates are offered.
        let trade_forced = templates
            .iter()
            .any(|t| matches!(t, ActionTemplate::TradeCards { mandatory: true, .. }));
        if trade_forced && !matches!(action, Action::TradeCards { .. }) {
            return Err(ActionReject::IllegalMandatoryTradeState);
        }
        return Err(no_match(action));
    }

    match action {
        Action::SetupClaim { territory } => matching
            .iter()
            .any(|t| matches!(t, ActionTemplate::SetupClaim { territory: tt } if tt == territory))
            .then_some(())
            .ok_or_else(|| no_match(action)),

        Action::SetupPlaceArmy { territory } => matching
            .iter()
            .any(
                |t| matches!(t, ActionTemplate::SetupPlaceArmy { territory: tt } if tt == territory),
            )
            .then_some(())
            .ok_or_else(|| no_match(action)),

        Action::Setup2pPlaceArmies {
            own_army_placements,
            neutral_army_placement,
        } => {
            let template = matching[0];
            let ActionTemplate::Setup2pPlaceArmies {
                own_allotment,
                own_territories,
                neutral_can_place,
                neutral_territories,
            } = template
            else {
                return Err(no_match(action));
            };

            if own_army_placements.is_empty() {
                return Err(structural("own_army_placements must not be empty"));
            }
            let mut sum = 0u32;
            for (territory, count) in own_army_placements {
                if *count == 0 {
                    return Err(structural(format!(
                        "placement on '{}' must be positive",
                        territory
                    )));
                }
                if !own_territories.contains(territory) {
                    return Err(structural(format!(
                        "'{}' is not one of the player's territories",
                        territory
                    )));
                }
                sum += count;
            }
            if sum != *own_allotment {
                return Err(structural(format!(
                    "placements sum to {} but the turn allotment is {}",
                    sum, own_allotment
                )));
            }

            if let Some((territory, count)) = neutral_army_placement {
                if !neutral_can_place {
                    return Err(structural("the Neutral pool is exhausted"));
                }
                if *count != 1 {
                    return Err(structural(
                        "neutral_army_placement count must be exactly 1",
                    ));
                }
                if !neutral_territories.contains(territory) {
                    return Err(structural(format!(
                        "'{}' is not a Neutral territory",
                        territory
                    )));
                }
            }
            Ok(())
        }

        Action::Deploy {
            territory,
            num_armies,
        } => {
            let max = matching.iter().find_map(|t| match t {
                ActionTemplate::Deploy {
                    territory: tt,
                    max_armies,
                } if tt == territory => Some(*max_armies),
                _ => None,
            });
            let max = max.ok_or_else(|| no_match(action))?;
            if *num_armies == 0 || *num_armies > max {
                return Err(ActionReject::OutOfRangeValue {
                    field: "num_armies",
                    value: *num_armies,
                    min: 1,
                    max,
                });
            }
            Ok(())
        }

        Action::TradeCards { card_indices } => {
            let mut sorted = card_indices.clone();
            sorted.sort_unstable();
            matching
                .iter()
                .any(|t| {
                    matches!(t, ActionTemplate::TradeCards { card_indices: ti, .. } if *ti == sorted)
                })
                .then_some(())
                .ok_or_else(|| no_match(action))
        }

        Action::Attack {
            from,
            to,
            num_armies,
        } => {
            let max = matching.iter().find_map(|t| match t {
                ActionTemplate::Attack {
                    from: tf,
                    to: tt,
                    max_armies_for_attack,
                } if tf == from && tt == to => Some(*max_armies_for_attack),
                _ => None,
            });
            let max = max.ok_or_else(|| no_match(action))?;
            if *num_armies == 0 || *num_armies > max {
                return Err(ActionReject::OutOfRangeValue {
                    field: "num_armies",
                    value: *num_armies,
                    min: 1,
                    max,
                });
            }
            Ok(())
        }

        Action::PostAttackFortify { num_armies } => {
            let ActionTemplate::PostAttackFortify {
                min_armies,
                max_armies,
                ..
            } = matching[0]
            else {
                return Err(no_match(action));
            };
            if num_armies < min_armies || num_armies > max_armies {
                return Err(ActionReject::OutOfRangeValue {
                    field: "num_armies",
                    value: *num_armies,
                    min: *min_armies,
                    max: *max_armies,
                });
            }
            Ok(())
        }

        Action::Fortify {
            from,
            to,
            num_armies,
        } => {
            let max = matching.iter().find_map(|t| match t {
                ActionTemplate::Fortify {
                    from: tf,
                    to: tt,
                    max_armies_to_move,
                } if tf == from && tt == to => Some(*max_armies_to_move),
                _ => None,
            });
            let max = max.ok_or_else(|| no_match(action))?;
            if *num_armies > max {
                return Err(ActionReject::OutOfRangeValue {
                    field: "num_armies",
                    value: *num_armies,
                    min: 0,
                    max,
                });
            }
            Ok(())
        }

        // Presence of the template is the whole check.
        Action::EndReinforcePhase | Action::EndAttackPhase | Action::EndTurn
        | Action::GlobalChat { .. } => Ok(()),

        Action::PrivateChat { target, .. } => matching
            .iter()
            .any(|t| matches!(t, ActionTemplate::PrivateChat { target: tt } if tt == target))
            .then_some(())
            .ok_or_else(|| no_match(action)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deploy_template(territory: &str, max: u32) -> ActionTemplate {
        ActionTemplate::Deploy {
            territory: territory.to_string(),
            max_armies: max,
        }
    }

    #[test]
    fn deploy_zero_is_out_of_range() {
        let templates = vec![deploy_template("Alaska", 5)];
        let action = Action::Deploy {
            territory: "Alaska".to_string(),
            num_armies: 0,
        };
        let err = validate(&action, &templates).unwrap_err();
        assert!(matches!(err, ActionReject::OutOfRangeValue { value: 0, .. }));
    }

    #[test]
    fn deploy_accepts_full_bound_range() {
        let templates = vec![deploy_template("Alaska", 5)];
        for n in 1..=5 {
            let action = Action::Deploy {
                territory: "Alaska".to_string(),
                num_armies: n,
            };
            assert!(validate(&action, &templates).is_ok(), "n = {}", n);
        }
        let action = Action::Deploy {
            territory: "Alaska".to_string(),
            num_armies: 6,
        };
        assert!(validate(&action, &templates).is_err());
    }

    #[test]
    fn deploy_to_unlisted_territory_finds_no_template() {
        let templates = vec![deploy_template("Alaska", 5)];
        let action = Action::Deploy {
            territory: "Kamchatka".to_string(),
            num_armies: 1,
        };
        let err = validate(&action, &templates).unwrap_err();
        assert!(matches!(err, ActionReject::NoMatchingTemplate { .. }));
    }

    #[test]
    fn unknown_type_for_phase_finds_no_template() {
        let templates = vec![deploy_template("Alaska", 5)];
        let err = validate(&Action::EndTurn, &templates).unwrap_err();
        assert!(matches!(err, ActionReject::NoMatchingTemplate { .. }));
    }

    #[test]
    fn mandatory_trade_blocks_other_actions() {
        let templates = vec![ActionTemplate::TradeCards {
            card_indices: vec![0, 1, 2],
            mandatory: true,
            post_elimination: false,
        }];
        let action = Action::Deploy {
            territory: "Alaska".to_string(),
            num_armies: 1,
        };
        let err = validate(&action, &templates).unwrap_err();
        assert!(matches!(err, ActionReject::IllegalMandatoryTradeState));
    }

    #[test]
    fn trade_indices_match_in_any_order() {
        let templates = vec![ActionTemplate::TradeCards {
            card_indices: vec![0, 2, 4],
            mandatory: false,
            post_elimination: false,
        }];
        let action = Action::TradeCards {
            card_indices: vec![4, 0, 2],
        };
        assert!(validate(&action, &templates).is_ok());

        let wrong = Action::TradeCards {
            card_indices: vec![0, 1, 2],
        };
        assert!(validate(&wrong, &templates).is_err());
    }

    #[test]
    fn attack_bounds_are_enforced() {
        let templates = vec![ActionTemplate::Attack {
            from: "Alaska".to_string(),
            to: "Kamchatka".to_string(),
            max_armies_for_attack: 3,
        }];
        let ok = Action::Attack {
            from: "Alaska".to_string(),
            to: "Kamchatka".to_string(),
            num_armies: 2,
        };
        assert!(validate(&ok, &templates).is_ok());

        let over = Action::Attack {
            from: "Alaska".to_string(),
            to: "Kamchatka".to_string(),
            num_armies: 4,
        };
        assert!(matches!(
            validate(&over, &templates).unwrap_err(),
            ActionReject::OutOfRangeValue { .. }
        ));

        let reversed = Action::Attack {
            from: "Kamchatka".to_string(),
            to: "Alaska".to_string(),
            num_armies: 1,
        };
        assert!(matches!(
            validate(&reversed, &templates).unwrap_err(),
            ActionReject::NoMatchingTemplate { .. }
        ));
    }

    #[test]
    fn post_attack_fortify_is_inclusive_on_both_bounds() {
        let templates = vec![ActionTemplate::PostAttackFortify {
            from: "Alaska".to_string(),
            to: "Kamchatka".to_string(),
            min_armies: 2,
            max_armies: 4,
        }];
        for n in 2..=4 {
            assert!(validate(&Action::PostAttackFortify { num_armies: n }, &templates).is_ok());
        }
        for n in [1, 5] {
            assert!(matches!(
                validate(&Action::PostAttackFortify { num_armies: n }, &templates).unwrap_err(),
                ActionReject::OutOfRangeValue { .. }
            ));
        }
    }

    #[test]
    fn fortify_allows_zero_up_to_max() {
        let templates = vec![ActionTemplate::Fortify {
            from: "Aria".to_string(),
            to: "Boreal".to_string(),
            max_armies_to_move: 2,
        }];
        for n in 0..=2 {
            let action = Action::Fortify {
                from: "Aria".to_string(),
                to: "Boreal".to_string(),
                num_armies: n,
            };
            assert!(validate(&action, &templates).is_ok(), "n = {}", n);
        }
        let action = Action::Fortify {
            from: "Aria".to_string(),
            to: "Boreal".to_string(),
            num_armies: 3,
        };
        assert!(validate(&action, &templates).is_err());
    }

    fn setup_2p_template() -> Vec<ActionTemplate> {
        vec![ActionTemplate::Setup2pPlaceArmies {
            own_allotment: 2,
            own_territories: vec!["Alaska".to_string(), "Alberta".to_string()],
            neutral_can_place: true,
            neutral_territories: vec!["Japan".to_string()],
        }]
    }

    #[test]
    fn setup_2p_accepts_exact_sum_and_single_neutral() {
        let action = Action::Setup2pPlaceArmies {
            own_army_placements: vec![("Alaska".to_string(), 1), ("Alberta".to_string(), 1)],
            neutral_army_placement: Some(("Japan".to_string(), 1)),
        };
        assert!(validate(&action, &setup_2p_template()).is_ok());
    }

    #[test]
    fn setup_2p_rejects_wrong_sum() {
        let action = Action::Setup2pPlaceArmies {
            own_army_placements: vec![("Alaska".to_string(), 3)],
            neutral_army_placement: None,
        };
        let err = validate(&action, &setup_2p_template()).unwrap_err();
        assert!(matches!(err, ActionReject::StructuralViolation { .. }));
    }

    #[test]
    fn setup_2p_rejects_empty_placements() {
        let action = Action::Setup2pPlaceArmies {
            own_army_placements: vec![],
            neutral_army_placement: None,
        };
        let err = validate(&action, &setup_2p_template()).unwrap_err();
        assert!(matches!(err, ActionReject::StructuralViolation { .. }));
    }

    #[test]
    fn setup_2p_rejects_zero_count_and_foreign_territory() {
        let zero = Action::Setup2pPlaceArmies {
            own_army_placements: vec![("Alaska".to_string(), 0), ("Alberta".to_string(), 2)],
            neutral_army_placement: None,
        };
        assert!(matches!(
            validate(&zero, &setup_2p_template()).unwrap_err(),
            ActionReject::StructuralViolation { .. }
        ));

        let foreign = Action::Setup2pPlaceArmies {
            own_army_placements: vec![("Japan".to_string(), 2)],
            neutral_army_placement: None,
        };
        assert!(matches!(
            validate(&foreign, &setup_2p_template()).unwrap_err(),
            ActionReject::StructuralViolation { .. }
        ));
    }

    #[test]
    fn setup_2p_rejects_bad_neutral_count() {
        let action = Action::Setup2pPlaceArmies {
            own_army_placements: vec![("Alaska".to_string(), 2)],
            neutral_army_placement: Some(("Japan".to_string(), 2)),
        };
        let err = validate(&action, &setup_2p_template()).unwrap_err();
        assert!(matches!(err, ActionReject::StructuralViolation { .. }));
    }

    #[test]
    fn private_chat_needs_a_listed_target() {
        let templates = vec![ActionTemplate::PrivateChat {
            target: "P2".to_string(),
        }];
        let ok = Action::PrivateChat {
            target: "P2".to_string(),
            message: "truce?".to_string(),
        };
        assert!(validate(&ok, &templates).is_ok());

        let unknown = Action::PrivateChat {
            target: "P9".to_string(),
            message: "hello".to_string(),
        };
        assert!(validate(&unknown, &templates).is_err());
    }

    #[test]
    fn validation_does_not_consume_templates() {
        let templates = vec![deploy_template("Alaska", 5)];
        let action = Action::Deploy {
            territory: "Alaska".to_string(),
            num_armies: 2,
        };
        validate(&action, &templates).unwrap();
        validate(&action, &templates).unwrap();
        assert_eq!(templates.len(), 1);
    }
}
