//! Wire-format action parsing.
//!
//! Decision sources return arbitrary JSON; nothing about its shape is
//! trusted. This module turns a raw value into a typed [`Action`] or a
//! [`MalformedAction`](ActionReject::MalformedAction) rejection: the type
//! tag must be known, every required field must be present with the right
//! type, and keys outside the action's shape are refused outright.

use serde_json::{Map, Value};

use super::{Action, ActionReject};

fn malformed(reason: impl Into<String>) -> ActionReject {
    ActionReject::MalformedAction {
        reason: reason.into(),
    }
}

fn check_keys(obj: &Map<String, Value>, allowed: &[&str]) -> Result<(), ActionReject> {
    for key in obj.keys() {
        if key != "type" && !allowed.contains(&key.as_str()) {
            return Err(malformed(format!("unexpected key '{}'", key)));
        }
    }
    Ok(())
}

fn require_str(obj: &Map<String, Value>, key: &str) -> Result<String, ActionReject> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(malformed(format!("'{}' must be a string", key))),
        None => Err(malformed(format!("missing '{}'", key))),
    }
}

fn require_u32(obj: &Map<String, Value>, key: &str) -> Result<u32, ActionReject> {
    match obj.get(key) {
        Some(value) => as_u32(value, key),
        None => Err(malformed(format!("missing '{}'", key))),
    }
}

fn as_u32(value: &Value, key: &str) -> Result<u32, ActionReject> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| malformed(format!("'{}' must be a non-negative integer", key)))
}

/// Parses a `["Territory", count]` pair.
fn placement_pair(value: &Value, key: &str) -> Result<(String, u32), ActionReject> {
    let pair = value
        .as_array()
        .ok_or_else(|| malformed(format!("'{}' entries must be [territory, count] pairs", key)))?;
    if pair.len() != 2 {
        return Err(malformed(format!(
            "'{}' entries must have exactly two elements",
            key
        )));
    }
    let territory = pair[0]
        .as_str()
        .ok_or_else(|| malformed(format!("'{}' territory must be a string", key)))?;
    let count = as_u32(&pair[1], key)?;
    Ok((territory.to_string(), count))
}

/// Parses an untrusted JSON value into a typed action.
///
/// This implements the structural half of validation: recognized type tag,
/// required fields with correct types, and no extra keys. Semantic checks
/// against the current template set happen in [`validate`](super::validate).
pub fn parse_action(value: &Value) -> Result<Action, ActionReject> {
    let obj = value
        .as_object()
        .ok_or_else(|| malformed("action must be a JSON object"))?;
    let tag = match obj.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(malformed("'type' must be a string")),
        None => return Err(malformed("missing 'type' tag")),
    };

    match tag {
        "SETUP_CLAIM" => {
            check_keys(obj, &["territory"])?;
            Ok(Action::SetupClaim {
                territory: require_str(obj, "territory")?,
            })
        }
        "SETUP_PLACE_ARMY" => {
            check_keys(obj, &["territory"])?;
            Ok(Action::SetupPlaceArmy {
                territory: require_str(obj, "territory")?,
            })
        }
        "SETUP_2P_PLACE_ARMIES_TURN" => {
            check_keys(obj, &["own_army_placements", "neutral_army_placement"])?;
            let placements = obj
                .get("own_army_placements")
                .and_then(Value::as_array)
                .ok_or_else(|| malformed("'own_army_placements' must be an array"))?;
            let own_army_placements = placements
                .iter()
                .map(|p| placement_pair(p, "own_army_placements"))
                .collect::<Result<Vec<_>, _>>()?;
            let neutral_army_placement = match obj.get("neutral_army_placement") {
                Some(Value::Null) | None => None,
                Some(p) => Some(placement_pair(p, "neutral_army_placement")?),
            };
            Ok(Action::Setup2pPlaceArmies {
                own_army_placements,
                neutral_army_placement,
            })
        }
        "DEPLOY" => {
            check_keys(obj, &["territory", "num_armies"])?;
            Ok(Action::Deploy {
                territory: require_str(obj, "territory")?,
                num_armies: require_u32(obj, "num_armies")?,
            })
        }
        "TRADE_CARDS" => {
            check_keys(obj, &["card_indices"])?;
            let indices = obj
                .get("card_indices")
                .and_then(Value::as_array)
                .ok_or_else(|| malformed("'card_indices' must be an array"))?;
            let card_indices = indices
                .iter()
                .map(|v| as_u32(v, "card_indices").map(|n| n as usize))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Action::TradeCards { card_indices })
        }
        "ATTACK" => {
            check_keys(obj, &["from", "to", "num_armies"])?;
            Ok(Action::Attack {
                from: require_str(obj, "from")?,
                to: require_str(obj, "to")?,
                num_armies: require_u32(obj, "num_armies")?,
            })
        }
        "POST_ATTACK_FORTIFY" => {
            check_keys(obj, &["num_armies"])?;
            Ok(Action::PostAttackFortify {
                num_armies: require_u32(obj, "num_armies")?,
            })
        }
        "FORTIFY" => {
            check_keys(obj, &["from", "to", "num_armies"])?;
            Ok(Action::Fortify {
                from: require_str(obj, "from")?,
                to: require_str(obj, "to")?,
                num_armies: require_u32(obj, "num_armies")?,
            })
        }
        "END_REINFORCE_PHASE" => {
            check_keys(obj, &[])?;
            Ok(Action::EndReinforcePhase)
        }
        "END_ATTACK_PHASE" => {
            check_keys(obj, &[])?;
            Ok(Action::EndAttackPhase)
        }
        "END_TURN" => {
            check_keys(obj, &[])?;
            Ok(Action::EndTurn)
        }
        "GLOBAL_CHAT" => {
            check_keys(obj, &["message"])?;
            Ok(Action::GlobalChat {
                message: require_str(obj, "message")?,
            })
        }
        "PRIVATE_CHAT" => {
            check_keys(obj, &["target", "message"])?;
            Ok(Action::PrivateChat {
                target: require_str(obj, "target")?,
                message: require_str(obj, "message")?,
            })
        }
        other => Err(malformed(format!("unknown action type '{}'", other))),
    }
}
