//! Actions, action templates, and rejection reasons.
//!
//! An [`Action`] is the typed form of a move proposed by a decision source;
//! an [`ActionTemplate`] is a legal move shape generated from the current
//! state, with fixed identifying fields and numeric bounds. Proposals arrive
//! as untrusted JSON, pass through the wire parser, and are then matched
//! against the template set; only then may they touch game state.

pub mod generate;
pub mod validate;
pub mod wire;

use serde::Serialize;
use thiserror::Error;

pub use generate::legal_templates;
pub use validate::validate;
pub use wire::parse_action;

/// A fully-specified move, with territory names as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "SETUP_CLAIM")]
    SetupClaim { territory: String },

    #[serde(rename = "SETUP_PLACE_ARMY")]
    SetupPlaceArmy { territory: String },

    #[serde(rename = "SETUP_2P_PLACE_ARMIES_TURN")]
    Setup2pPlaceArmies {
        own_army_placements: Vec<(String, u32)>,
        #[serde(skip_serializing_if = "Option::is_none")]
        neutral_army_placement: Option<(String, u32)>,
    },

    #[serde(rename = "DEPLOY")]
    Deploy { territory: String, num_armies: u32 },

    #[serde(rename = "TRADE_CARDS")]
    TradeCards { card_indices: Vec<usize> },

    #[serde(rename = "ATTACK")]
    Attack {
        from: String,
        to: String,
        num_armies: u32,
    },

    #[serde(rename = "POST_ATTACK_FORTIFY")]
    PostAttackFortify { num_armies: u32 },

    #[serde(rename = "FORTIFY")]
    Fortify {
        from: String,
        to: String,
        num_armies: u32,
    },

    #[serde(rename = "END_REINFORCE_PHASE")]
    EndReinforcePhase,

    #[serde(rename = "END_ATTACK_PHASE")]
    EndAttackPhase,

    #[serde(rename = "END_TURN")]
    EndTurn,

    #[serde(rename = "GLOBAL_CHAT")]
    GlobalChat { message: String },

    #[serde(rename = "PRIVATE_CHAT")]
    PrivateChat { target: String, message: String },
}

impl Action {
    /// The wire type tag of this action.
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Action::SetupClaim { .. } => "SETUP_CLAIM",
            Action::SetupPlaceArmy { .. } => "SETUP_PLACE_ARMY",
            Action::Setup2pPlaceArmies { .. } => "SETUP_2P_PLACE_ARMIES_TURN",
            Action::Deploy { .. } => "DEPLOY",
            Action::TradeCards { .. } => "TRADE_CARDS",
            Action::Attack { .. } => "ATTACK",
            Action::PostAttackFortify { .. } => "POST_ATTACK_FORTIFY",
            Action::Fortify { .. } => "FORTIFY",
            Action::EndReinforcePhase => "END_REINFORCE_PHASE",
            Action::EndAttackPhase => "END_ATTACK_PHASE",
            Action::EndTurn => "END_TURN",
            Action::GlobalChat { .. } => "GLOBAL_CHAT",
            Action::PrivateChat { .. } => "PRIVATE_CHAT",
        }
    }

    /// True for chat actions, which never consume the phase action and never
    /// mutate game state.
    pub const fn is_chat(&self) -> bool {
        matches!(self, Action::GlobalChat { .. } | Action::PrivateChat { .. })
    }
}

/// A legal move shape for the current state: fixed identifying fields plus
/// numeric bounds for the fillable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ActionTemplate {
    #[serde(rename = "SETUP_CLAIM")]
    SetupClaim { territory: String },

    #[serde(rename = "SETUP_PLACE_ARMY")]
    SetupPlaceArmy { territory: String },

    #[serde(rename = "SETUP_2P_PLACE_ARMIES_TURN")]
    Setup2pPlaceArmies {
        /// Armies the acting player must place this turn.
        own_allotment: u32,
        own_territories: Vec<String>,
        neutral_can_place: bool,
        neutral_territories: Vec<String>,
    },

    #[serde(rename = "DEPLOY")]
    Deploy { territory: String, max_armies: u32 },

    #[serde(rename = "TRADE_CARDS")]
    TradeCards {
        card_indices: Vec<usize>,
        mandatory: bool,
        post_elimination: bool,
    },

    #[serde(rename = "ATTACK")]
    Attack {
        from: String,
        to: String,
        max_armies_for_attack: u32,
    },

    #[serde(rename = "POST_ATTACK_FORTIFY")]
    PostAttackFortify {
        from: String,
        to: String,
        min_armies: u32,
        max_armies: u32,
    },

    #[serde(rename = "FORTIFY")]
    Fortify {
        from: String,
        to: String,
        max_armies_to_move: u32,
    },

    #[serde(rename = "END_REINFORCE_PHASE")]
    EndReinforcePhase,

    #[serde(rename = "END_ATTACK_PHASE")]
    EndAttackPhase,

    #[serde(rename = "END_TURN")]
    EndTurn,

    #[serde(rename = "GLOBAL_CHAT")]
    GlobalChat,

    #[serde(rename = "PRIVATE_CHAT")]
    PrivateChat { target: String },
}

impl ActionTemplate {
    /// The wire type tag of this template.
    pub const fn type_tag(&self) -> &'static str {
        match self {
            ActionTemplate::SetupClaim { .. } => "SETUP_CLAIM",
            ActionTemplate::SetupPlaceArmy { .. } => "SETUP_PLACE_ARMY",
            ActionTemplate::Setup2pPlaceArmies { .. } => "SETUP_2P_PLACE_ARMIES_TURN",
            ActionTemplate::Deploy { .. } => "DEPLOY",
            ActionTemplate::TradeCards { .. } => "TRADE_CARDS",
            ActionTemplate::Attack { .. } => "ATTACK",
            ActionTemplate::PostAttackFortify { .. } => "POST_ATTACK_FORTIFY",
            ActionTemplate::Fortify { .. } => "FORTIFY",
            ActionTemplate::EndReinforcePhase => "END_REINFORCE_PHASE",
            ActionTemplate::EndAttackPhase => "END_ATTACK_PHASE",
            ActionTemplate::EndTurn => "END_TURN",
            ActionTemplate::GlobalChat => "GLOBAL_CHAT",
            ActionTemplate::PrivateChat { .. } => "PRIVATE_CHAT",
        }
    }
}

/// Why a proposed action was rejected. All variants are recoverable: the
/// engine reports the reason and re-solicits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionReject {
    /// Missing/unknown type tag, wrong field types, or extra keys.
    #[error("malformed action: {reason}")]
    MalformedAction { reason: String },

    /// The type is recognized but no template's fixed fields match.
    #[error("no matching {action_type} template for the given fields")]
    NoMatchingTemplate { action_type: String },

    /// A numeric field fell outside the matched template's bounds.
    #[error("{field} = {value} outside [{min}, {max}]")]
    OutOfRangeValue {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// The 2-player placement list had the wrong shape or sum.
    #[error("structural violation: {reason}")]
    StructuralViolation { reason: String },

    /// A non-trade action was proposed while a mandatory trade is
    /// outstanding.
    #[error("a mandatory card trade is outstanding")]
    IllegalMandatoryTradeState,
}
