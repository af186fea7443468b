//! Player identity and per-player data.

use serde::Serialize;

use super::card::Card;

/// Dense index of a player within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

/// Whether a player is still in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerStatus {
    Active,
    Eliminated,
}

/// A seat at the table. The 2-player variant adds a third, neutral seat
/// whose armies defend but never act.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub color: String,
    pub hand: Vec<Card>,
    pub status: PlayerStatus,
    pub neutral: bool,
}

impl Player {
    pub fn new(name: &str, color: &str) -> Player {
        Player {
            name: name.to_string(),
            color: color.to_string(),
            hand: Vec::new(),
            status: PlayerStatus::Active,
            neutral: false,
        }
    }

    /// The non-deciding placeholder seat for the 2-player variant.
    pub fn neutral(color: &str) -> Player {
        Player {
            name: "Neutral".to_string(),
            color: color.to_string(),
            hand: Vec::new(),
            status: PlayerStatus::Active,
            neutral: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_active_with_empty_hand() {
        let p = Player::new("P1", "Red");
        assert!(p.is_active());
        assert!(!p.neutral);
        assert!(p.hand.is_empty());
    }

    #[test]
    fn neutral_seat_is_named_neutral() {
        let n = Player::neutral("Gray");
        assert_eq!(n.name, "Neutral");
        assert!(n.neutral);
        assert!(n.is_active());
    }
}
