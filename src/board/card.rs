//! Cards and the deck.
//!
//! The deck holds one card per territory (designs cycling through Infantry,
//! Cavalry, Artillery) plus two Wilds. Cards are never destroyed: dealt cards
//! live in player hands, traded cards go to a discard pile that is reshuffled
//! into the draw pile when it runs dry.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::map::{MapGraph, TerritoryId};

/// Number of Wild cards in a standard deck.
pub const WILD_COUNT: usize = 2;

/// The design printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CardDesign {
    Infantry,
    Cavalry,
    Artillery,
    Wild,
}

/// A single card: a design plus, for non-Wilds, the territory it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub design: CardDesign,
    pub territory: Option<TerritoryId>,
}

impl Card {
    pub fn territory_card(design: CardDesign, territory: TerritoryId) -> Card {
        Card {
            design,
            territory: Some(territory),
        }
    }

    pub fn wild() -> Card {
        Card {
            design: CardDesign::Wild,
            territory: None,
        }
    }
}

/// Draw pile plus discard pile.
#[derive(Debug, Clone)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

/// One territory card per territory, designs cycling in id order.
fn territory_cards(map: &MapGraph) -> Vec<Card> {
    const CYCLE: [CardDesign; 3] = [
        CardDesign::Infantry,
        CardDesign::Cavalry,
        CardDesign::Artillery,
    ];
    map.territory_ids()
        .enumerate()
        .map(|(i, tid)| Card::territory_card(CYCLE[i % 3], tid))
        .collect()
}

impl Deck {
    /// Builds the standard shuffled deck: territory cards plus two Wilds.
    pub fn standard(map: &MapGraph, rng: &mut impl Rng) -> Deck {
        let mut draw_pile = territory_cards(map);
        for _ in 0..WILD_COUNT {
            draw_pile.push(Card::wild());
        }
        draw_pile.shuffle(rng);
        Deck {
            draw_pile,
            discard_pile: Vec::new(),
        }
    }

    /// Builds a shuffled deck of territory cards only.
    ///
    /// Used for the 2-player deal, where Wilds enter the deck only after
    /// setup completes.
    pub fn territory_only(map: &MapGraph, rng: &mut impl Rng) -> Deck {
        let mut draw_pile = territory_cards(map);
        draw_pile.shuffle(rng);
        Deck {
            draw_pile,
            discard_pile: Vec::new(),
        }
    }

    /// Adds the two Wilds and reshuffles the draw pile.
    pub fn add_wilds(&mut self, rng: &mut impl Rng) {
        for _ in 0..WILD_COUNT {
            self.draw_pile.push(Card::wild());
        }
        self.draw_pile.shuffle(rng);
    }

    /// Draws the top card, reshuffling the discard pile in first if the draw
    /// pile is empty. Returns None only when both piles are empty.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<Card> {
        if self.draw_pile.is_empty() && !self.discard_pile.is_empty() {
            self.draw_pile.append(&mut self.discard_pile);
            self.draw_pile.shuffle(rng);
        }
        self.draw_pile.pop()
    }

    /// Moves a traded card to the discard pile.
    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn draw_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Total cards currently in the deck (draw + discard).
    pub fn len(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
