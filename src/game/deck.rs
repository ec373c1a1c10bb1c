//! Draw Pile
//!
//! Ordered stack of cards. The top of the pile is the end of the vector, so
//! drawing is a `pop`.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::card::{standard_cards, Card, CardKind};
use crate::game::error::GameError;

/// The draw pile.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Create a deck from cards listed bottom-to-top.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// The unshuffled starting deck (no bombs, no Defuses).
    pub fn standard() -> Self {
        Self::from_cards(standard_cards())
    }

    /// Number of cards left.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the pile exhausted?
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Count cards of a kind still in the pile.
    pub fn count_kind(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| c.kind == kind).count()
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    /// Uniformly permute the remaining cards.
    pub fn shuffle(&mut self, rng: &mut DeterministicRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Top `n` cards, top first, without removing them.
    ///
    /// Returns fewer than `n` when the pile is shorter.
    pub fn peek(&self, n: usize) -> Vec<Card> {
        self.cards.iter().rev().take(n).copied().collect()
    }

    /// Insert a card `depth` positions below the top.
    ///
    /// Depth 0 puts it on top; depths past the bottom clamp to the bottom.
    pub fn insert_at(&mut self, card: Card, depth: usize) {
        let index = self.cards.len() - depth.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Add `count` ExplodingKittens on top (callers shuffle afterwards).
    pub fn inject_bombs(&mut self, count: usize) {
        self.cards
            .extend(std::iter::repeat(Card::new(CardKind::ExplodingKitten)).take(count));
    }

    /// All cards, bottom-to-top.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: u8) -> Deck {
        Deck::from_cards((1..=n).map(Card::number).collect())
    }

    #[test]
    fn test_draw_takes_top() {
        let mut deck = numbered(3);
        assert_eq!(deck.draw().unwrap().rank(), Some(3));
        assert_eq!(deck.draw().unwrap().rank(), Some(2));
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_draw_empty_fails() {
        let mut deck = Deck::default();
        assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
    }

    #[test]
    fn test_peek_does_not_remove() {
        let deck = numbered(5);
        let top: Vec<_> = deck.peek(3).iter().map(|c| c.rank().unwrap()).collect();
        assert_eq!(top, vec![5, 4, 3]);
        assert_eq!(deck.len(), 5);

        assert_eq!(deck.peek(10).len(), 5);
    }

    #[test]
    fn test_insert_at_depth() {
        let mut deck = numbered(3);
        deck.insert_at(Card::new(CardKind::ExplodingKitten), 0);
        assert!(deck.peek(1)[0].is_bomb());

        let mut deck = numbered(3);
        deck.insert_at(Card::new(CardKind::ExplodingKitten), 2);
        let top = deck.peek(4);
        assert!(top[2].is_bomb());

        let mut deck = numbered(3);
        deck.insert_at(Card::new(CardKind::ExplodingKitten), 99);
        assert!(deck.cards()[0].is_bomb());
        assert_eq!(deck.len(), 4);
    }

    #[test]
    fn test_inject_bombs() {
        let mut deck = Deck::standard();
        let before = deck.len();
        deck.inject_bombs(3);
        assert_eq!(deck.len(), before + 3);
        assert_eq!(deck.count_kind(CardKind::ExplodingKitten), 3);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut deck = Deck::standard();
        let mut rng = DeterministicRng::new(7);
        deck.shuffle(&mut rng);

        assert_eq!(deck.len(), 46);
        assert_eq!(deck.count_kind(CardKind::Nope), 5);
        assert_eq!(deck.count_kind(CardKind::SeeTheFuture), 5);
    }
}
