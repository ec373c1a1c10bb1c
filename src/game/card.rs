//! Card Catalog
//!
//! Every card is a plain value tagged with its effect. Number cards carry a
//! rank and only do something when played as a matching pair.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Highest rank printed on a Number card.
pub const MAX_NUMBER_RANK: u8 = 5;

/// Effect tag of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// End the turn without drawing.
    Skip,
    /// End the turn without drawing; the next player takes an extra draw.
    Attack,
    /// Shuffle the draw pile.
    Shuffle,
    /// Privately look at the top of the draw pile.
    SeeTheFuture,
    /// Force another player to hand over a card.
    Favor,
    /// Cancel the most recent play (stackable).
    Nope,
    /// Neutralize a drawn ExplodingKitten.
    Defuse,
    /// Eliminates whoever draws it without a Defuse.
    ExplodingKitten,
    /// Pairing card; two of the same rank steal a random card.
    Number(u8),
}

impl CardKind {
    /// Can this card be played on its own as a turn action?
    ///
    /// Nope only answers other plays, Defuse only answers a bomb, and Number
    /// cards only act in pairs.
    pub fn is_playable_alone(self) -> bool {
        matches!(
            self,
            CardKind::Skip
                | CardKind::Attack
                | CardKind::Shuffle
                | CardKind::SeeTheFuture
                | CardKind::Favor
        )
    }

    /// Stable numeric code (used for state hashing).
    pub fn code(self) -> u8 {
        match self {
            CardKind::Skip => 1,
            CardKind::Attack => 2,
            CardKind::Shuffle => 3,
            CardKind::SeeTheFuture => 4,
            CardKind::Favor => 5,
            CardKind::Nope => 6,
            CardKind::Defuse => 7,
            CardKind::ExplodingKitten => 8,
            CardKind::Number(rank) => 16u8.wrapping_add(rank),
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardKind::Skip => write!(f, "Skip"),
            CardKind::Attack => write!(f, "Attack"),
            CardKind::Shuffle => write!(f, "Shuffle"),
            CardKind::SeeTheFuture => write!(f, "See the Future"),
            CardKind::Favor => write!(f, "Favor"),
            CardKind::Nope => write!(f, "Nope"),
            CardKind::Defuse => write!(f, "Defuse"),
            CardKind::ExplodingKitten => write!(f, "Exploding Kitten"),
            CardKind::Number(rank) => write!(f, "Number {}", rank),
        }
    }
}

/// A single physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Effect tag (and rank, for Number cards)
    pub kind: CardKind,
}

impl Card {
    /// Create a card of the given kind.
    pub const fn new(kind: CardKind) -> Self {
        Self { kind }
    }

    /// Create a Number card.
    pub const fn number(rank: u8) -> Self {
        Self::new(CardKind::Number(rank))
    }

    /// Rank of a Number card.
    pub fn rank(&self) -> Option<u8> {
        match self.kind {
            CardKind::Number(rank) => Some(rank),
            _ => None,
        }
    }

    /// Two Number cards of equal rank form a pair.
    pub fn pairs_with(&self, other: &Card) -> bool {
        matches!((self.rank(), other.rank()), (Some(a), Some(b)) if a == b)
    }

    /// Is this a bomb?
    pub fn is_bomb(&self) -> bool {
        self.kind == CardKind::ExplodingKitten
    }
}

impl From<CardKind> for Card {
    fn from(kind: CardKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Copies of each action card in the starting deck.
pub const STANDARD_COMPOSITION: [(CardKind, usize); 6] = [
    (CardKind::Nope, 5),
    (CardKind::Attack, 4),
    (CardKind::Skip, 4),
    (CardKind::Favor, 4),
    (CardKind::Shuffle, 4),
    (CardKind::SeeTheFuture, 5),
];

/// Copies of each Number rank in the starting deck.
pub const NUMBER_COPIES: usize = 4;

/// Cards of the starting deck, before bombs and Defuses are added.
pub fn standard_cards() -> Vec<Card> {
    let mut cards = Vec::new();
    for (kind, count) in STANDARD_COMPOSITION {
        cards.extend(std::iter::repeat(Card::new(kind)).take(count));
    }
    for rank in 1..=MAX_NUMBER_RANK {
        cards.extend(std::iter::repeat(Card::number(rank)).take(NUMBER_COPIES));
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_cards_composition() {
        let cards = standard_cards();
        assert_eq!(cards.len(), 46);
        assert_eq!(cards.iter().filter(|c| c.kind == CardKind::Nope).count(), 5);
        assert!(cards.iter().all(|c| !c.is_bomb()));
        assert!(cards.iter().all(|c| c.kind != CardKind::Defuse));
        assert_eq!(cards.iter().filter(|c| c.rank() == Some(3)).count(), NUMBER_COPIES);
    }

    #[test]
    fn test_pairs_with() {
        assert!(Card::number(2).pairs_with(&Card::number(2)));
        assert!(!Card::number(2).pairs_with(&Card::number(3)));
        assert!(!Card::new(CardKind::Skip).pairs_with(&Card::new(CardKind::Skip)));
    }

    #[test]
    fn test_playable_alone() {
        assert!(CardKind::Skip.is_playable_alone());
        assert!(CardKind::Favor.is_playable_alone());
        assert!(!CardKind::Nope.is_playable_alone());
        assert!(!CardKind::Defuse.is_playable_alone());
        assert!(!CardKind::ExplodingKitten.is_playable_alone());
        assert!(!CardKind::Number(1).is_playable_alone());
    }

    #[test]
    fn test_codes_are_distinct() {
        let mut kinds: Vec<CardKind> = STANDARD_COMPOSITION.iter().map(|(k, _)| *k).collect();
        kinds.push(CardKind::Defuse);
        kinds.push(CardKind::ExplodingKitten);
        kinds.extend((1..=MAX_NUMBER_RANK).map(CardKind::Number));

        let mut codes: Vec<u8> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_code_tolerates_any_rank() {
        let odd: CardKind = serde_json::from_str(r#"{"number":250}"#).unwrap();
        assert_eq!(odd, CardKind::Number(250));
        assert_eq!(odd.code(), 10);
    }

    #[test]
    fn test_card_json() {
        let json = serde_json::to_string(&Card::number(4)).unwrap();
        assert!(json.contains("number"));
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rank(), Some(4));
    }
}
