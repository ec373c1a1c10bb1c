//! Player State
//!
//! A seated participant and the cards they hold.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::card::{Card, CardKind};
use crate::game::error::GameError;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Player identifier as supplied by the room.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A seated player and their hand.
///
/// The hand is an unordered multiset; indices are only meaningful until the
/// next mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier
    pub id: PlayerId,

    /// Cards held, in the order they were received
    hand: Vec<Card>,
}

impl Player {
    /// Create a player with an empty hand.
    pub fn new(id: PlayerId) -> Self {
        Self { id, hand: Vec::new() }
    }

    /// Cards held.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Number of cards held.
    pub fn hand_len(&self) -> usize {
        self.hand.len()
    }

    /// Add a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Card at `index`, if any.
    pub fn card_at(&self, index: usize) -> Option<Card> {
        self.hand.get(index).copied()
    }

    /// Remove and return the card at `index`.
    pub fn remove_card_at(&mut self, index: usize) -> Result<Card, GameError> {
        if index >= self.hand.len() {
            return Err(GameError::IndexOutOfRange { index, len: self.hand.len() });
        }
        Ok(self.hand.remove(index))
    }

    /// Remove and return a uniformly random card.
    pub fn random_card(&mut self, rng: &mut DeterministicRng) -> Result<Card, GameError> {
        if self.hand.is_empty() {
            return Err(GameError::EmptyHand);
        }
        let index = rng.next_index(self.hand.len());
        Ok(self.hand.remove(index))
    }

    /// Reorder the hand uniformly at random.
    pub fn shuffle_hand(&mut self, rng: &mut DeterministicRng) {
        rng.shuffle(&mut self.hand);
    }

    /// Index of the first card of `kind`.
    pub fn find_kind(&self, kind: CardKind) -> Option<usize> {
        self.hand.iter().position(|c| c.kind == kind)
    }

    /// Does the player hold a Nope?
    pub fn has_nope(&self) -> bool {
        self.find_kind(CardKind::Nope).is_some()
    }

    /// Does the player hold a Defuse?
    pub fn has_defuse(&self) -> bool {
        self.find_kind(CardKind::Defuse).is_some()
    }

    /// First two Number cards of equal rank.
    pub fn find_pair(&self) -> Option<(usize, usize)> {
        for (i, a) in self.hand.iter().enumerate() {
            for (j, b) in self.hand.iter().enumerate().skip(i + 1) {
                if a.pairs_with(b) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}
