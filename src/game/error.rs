//! Engine errors.

use crate::game::player::PlayerId;

/// Errors raised by the deck, hands, and game state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A mandatory draw found the deck empty.
    #[error("Deck is empty")]
    EmptyDeck,

    /// A random card was requested from an empty hand.
    #[error("Hand is empty")]
    EmptyHand,

    /// A hand index does not address a card.
    #[error("Card index {index} out of range for hand of {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Hand size.
        len: usize,
    },

    /// Two cards played as a pair do not share a rank.
    #[error("Cards at {first} and {second} are not a matching pair")]
    NotAPair {
        /// First hand index.
        first: usize,
        /// Second hand index.
        second: usize,
    },

    /// No live player has this id.
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// The same id was seated twice.
    #[error("Duplicate player: {0}")]
    DuplicatePlayer(PlayerId),

    /// Player count outside the configured bounds.
    #[error("Invalid player count {count} (allowed {min}..={max})")]
    InvalidPlayerCount {
        /// Seated players.
        count: usize,
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Not enough cards to deal every hand.
    #[error("Deck of {available} cards cannot deal {needed}")]
    InsufficientDeck {
        /// Cards required.
        needed: usize,
        /// Cards in the deck.
        available: usize,
    },

    /// The operation needs at least one live player.
    #[error("No live players")]
    NoPlayers,
}
