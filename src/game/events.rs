//! Game Events
//!
//! Everything the engine does to a match is recorded as an event, in the
//! order it happened. The match driver forwards them to clients in batches,
//! with hidden information stripped by [`GameEvent::redacted`].

use serde::{Serialize, Deserialize};

use crate::game::card::{Card, CardKind};
use crate::game::player::PlayerId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEventData {
    /// A single card was played and discarded
    CardPlayed {
        /// Who played it
        player_id: PlayerId,
        /// The card
        card: Card,
    },

    /// A matching Number pair was played and discarded
    PairPlayed {
        /// Who played it
        player_id: PlayerId,
        /// Shared rank
        rank: u8,
    },

    /// A Nope was played
    Noped {
        /// Who Noped
        player_id: PlayerId,
        /// Nopes in the chain so far
        depth: u32,
    },

    /// Nope resolution finished for a play
    PlayResolved {
        /// Who made the play
        player_id: PlayerId,
        /// Kind of the challenged card
        kind: CardKind,
        /// Nopes played against it
        nopes: u32,
        /// Odd Nope count
        canceled: bool,
    },

    /// The draw pile was shuffled
    DeckShuffled {
        /// Who shuffled, `None` for the engine
        player_id: Option<PlayerId>,
    },

    /// A player looked at the top of the pile
    FutureSeen {
        /// Who looked
        player_id: PlayerId,
        /// Cards seen
        count: u32,
    },

    /// An Attack added extra draws for the next player
    AttackQueued {
        /// Attacker
        player_id: PlayerId,
        /// Extra draws now owed
        pending_draws: u32,
    },

    /// A card moved from one hand to another
    CardTaken {
        /// Giver
        from: PlayerId,
        /// Receiver
        to: PlayerId,
    },

    /// A player drew a safe card
    CardDrawn {
        /// Drawer
        player_id: PlayerId,
    },

    /// A player defused a bomb and returned it to the pile
    BombDefused {
        /// Drawer
        player_id: PlayerId,
        /// Depth from the top before any reshuffle; `None` once redacted
        depth: Option<u32>,
    },

    /// A player drew a bomb without a Defuse
    PlayerEliminated {
        /// Eliminated player
        player_id: PlayerId,
        /// Finishing position, last place first out
        placement: u8,
    },

    /// The turn passed to the next player
    TurnAdvanced {
        /// New current player
        player_id: PlayerId,
    },

    /// The match is over
    GameEnded {
        /// Winner, if anyone survived
        winner_id: Option<PlayerId>,
        /// Turns played
        turns: u32,
    },
}

/// A game event stamped with its position in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Monotonic sequence number within the match
    pub seq: u32,

    /// Turn during which the event happened
    pub turn: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(seq: u32, turn: u32, data: GameEventData) -> Self {
        Self { seq, turn, data }
    }

    /// Player the event is about, if any.
    pub fn player_id(&self) -> Option<&PlayerId> {
        match &self.data {
            GameEventData::CardPlayed { player_id, .. }
            | GameEventData::PairPlayed { player_id, .. }
            | GameEventData::Noped { player_id, .. }
            | GameEventData::PlayResolved { player_id, .. }
            | GameEventData::FutureSeen { player_id, .. }
            | GameEventData::AttackQueued { player_id, .. }
            | GameEventData::CardDrawn { player_id }
            | GameEventData::BombDefused { player_id, .. }
            | GameEventData::PlayerEliminated { player_id, .. }
            | GameEventData::TurnAdvanced { player_id } => Some(player_id),
            GameEventData::CardTaken { to, .. } => Some(to),
            GameEventData::DeckShuffled { player_id } => player_id.as_ref(),
            GameEventData::GameEnded { winner_id, .. } => winner_id.as_ref(),
        }
    }

    /// Copy safe to show every player.
    ///
    /// Where a defused bomb went back is known only to whoever hid it.
    pub fn redacted(&self) -> Self {
        let data = match &self.data {
            GameEventData::BombDefused { player_id, .. } => {
                GameEventData::BombDefused { player_id: player_id.clone(), depth: None }
            }
            other => other.clone(),
        };
        Self { seq: self.seq, turn: self.turn, data }
    }

    /// Is this an elimination?
    pub fn is_elimination(&self) -> bool {
        matches!(self.data, GameEventData::PlayerEliminated { .. })
    }
}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seq.cmp(&other.seq)
    }
}
