//! Game Logic Module
//!
//! The engine proper. Nothing in here knows about transports; every player
//! decision goes through [`Decisions`].
//!
//! ## Module Structure
//!
//! - `card`: Card kinds and the standard deck composition
//! - `deck`: Draw pile
//! - `player`: Seats and hands
//! - `state`: Game state machine (deal, draw, elimination, advance)
//! - `resolve`: Card plays, Nope frames, effect dispatch
//! - `turn`: Per-turn state machine and match driver
//! - `decision`: Player decision contract and bounded requests
//! - `events`: Event log

pub mod card;
pub mod deck;
pub mod player;
pub mod error;
pub mod state;
pub mod resolve;
pub mod turn;
pub mod decision;
pub mod events;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use card::{Card, CardKind};
pub use deck::Deck;
pub use player::{Player, PlayerId};
pub use error::GameError;
pub use state::{DrawReport, EliminationRule, Game, HandSize, StateSnapshot};
pub use resolve::PlayOutcome;
pub use turn::{Match, MatchConfig, NopePolling, TurnPhase, TurnReport};
pub use decision::{bounded, Decisions, PlayerAction};
pub use events::{GameEvent, GameEventData};
