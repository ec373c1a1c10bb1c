//! Player Decisions
//!
//! The engine never talks to a transport. Everything it needs from a human
//! goes through [`Decisions`], one instance per match, and every call is
//! raced against a deadline by [`bounded`].

use std::future::Future;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::game::card::Card;
use crate::game::events::GameEvent;
use crate::game::player::PlayerId;
use crate::game::state::StateSnapshot;

/// What the current player wants to do with their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Play the card at this hand index.
    Play(usize),
    /// Play two Number cards of equal rank.
    PlayPair(usize, usize),
    /// Play nothing and draw.
    Pass,
}

/// Source of player decisions for one match.
///
/// Implementations only answer questions; they never reach into game state.
/// The engine applies its own deadline to every `request_*` call, so an
/// implementation may wait as long as it likes.
#[async_trait::async_trait]
pub trait Decisions: Send + Sync {
    /// Ask the current player for their action. `None` means pass.
    async fn request_action(&self, player: &PlayerId) -> Option<PlayerAction>;

    /// Ask whether `player` wants to Nope the `challenged` card.
    async fn request_nope(&self, player: &PlayerId, challenged: Card) -> bool;

    /// Ask `player` whom to take a card from.
    async fn request_favor_target(&self, player: &PlayerId) -> Option<PlayerId>;

    /// Ask `player` which face-down position of `target`'s `hand_len` cards to steal.
    async fn request_card_choice(&self, player: &PlayerId, target: &PlayerId, hand_len: usize) -> Option<usize>;

    /// Ask where to hide a defused bomb (depth from the top).
    async fn request_bomb_placement(&self, _player: &PlayerId, _deck_len: usize) -> Option<usize> {
        None
    }

    /// Push the public state to every client.
    fn publish_state(&self, snapshot: &StateSnapshot);

    /// Push a batch of public events, oldest first.
    fn publish_events(&self, _events: &[GameEvent]) {}

    /// Privately send a player their hand.
    fn show_hand(&self, _player: &PlayerId, _hand: &[Card]) {}

    /// Privately show a player the top of the pile.
    fn reveal_future(&self, _player: &PlayerId, _cards: &[Card]) {}

    /// Announce the winner.
    fn announce_winner(&self, _winner: &PlayerId) {}
}

/// Race a decision request against a deadline.
///
/// Returns `None` if the deadline fires first; the request future is dropped
/// at that point, so a late answer can never be applied.
pub async fn bounded<T, F>(deadline: Duration, what: &'static str, player: &PlayerId, request: F) -> Option<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(deadline, request).await {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(%player, what, ?deadline, "decision timed out");
            None
        }
    }
}
