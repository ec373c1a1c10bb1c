//! Remote Players
//!
//! [`Decisions`] backed by per-player outbound channels. Each request sends a
//! [`ServerMessage::Prompt`] and parks a single-fire reply slot under its
//! request id. The slot is removed when the waiting future goes away, so an
//! answer that arrives after the engine's deadline is rejected instead of
//! applied.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::game::card::Card;
use crate::game::decision::{Decisions, PlayerAction};
use crate::game::events::GameEvent;
use crate::game::player::PlayerId;
use crate::game::state::StateSnapshot;
use crate::network::protocol::{Decision, Prompt, ServerMessage};
use crate::network::session::SessionError;

struct PendingRequest {
    player: PlayerId,
    prompt: Prompt,
    reply: oneshot::Sender<Decision>,
}

type PendingMap = Mutex<BTreeMap<u64, PendingRequest>>;

/// Removes a pending slot when the request future completes or is dropped.
struct PendingGuard<'a> {
    pending: &'a PendingMap,
    request_id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.request_id);
    }
}

fn lock(pending: &PendingMap) -> MutexGuard<'_, BTreeMap<u64, PendingRequest>> {
    pending.lock().unwrap_or_else(|e| e.into_inner())
}

/// Decision source for one match, talking to clients over channels.
pub struct RemotePlayers {
    outbound: BTreeMap<PlayerId, mpsc::Sender<ServerMessage>>,
    pending: PendingMap,
    next_request: AtomicU64,
}

impl RemotePlayers {
    /// Create from each seated player's outbound channel.
    pub fn new(outbound: impl IntoIterator<Item = (PlayerId, mpsc::Sender<ServerMessage>)>) -> Self {
        Self {
            outbound: outbound.into_iter().collect(),
            pending: Mutex::new(BTreeMap::new()),
            next_request: AtomicU64::new(1),
        }
    }

    /// Number of prompts still waiting for an answer.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Deliver a client's answer to its waiting request.
    pub fn submit(&self, from: &PlayerId, request_id: u64, decision: Decision) -> Result<(), SessionError> {
        let mut pending = lock(&self.pending);
        let request = pending.get(&request_id).ok_or(SessionError::RequestExpired(request_id))?;

        if &request.player != from {
            return Err(SessionError::WrongResponder { request_id, player: from.clone() });
        }
        if !request.prompt.accepts(&decision) {
            return Err(SessionError::DecisionMismatch { request_id, expected: request.prompt.name() });
        }

        let request = pending.remove(&request_id).ok_or(SessionError::RequestExpired(request_id))?;
        request.reply.send(decision).map_err(|_| SessionError::RequestExpired(request_id))
    }

    async fn ask(&self, player: &PlayerId, prompt: Prompt) -> Option<Decision> {
        let Some(outbound) = self.outbound.get(player) else {
            warn!(%player, "prompt for unseated player");
            return None;
        };

        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();
        let name = prompt.name();
        lock(&self.pending).insert(request_id, PendingRequest {
            player: player.clone(),
            prompt: prompt.clone(),
            reply,
        });
        let _guard = PendingGuard { pending: &self.pending, request_id };

        if outbound.send(ServerMessage::Prompt { request_id, prompt }).await.is_err() {
            warn!(%player, request_id, "client gone, prompt dropped");
            return None;
        }
        debug!(%player, request_id, prompt = name, "prompt sent");

        response.await.ok()
    }

    fn notify(&self, player: &PlayerId, message: ServerMessage) {
        if let Some(outbound) = self.outbound.get(player) {
            if let Err(e) = outbound.try_send(message) {
                warn!(%player, "dropped notification: {}", e);
            }
        }
    }

    fn broadcast(&self, message: ServerMessage) {
        for player in self.outbound.keys() {
            self.notify(player, message.clone());
        }
    }
}

#[async_trait::async_trait]
impl Decisions for RemotePlayers {
    async fn request_action(&self, player: &PlayerId) -> Option<PlayerAction> {
        match self.ask(player, Prompt::Action).await? {
            Decision::Action(action) => Some(action),
            _ => None,
        }
    }

    async fn request_nope(&self, player: &PlayerId, challenged: Card) -> bool {
        matches!(
            self.ask(player, Prompt::Nope { challenged }).await,
            Some(Decision::Nope(true))
        )
    }

    async fn request_favor_target(&self, player: &PlayerId) -> Option<PlayerId> {
        match self.ask(player, Prompt::FavorTarget).await? {
            Decision::Target(target) => Some(target),
            _ => None,
        }
    }

    async fn request_card_choice(&self, player: &PlayerId, target: &PlayerId, hand_len: usize) -> Option<usize> {
        let prompt = Prompt::CardChoice { target: target.clone(), hand_size: hand_len as u32 };
        match self.ask(player, prompt).await? {
            Decision::Card(index) => Some(index),
            _ => None,
        }
    }

    async fn request_bomb_placement(&self, player: &PlayerId, deck_len: usize) -> Option<usize> {
        let prompt = Prompt::BombPlacement { deck_size: deck_len as u32 };
        match self.ask(player, prompt).await? {
            Decision::Placement(depth) => Some(depth),
            _ => None,
        }
    }

    fn publish_state(&self, snapshot: &StateSnapshot) {
        self.broadcast(ServerMessage::State(snapshot.clone()));
    }

    fn publish_events(&self, events: &[GameEvent]) {
        self.broadcast(ServerMessage::Events { events: events.to_vec() });
    }

    fn show_hand(&self, player: &PlayerId, hand: &[Card]) {
        self.notify(player, ServerMessage::Hand { cards: hand.to_vec() });
    }

    fn reveal_future(&self, player: &PlayerId, cards: &[Card]) {
        self.notify(player, ServerMessage::Future { cards: cards.to_vec() });
    }

    fn announce_winner(&self, winner: &PlayerId) {
        self.broadcast(ServerMessage::GameOver { winner_id: winner.clone() });
    }
}
