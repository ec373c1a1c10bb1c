//! Scripted decision source and table builders for engine tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::game::card::{Card, CardKind};
use crate::game::deck::Deck;
use crate::game::events::GameEvent;
use crate::game::decision::{Decisions, PlayerAction};
use crate::game::player::{Player, PlayerId};
use crate::game::state::{Game, StateSnapshot};
use crate::game::turn::MatchConfig;

/// Short deadline, fixed seed, first seat starts.
pub(crate) fn quick_config() -> MatchConfig {
    MatchConfig {
        decision_timeout: Duration::from_millis(50),
        starting_seat: Some(0),
        seed: Some(7),
        ..MatchConfig::default()
    }
}

pub(crate) fn hand(kinds: &[CardKind]) -> Vec<Card> {
    kinds.iter().copied().map(Card::new).collect()
}

/// A game with the given hands and draw pile (bottom-to-top), seat 0 to act.
pub(crate) fn rigged(seats: &[(&str, Vec<Card>)], deck: Vec<Card>) -> Game {
    let players = seats
        .iter()
        .map(|(id, cards)| {
            let mut player = Player::new(PlayerId::from(*id));
            for card in cards {
                player.add_card(*card);
            }
            player
        })
        .collect();
    Game::from_layout([0; 16], players, Deck::from_cards(deck), &quick_config()).unwrap()
}

/// Answers from per-player queues; anything unscripted is a no.
#[derive(Default)]
pub(crate) struct Scripted {
    actions: Mutex<BTreeMap<PlayerId, VecDeque<PlayerAction>>>,
    nopes: Mutex<BTreeMap<PlayerId, VecDeque<bool>>>,
    targets: BTreeMap<PlayerId, PlayerId>,
    card_choices: BTreeMap<PlayerId, usize>,
    placement: Option<usize>,
    hung: BTreeSet<PlayerId>,
    delays: BTreeMap<PlayerId, Duration>,

    nope_log: Mutex<Vec<PlayerId>>,
    snapshots: Mutex<Vec<StateSnapshot>>,
    futures: Mutex<Vec<Vec<Card>>>,
    events: Mutex<Vec<GameEvent>>,
    winner: Mutex<Option<PlayerId>>,
}

impl Scripted {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn action(mut self, who: &str, action: PlayerAction) -> Self {
        self.actions.get_mut().unwrap().entry(who.into()).or_default().push_back(action);
        self
    }

    pub(crate) fn nope(mut self, who: &str, answer: bool) -> Self {
        self.nopes.get_mut().unwrap().entry(who.into()).or_default().push_back(answer);
        self
    }

    pub(crate) fn target(mut self, who: &str, target: &str) -> Self {
        self.targets.insert(who.into(), target.into());
        self
    }

    pub(crate) fn card_choice(mut self, who: &str, index: usize) -> Self {
        self.card_choices.insert(who.into(), index);
        self
    }

    pub(crate) fn placement(mut self, depth: usize) -> Self {
        self.placement = Some(depth);
        self
    }

    /// Every request to this player never answers.
    pub(crate) fn hang(mut self, who: &str) -> Self {
        self.hung.insert(who.into());
        self
    }

    /// Every request to this player answers after `delay`.
    pub(crate) fn delay(mut self, who: &str, delay: Duration) -> Self {
        self.delays.insert(who.into(), delay);
        self
    }

    pub(crate) fn nope_log(&self) -> Vec<PlayerId> {
        self.nope_log.lock().unwrap().clone()
    }

    pub(crate) fn snapshots(&self) -> Vec<StateSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub(crate) fn futures_seen(&self) -> Vec<Vec<Card>> {
        self.futures.lock().unwrap().clone()
    }

    pub(crate) fn events_seen(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn winner(&self) -> Option<PlayerId> {
        self.winner.lock().unwrap().clone()
    }

    async fn stall(&self, player: &PlayerId) {
        if self.hung.contains(player) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delays.get(player) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait::async_trait]
impl Decisions for Scripted {
    async fn request_action(&self, player: &PlayerId) -> Option<PlayerAction> {
        self.stall(player).await;
        self.actions.lock().unwrap().get_mut(player).and_then(|q| q.pop_front())
    }

    async fn request_nope(&self, player: &PlayerId, _challenged: Card) -> bool {
        self.nope_log.lock().unwrap().push(player.clone());
        self.stall(player).await;
        self.nopes
            .lock()
            .unwrap()
            .get_mut(player)
            .and_then(|q| q.pop_front())
            .unwrap_or(false)
    }

    async fn request_favor_target(&self, player: &PlayerId) -> Option<PlayerId> {
        self.stall(player).await;
        self.targets.get(player).cloned()
    }

    async fn request_card_choice(&self, player: &PlayerId, _target: &PlayerId, _hand_len: usize) -> Option<usize> {
        self.stall(player).await;
        self.card_choices.get(player).copied()
    }

    async fn request_bomb_placement(&self, player: &PlayerId, _deck_len: usize) -> Option<usize> {
        self.stall(player).await;
        self.placement
    }

    fn publish_state(&self, snapshot: &StateSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }

    fn publish_events(&self, events: &[GameEvent]) {
        self.events.lock().unwrap().extend_from_slice(events);
    }

    fn reveal_future(&self, _player: &PlayerId, cards: &[Card]) {
        self.futures.lock().unwrap().push(cards.to_vec());
    }

    fn announce_winner(&self, winner: &PlayerId) {
        *self.winner.lock().unwrap() = Some(winner.clone());
    }
}
