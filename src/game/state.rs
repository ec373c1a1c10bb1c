//! Game State Machine
//!
//! Owns the seats, the draw pile, the discard pile and the turn pointer.
//! Card plays live in `resolve`; the per-turn loop lives in `turn`.

use serde::{Serialize, Deserialize};
use tracing::{debug, error, info};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::{derive_match_seed, DeterministicRng};
use crate::game::card::{Card, CardKind};
use crate::game::deck::Deck;
use crate::game::decision::{bounded, Decisions};
use crate::game::error::GameError;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::player::{Player, PlayerId};
use crate::game::turn::MatchConfig;

// =============================================================================
// ELIMINATION RULE
// =============================================================================

/// When does the match end?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationRule {
    /// Play until one player is left.
    #[default]
    LastPlayerStanding,
    /// Stop once this many players have exploded (or one is left).
    FixedCount(usize),
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Public hand size of one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSize {
    /// Seat owner.
    pub player_id: PlayerId,
    /// Cards held.
    pub cards: u32,
}

/// Serializable public view of a game, published every turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Match identifier (UUID string).
    pub match_id: String,
    /// Player whose turn it is.
    pub current_player: Option<PlayerId>,
    /// Turns completed so far.
    pub turn_count: u32,
    /// Hand sizes in seating order.
    pub hand_sizes: Vec<HandSize>,
    /// Top of the discard pile.
    pub discard_top: Option<Card>,
    /// Cards left in the draw pile.
    pub deck_size: u32,
    /// Extra draws owed by the current player.
    pub pending_attack_draws: u32,
    /// Exploded players, in elimination order.
    pub eliminated: Vec<PlayerId>,
    /// Hex state hash.
    pub state_hash: String,
}

impl StateSnapshot {
    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

// =============================================================================
// DRAW REPORT
// =============================================================================

/// What happened during one draw phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Cards drawn, bombs included.
    pub drawn: u32,
    /// Bombs defused.
    pub defused: u32,
    /// Did the drawer explode?
    pub eliminated: bool,
}

// =============================================================================
// GAME
// =============================================================================

/// Complete state of one match.
#[derive(Clone, Debug)]
pub struct Game {
    /// Match identifier
    pub match_id: [u8; 16],

    /// RNG seed (for replays). Server-side only: anyone holding it can
    /// recompute the deck order.
    pub rng_seed: u64,

    pub(crate) rng: DeterministicRng,

    /// Live players in seating order
    pub(crate) players: Vec<Player>,

    /// Exploded players in elimination order
    pub(crate) eliminated: Vec<Player>,

    pub(crate) deck: Deck,

    pub(crate) discard_pile: Vec<Card>,

    pub(crate) current_index: usize,

    /// Set when the current player exploded; the next advance must not
    /// step past the seat that slid into their place.
    current_exploded: bool,

    pub(crate) turn_count: u32,

    pub(crate) pending_attack_draws: u32,

    pub(crate) last_played: Option<Card>,

    starting_count: usize,

    elimination_rule: EliminationRule,

    events: Vec<GameEvent>,
}

impl Game {
    /// Seat players around a fresh, unshuffled standard deck.
    ///
    /// Call [`Game::setup`] before the first turn.
    pub fn new(match_id: [u8; 16], player_ids: Vec<PlayerId>, config: &MatchConfig) -> Result<Self, GameError> {
        let players = player_ids.into_iter().map(Player::new).collect();
        Self::from_layout(match_id, players, Deck::standard(), config)
    }

    /// Build a game from prepared hands and a prepared draw pile.
    ///
    /// No cards are dealt and nothing is shuffled.
    pub fn from_layout(
        match_id: [u8; 16],
        players: Vec<Player>,
        deck: Deck,
        config: &MatchConfig,
    ) -> Result<Self, GameError> {
        let count = players.len();
        if count < config.min_players || count > config.max_players {
            return Err(GameError::InvalidPlayerCount {
                count,
                min: config.min_players,
                max: config.max_players,
            });
        }
        for (i, p) in players.iter().enumerate() {
            if players[..i].iter().any(|q| q.id == p.id) {
                return Err(GameError::DuplicatePlayer(p.id.clone()));
            }
        }

        let rng_seed = config.seed.unwrap_or_else(|| {
            let secret = *uuid::Uuid::new_v4().as_bytes();
            let ids: Vec<&str> = players.iter().map(|p| p.id.as_str()).collect();
            derive_match_seed(&match_id, &secret, &ids)
        });
        let mut rng = DeterministicRng::new(rng_seed);
        let current_index = match config.starting_seat {
            Some(seat) => seat % count,
            None => rng.next_index(count),
        };

        Ok(Self {
            match_id,
            rng_seed,
            rng,
            players,
            eliminated: Vec::new(),
            deck,
            discard_pile: Vec::new(),
            current_index,
            current_exploded: false,
            turn_count: 0,
            pending_attack_draws: 0,
            last_played: None,
            starting_count: count,
            elimination_rule: config.elimination_rule,
            events: Vec::new(),
        })
    }

    /// Deal, add one bomb fewer than players, shuffle, hand out Defuses.
    pub fn setup(&mut self, hand_size: usize) -> Result<(), GameError> {
        self.deal(hand_size)?;
        let bombs = self.players.len().saturating_sub(1);
        self.deck.inject_bombs(bombs);
        self.deck.shuffle(&mut self.rng);
        self.give_defuses();
        info!(
            match_id = %hex::encode(&self.match_id[..4]),
            players = self.players.len(),
            bombs,
            deck = self.deck.len(),
            "match set up"
        );
        Ok(())
    }

    /// Give every player `hand_size` cards from the top of the pile.
    pub fn deal(&mut self, hand_size: usize) -> Result<(), GameError> {
        let needed = hand_size * self.players.len();
        if needed > self.deck.len() {
            return Err(GameError::InsufficientDeck { needed, available: self.deck.len() });
        }
        self.deck.shuffle(&mut self.rng);
        for player in &mut self.players {
            for _ in 0..hand_size {
                player.add_card(self.deck.draw()?);
            }
        }
        Ok(())
    }

    /// Give every live player one Defuse.
    pub fn give_defuses(&mut self) {
        for player in &mut self.players {
            player.add_card(Card::new(CardKind::Defuse));
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Live players in seating order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Exploded players in elimination order.
    pub fn eliminated(&self) -> &[Player] {
        &self.eliminated
    }

    /// The draw pile.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The discard pile, oldest first.
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    /// Seat index of the current player.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The current player.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_index)
    }

    /// Id of the current player.
    pub fn current_player_id(&self) -> Option<&PlayerId> {
        self.current_player().map(|p| &p.id)
    }

    /// Turns completed so far.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Extra draws owed by the current player.
    pub fn pending_attack_draws(&self) -> u32 {
        self.pending_attack_draws
    }

    /// Most recently played card (Nopes included).
    pub fn last_played(&self) -> Option<Card> {
        self.last_played
    }

    /// Number of players still in.
    pub fn live_count(&self) -> usize {
        self.players.len()
    }

    /// Number of players seated at the start.
    pub fn starting_count(&self) -> usize {
        self.starting_count
    }

    /// Live player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Seat index of a live player.
    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    /// Every event recorded so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events with a sequence number of at least `seq`.
    pub fn events_since(&self, seq: u32) -> &[GameEvent] {
        let start = (seq as usize).min(self.events.len());
        &self.events[start..]
    }

    /// Total cards in hands (eliminated included), deck and discard.
    pub fn card_total(&self) -> usize {
        self.players.iter().chain(&self.eliminated).map(|p| p.hand_len()).sum::<usize>()
            + self.deck.len()
            + self.discard_pile.len()
    }

    pub(crate) fn record(&mut self, data: GameEventData) {
        let seq = self.events.len() as u32;
        self.events.push(GameEvent::new(seq, self.turn_count, data));
    }

    // =========================================================================
    // Turn flow
    // =========================================================================

    /// Draw `1 + pending_attack_draws` cards for the current player.
    ///
    /// Each card is checked for a bomb as it is drawn. A drawer without a
    /// Defuse explodes and the rest of the phase is abandoned. Pending attack
    /// draws are cleared either way.
    pub async fn draw_phase(&mut self, decisions: &dyn Decisions, config: &MatchConfig) -> Result<DrawReport, GameError> {
        let seat = self.current_index;
        let drawer = self.players.get(seat).map(|p| p.id.clone()).ok_or(GameError::NoPlayers)?;
        let draws = 1 + self.pending_attack_draws;
        self.pending_attack_draws = 0;

        let mut report = DrawReport::default();
        for _ in 0..draws {
            let card = self.deck.draw().inspect_err(|e| {
                error!(player = %drawer, turn = self.turn_count, "mandatory draw failed: {}", e);
            })?;
            report.drawn += 1;

            if !card.is_bomb() {
                self.players[seat].add_card(card);
                self.record(GameEventData::CardDrawn { player_id: drawer.clone() });
                continue;
            }

            let Some(defuse_at) = self.players[seat].find_kind(CardKind::Defuse) else {
                self.discard_pile.push(card);
                self.eliminate_current();
                report.eliminated = true;
                break;
            };

            let defuse = self.players[seat].remove_card_at(defuse_at)?;
            self.discard_pile.push(defuse);

            let deck_len = self.deck.len();
            let depth = bounded(
                config.decision_timeout,
                "bomb placement",
                &drawer,
                decisions.request_bomb_placement(&drawer, deck_len),
            )
            .await
            .flatten()
            .unwrap_or(0);

            self.deck.insert_at(card, depth);
            if config.shuffle_after_defuse {
                self.deck.shuffle(&mut self.rng);
            }
            report.defused += 1;
            debug!(player = %drawer, depth, "bomb defused");
            self.record(GameEventData::BombDefused { player_id: drawer.clone(), depth: Some(depth as u32) });
        }

        Ok(report)
    }

    /// Move the current player to the eliminated list.
    ///
    /// The seat index is left pointing at whoever slid into the vacated seat.
    fn eliminate_current(&mut self) {
        let player = self.players.remove(self.current_index);
        let placement = (self.players.len() + 1) as u8;
        info!(player = %player.id, placement, "player exploded");
        self.record(GameEventData::PlayerEliminated { player_id: player.id.clone(), placement });
        self.eliminated.push(player);

        if self.current_index >= self.players.len() {
            self.current_index = 0;
        }
        self.current_exploded = true;
    }

    /// Pass the turn to the next live player.
    pub fn advance_turn(&mut self) {
        if self.players.is_empty() {
            return;
        }
        if self.current_exploded {
            self.current_exploded = false;
            self.current_index %= self.players.len();
        } else {
            self.current_index = (self.current_index + 1) % self.players.len();
        }
        self.turn_count += 1;

        let next = self.players[self.current_index].id.clone();
        self.record(GameEventData::TurnAdvanced { player_id: next });
    }

    /// Has the match reached its end?
    pub fn is_game_over(&self) -> bool {
        let live = self.players.len();
        match self.elimination_rule {
            EliminationRule::LastPlayerStanding => live <= 1,
            EliminationRule::FixedCount(limit) => live <= 1 || self.eliminated.len() >= limit,
        }
    }

    /// The winner, once the match is over.
    ///
    /// Under a fixed elimination count with several survivors, the player
    /// holding the turn wins.
    pub fn winner(&self) -> Option<&PlayerId> {
        if !self.is_game_over() {
            return None;
        }
        match self.players.as_slice() {
            [only] => Some(&only.id),
            _ => self.current_player_id(),
        }
    }

    pub(crate) fn finish(&mut self) {
        let winner_id = self.winner().cloned();
        let turns = self.turn_count;
        self.record(GameEventData::GameEnded { winner_id, turns });
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Public snapshot for clients.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            match_id: uuid::Uuid::from_bytes(self.match_id).to_string(),
            current_player: self.current_player_id().cloned(),
            turn_count: self.turn_count,
            hand_sizes: self
                .players
                .iter()
                .map(|p| HandSize { player_id: p.id.clone(), cards: p.hand_len() as u32 })
                .collect(),
            discard_top: self.discard_pile.last().copied(),
            deck_size: self.deck.len() as u32,
            pending_attack_draws: self.pending_attack_draws,
            eliminated: self.eliminated.iter().map(|p| p.id.clone()).collect(),
            state_hash: hex::encode(self.compute_hash()),
        }
    }

    /// Hash of the full state, hidden cards included.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.turn_count, self.rng_seed, |hasher| {
            for player in &self.players {
                hasher.update_str(player.id.as_str());
                hasher.update_u32(player.hand_len() as u32);
                for card in player.hand() {
                    hasher.update_u8(card.kind.code());
                }
            }
            for player in &self.eliminated {
                hasher.update_str(player.id.as_str());
            }

            hasher.update_u32(self.deck.len() as u32);
            for card in self.deck.cards() {
                hasher.update_u8(card.kind.code());
            }
            hasher.update_u32(self.discard_pile.len() as u32);

            hasher.update_u32(self.current_index as u32);
            hasher.update_u32(self.pending_attack_draws);
            hasher.update_bool(self.current_exploded);
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::testing::{hand, quick_config, rigged, Scripted};

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    #[test]
    fn test_player_count_bounds() {
        let config = MatchConfig::default();
        assert!(matches!(
            Game::new([0; 16], ids(&["a"]), &config),
            Err(GameError::InvalidPlayerCount { count: 1, .. })
        ));
        assert!(matches!(
            Game::new([0; 16], ids(&["a", "b", "c", "d", "e", "f"]), &config),
            Err(GameError::InvalidPlayerCount { count: 6, .. })
        ));
        assert!(matches!(
            Game::new([0; 16], ids(&["a", "a"]), &config),
            Err(GameError::DuplicatePlayer(_))
        ));
    }

    #[test]
    fn test_deal_sums_hand_sizes() {
        let config = quick_config();
        let mut game = Game::new([1; 16], ids(&["a", "b", "c", "d"]), &config).unwrap();
        let before = game.deck().len();

        game.deal(4).unwrap();

        let dealt: usize = game.players().iter().map(|p| p.hand_len()).sum();
        assert_eq!(dealt, 4 * 4);
        assert_eq!(game.deck().len(), before - 16);
    }

    #[test]
    fn test_setup_injects_one_bomb_fewer_than_players() {
        let config = quick_config();
        for n in 2..=5 {
            let names: Vec<String> = (0..n).map(|i| format!("p{}", i)).collect();
            let players = names.iter().map(|s| PlayerId::new(s.clone())).collect();
            let mut game = Game::new([2; 16], players, &config).unwrap();
            let standard = game.deck().len();

            game.setup(4).unwrap();

            assert_eq!(game.deck().count_kind(CardKind::ExplodingKitten), n - 1);
            assert_eq!(game.deck().len(), standard - 4 * n + (n - 1));
            assert!(game.players().iter().all(|p| p.has_defuse()));
            assert!(game.players().iter().all(|p| p.hand_len() == 5));
        }
    }

    #[test]
    fn test_deal_fails_on_short_deck() {
        let config = quick_config();
        let mut game = Game::new([1; 16], ids(&["a", "b"]), &config).unwrap();
        assert!(matches!(game.deal(30), Err(GameError::InsufficientDeck { needed: 60, .. })));
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let config = MatchConfig { seed: Some(42), ..quick_config() };
        let mut g1 = Game::new([3; 16], ids(&["a", "b", "c"]), &config).unwrap();
        let mut g2 = Game::new([3; 16], ids(&["a", "b", "c"]), &config).unwrap();
        g1.setup(4).unwrap();
        g2.setup(4).unwrap();

        assert_eq!(g1.rng_seed, g2.rng_seed);
        assert_eq!(g1.compute_hash(), g2.compute_hash());
    }

    #[test]
    fn test_deck_not_recoverable_from_snapshot() {
        let config = MatchConfig { seed: None, starting_seat: None, ..quick_config() };
        let players = ids(&["a", "b", "c", "d"]);
        let mut real = Game::new(*uuid::Uuid::new_v4().as_bytes(), players.clone(), &config).unwrap();
        real.setup(4).unwrap();

        // Everything a client sees: the match id and the seating
        let snapshot = real.snapshot();
        let match_id = *uuid::Uuid::parse_str(&snapshot.match_id).unwrap().as_bytes();
        let seen: Vec<PlayerId> = snapshot.hand_sizes.iter().map(|h| h.player_id.clone()).collect();
        assert_eq!(seen, players);

        let mut guess = Game::new(match_id, seen, &config).unwrap();
        guess.setup(4).unwrap();

        assert_ne!(guess.rng_seed, real.rng_seed);
        assert_ne!(guess.deck().cards(), real.deck().cards());
    }

    #[tokio::test]
    async fn test_draw_safe_card() {
        let mut game = rigged(&[("a", vec![]), ("b", vec![])], vec![Card::number(1), Card::number(2)]);
        let decisions = Scripted::new();

        let report = game.draw_phase(&decisions, &quick_config()).await.unwrap();

        assert_eq!(report, DrawReport { drawn: 1, defused: 0, eliminated: false });
        assert_eq!(game.players()[0].hand(), &[Card::number(2)]);
        assert_eq!(game.deck().len(), 1);
    }

    #[tokio::test]
    async fn test_defuse_returns_bomb_and_keeps_deck_size() {
        let bomb = Card::new(CardKind::ExplodingKitten);
        let mut game = rigged(
            &[("a", hand(&[CardKind::Defuse, CardKind::Skip])), ("b", vec![])],
            vec![Card::number(1), Card::number(2), bomb],
        );
        let before = game.deck().len();
        let total = game.card_total();
        let decisions = Scripted::new();

        let report = game.draw_phase(&decisions, &quick_config()).await.unwrap();

        assert_eq!(report.defused, 1);
        assert!(!report.eliminated);
        assert_eq!(game.deck().len(), before);
        assert_eq!(game.deck().count_kind(CardKind::ExplodingKitten), 1);
        assert!(!game.players()[0].has_defuse());
        assert_eq!(game.discard_pile().last().map(|c| c.kind), Some(CardKind::Defuse));
        assert_eq!(game.live_count(), 2);
        assert_eq!(game.card_total(), total);
    }

    #[tokio::test]
    async fn test_bomb_placement_is_requested() {
        let bomb = Card::new(CardKind::ExplodingKitten);
        let mut game = rigged(
            &[("a", hand(&[CardKind::Defuse])), ("b", vec![])],
            vec![Card::number(1), Card::number(2), Card::number(3), bomb],
        );
        let decisions = Scripted::new().placement(2);
        let config = MatchConfig { shuffle_after_defuse: false, ..quick_config() };

        game.draw_phase(&decisions, &config).await.unwrap();

        assert!(game.deck().peek(3)[2].is_bomb());
    }

    #[tokio::test]
    async fn test_no_defuse_eliminates() {
        let bomb = Card::new(CardKind::ExplodingKitten);
        let mut game = rigged(
            &[("a", vec![]), ("b", hand(&[CardKind::Nope])), ("c", vec![])],
            vec![Card::number(1), bomb],
        );
        game.current_index = 1;
        let decisions = Scripted::new();

        let report = game.draw_phase(&decisions, &quick_config()).await.unwrap();

        assert!(report.eliminated);
        assert_eq!(game.live_count(), 2);
        assert_eq!(game.eliminated().len(), 1);
        assert_eq!(game.eliminated()[0].id, PlayerId::from("b"));
        assert!(game.player(&PlayerId::from("b")).is_none());
        // Seat 1 is now "c"; the advance must not skip them
        game.advance_turn();
        assert_eq!(game.current_player_id(), Some(&PlayerId::from("c")));
    }

    #[tokio::test]
    async fn test_last_seat_elimination_wraps() {
        let bomb = Card::new(CardKind::ExplodingKitten);
        let mut game = rigged(&[("a", vec![]), ("b", vec![]), ("c", vec![])], vec![Card::number(1), bomb]);
        game.current_index = 2;

        game.draw_phase(&Scripted::new(), &quick_config()).await.unwrap();
        assert_eq!(game.current_index(), 0);

        game.advance_turn();
        assert_eq!(game.current_player_id(), Some(&PlayerId::from("a")));
    }

    #[tokio::test]
    async fn test_attack_draws_and_reset() {
        let mut game = rigged(
            &[("a", vec![]), ("b", vec![])],
            vec![Card::number(1), Card::number(2), Card::number(3), Card::number(4)],
        );
        game.pending_attack_draws = 2;

        let report = game.draw_phase(&Scripted::new(), &quick_config()).await.unwrap();

        assert_eq!(report.drawn, 3);
        assert_eq!(game.players()[0].hand_len(), 3);
        assert_eq!(game.pending_attack_draws(), 0);
    }

    #[tokio::test]
    async fn test_explosion_abandons_remaining_draws() {
        let bomb = Card::new(CardKind::ExplodingKitten);
        let mut game = rigged(
            &[("a", vec![]), ("b", vec![]), ("c", vec![])],
            vec![Card::number(1), Card::number(2), bomb],
        );
        game.pending_attack_draws = 2;

        let report = game.draw_phase(&Scripted::new(), &quick_config()).await.unwrap();

        assert_eq!(report.drawn, 1);
        assert!(report.eliminated);
        assert_eq!(game.deck().len(), 2);
        assert_eq!(game.pending_attack_draws(), 0);
    }

    #[tokio::test]
    async fn test_empty_deck_is_an_error() {
        let mut game = rigged(&[("a", vec![]), ("b", vec![])], vec![]);
        let result = game.draw_phase(&Scripted::new(), &quick_config()).await;
        assert_eq!(result, Err(GameError::EmptyDeck));
    }

    #[test]
    fn test_advance_turn_wraps_and_counts() {
        let mut game = rigged(&[("a", vec![]), ("b", vec![]), ("c", vec![])], vec![]);
        game.current_index = 2;

        game.advance_turn();

        assert_eq!(game.current_index(), 0);
        assert_eq!(game.turn_count(), 1);
    }

    #[test]
    fn test_game_over_rules() {
        let mut game = rigged(&[("a", vec![]), ("b", vec![]), ("c", vec![])], vec![]);
        assert!(!game.is_game_over());
        assert!(game.winner().is_none());

        let gone = game.players.remove(0);
        game.eliminated.push(gone);
        assert!(!game.is_game_over());

        game.elimination_rule = EliminationRule::FixedCount(1);
        assert!(game.is_game_over());
        assert_eq!(game.winner(), game.current_player_id());

        game.elimination_rule = EliminationRule::LastPlayerStanding;
        let gone = game.players.remove(0);
        game.eliminated.push(gone);
        game.current_index = 0;
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(&PlayerId::from("c")));
    }

    #[test]
    fn test_snapshot_view() {
        let mut game = rigged(
            &[("a", hand(&[CardKind::Skip, CardKind::Nope])), ("b", vec![])],
            vec![Card::number(1)],
        );
        game.discard_pile.push(Card::new(CardKind::Attack));

        let snap = game.snapshot();

        assert_eq!(snap.current_player, Some(PlayerId::from("a")));
        assert_eq!(snap.hand_sizes[0].cards, 2);
        assert_eq!(snap.hand_sizes[1].cards, 0);
        assert_eq!(snap.deck_size, 1);
        assert_eq!(snap.discard_top, Some(Card::new(CardKind::Attack)));
        assert_eq!(snap.state_hash.len(), 64);

        let bytes = snap.to_bytes().unwrap();
        assert_eq!(StateSnapshot::from_bytes(&bytes).unwrap(), snap);
    }
}
