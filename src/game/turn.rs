//! Turn Orchestrator
//!
//! Drives one match from the first turn to the winner. Each turn walks a
//! small state machine:
//!
//! ```text
//! AwaitingAction ──▶ ResolvingAction ──▶ TurnAdvance
//!       │                  │                 ▲
//!       ▼                  ▼                 │
//!   DrawPhase ◀────────────┘─────────────────┘──▶ GameOver
//! ```

use std::sync::Arc;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use tracing::{debug, info, instrument, warn};

use crate::game::decision::{bounded, Decisions, PlayerAction};
use crate::game::error::GameError;
use crate::game::events::GameEvent;
use crate::game::player::PlayerId;
use crate::game::resolve::PlayOutcome;
use crate::game::state::{DrawReport, EliminationRule, Game};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// How the candidates of one Nope frame are asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NopePolling {
    /// One at a time, in seating order.
    #[default]
    Sequential,
    /// All at once; the earliest seat that said yes wins.
    Concurrent,
}

/// Match configuration.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Cards dealt to each player before bombs go in
    pub hand_size: usize,

    /// Deadline for every decision request
    pub decision_timeout: Duration,

    /// Cards shown by SeeTheFuture
    pub peek_depth: usize,

    /// Plays allowed before the mandatory draw
    pub plays_per_turn: u32,

    /// Nope frame polling mode
    pub nope_polling: NopePolling,

    /// Shuffle the pile after a defused bomb goes back in
    pub shuffle_after_defuse: bool,

    /// End-of-match rule
    pub elimination_rule: EliminationRule,

    /// Seat that takes the first turn (random when `None`)
    pub starting_seat: Option<usize>,

    /// RNG seed (derived from the match id and players when `None`)
    pub seed: Option<u64>,

    /// Minimum players per match
    pub min_players: usize,

    /// Maximum players per match
    pub max_players: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            hand_size: 4,
            decision_timeout: Duration::from_secs(5),
            peek_depth: 3,
            plays_per_turn: 1,
            nope_polling: NopePolling::Sequential,
            shuffle_after_defuse: true,
            elimination_rule: EliminationRule::LastPlayerStanding,
            starting_seat: None,
            seed: None,
            min_players: 2,
            max_players: 5,
        }
    }
}

// =============================================================================
// TURN STATE MACHINE
// =============================================================================

/// Phase of the turn being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the current player's action.
    AwaitingAction,
    /// Applying a validated action.
    ResolvingAction(PlayerAction),
    /// Mandatory draw.
    DrawPhase,
    /// Passing the turn on.
    TurnAdvance,
    /// Terminal.
    GameOver,
}

/// Summary of one played turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Whose turn it was.
    pub player_id: PlayerId,
    /// Outcomes of the plays made, in order.
    pub plays: Vec<PlayOutcome>,
    /// The draw phase, if one ran.
    pub draw: Option<DrawReport>,
    /// The match ended with this turn.
    pub game_over: bool,
}

/// A running match: the game, its configuration and its decision source.
pub struct Match {
    game: Game,
    config: MatchConfig,
    decisions: Arc<dyn Decisions>,
    /// Events already forwarded to clients
    events_sent: u32,
}

impl Match {
    /// Seat players under a fresh match id, deal and arm the deck.
    pub fn create(
        player_ids: Vec<PlayerId>,
        config: MatchConfig,
        decisions: Arc<dyn Decisions>,
    ) -> Result<Self, GameError> {
        Self::with_id(*uuid::Uuid::new_v4().as_bytes(), player_ids, config, decisions)
    }

    /// Like [`Match::create`] with a fixed match id.
    pub fn with_id(
        match_id: [u8; 16],
        player_ids: Vec<PlayerId>,
        config: MatchConfig,
        decisions: Arc<dyn Decisions>,
    ) -> Result<Self, GameError> {
        let mut game = Game::new(match_id, player_ids, &config)?;
        game.setup(config.hand_size)?;
        Ok(Self::from_game(game, config, decisions))
    }

    /// Wrap an already prepared game.
    pub fn from_game(game: Game, config: MatchConfig, decisions: Arc<dyn Decisions>) -> Self {
        Self { game, config, decisions, events_sent: 0 }
    }

    /// Read-only game state.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Match configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Play turns until the match ends and return the winner.
    #[instrument(skip_all, fields(match_id = %hex::encode(&self.game.match_id[..4])))]
    pub async fn run_to_completion(mut self) -> Result<PlayerId, GameError> {
        info!(players = self.game.live_count(), "match started");

        if self.game.is_game_over() {
            self.conclude();
        } else {
            while !self.play_turn().await?.game_over {}
        }

        let winner = self.game.winner().cloned().ok_or(GameError::NoPlayers)?;
        info!(winner = %winner, turns = self.game.turn_count(), "match finished");
        Ok(winner)
    }

    /// Play the current player's turn.
    pub async fn play_turn(&mut self) -> Result<TurnReport, GameError> {
        let actor = self.game.current_player_id().cloned().ok_or(GameError::NoPlayers)?;
        let mut report = TurnReport {
            player_id: actor.clone(),
            plays: Vec::new(),
            draw: None,
            game_over: false,
        };

        let mut phase = TurnPhase::AwaitingAction;
        loop {
            phase = match phase {
                TurnPhase::AwaitingAction => {
                    if report.plays.len() as u32 >= self.config.plays_per_turn {
                        TurnPhase::DrawPhase
                    } else {
                        self.publish(&actor);
                        let action = bounded(
                            self.config.decision_timeout,
                            "action",
                            &actor,
                            self.decisions.request_action(&actor),
                        )
                        .await
                        .flatten();

                        match action.and_then(|a| self.validate(&actor, a)) {
                            Some(action) => TurnPhase::ResolvingAction(action),
                            None => TurnPhase::DrawPhase,
                        }
                    }
                }

                TurnPhase::ResolvingAction(action) => {
                    let decisions = self.decisions.as_ref();
                    let outcome = match action {
                        PlayerAction::Play(index) => {
                            self.game.play_card(&actor, index, decisions, &self.config).await?
                        }
                        PlayerAction::PlayPair(first, second) => {
                            self.game.play_pair(&actor, first, second, decisions, &self.config).await?
                        }
                        PlayerAction::Pass => PlayOutcome::default(),
                    };
                    report.plays.push(outcome);

                    if outcome.ends_turn {
                        TurnPhase::TurnAdvance
                    } else {
                        TurnPhase::AwaitingAction
                    }
                }

                TurnPhase::DrawPhase => {
                    let draw = self.game.draw_phase(self.decisions.as_ref(), &self.config).await?;
                    report.draw = Some(draw);
                    TurnPhase::TurnAdvance
                }

                TurnPhase::TurnAdvance => {
                    if self.game.is_game_over() {
                        TurnPhase::GameOver
                    } else {
                        self.game.advance_turn();
                        break;
                    }
                }

                TurnPhase::GameOver => {
                    self.conclude();
                    report.game_over = true;
                    break;
                }
            };
        }

        debug!(player = %actor, plays = report.plays.len(), drew = report.draw.is_some(), "turn played");
        Ok(report)
    }

    /// Check a client action against the actor's hand.
    ///
    /// Anything that cannot be played is treated as a pass.
    fn validate(&self, actor: &PlayerId, action: PlayerAction) -> Option<PlayerAction> {
        let player = self.game.player(actor)?;
        let valid = match action {
            PlayerAction::Pass => return None,
            PlayerAction::Play(index) => player.card_at(index).is_some_and(|c| c.kind.is_playable_alone()),
            PlayerAction::PlayPair(first, second) => {
                first != second
                    && matches!(
                        (player.card_at(first), player.card_at(second)),
                        (Some(a), Some(b)) if a.pairs_with(&b)
                    )
            }
        };

        if !valid {
            warn!(player = %actor, ?action, hand = player.hand_len(), "invalid action, treating as pass");
            return None;
        }
        Some(action)
    }

    fn publish(&mut self, actor: &PlayerId) {
        self.flush_events();
        self.decisions.publish_state(&self.game.snapshot());
        if let Some(player) = self.game.player(actor) {
            self.decisions.show_hand(actor, player.hand());
        }
    }

    fn flush_events(&mut self) {
        let fresh: Vec<GameEvent> = self.game.events_since(self.events_sent).iter().map(GameEvent::redacted).collect();
        if let Some(last) = fresh.last() {
            self.events_sent = last.seq + 1;
            self.decisions.publish_events(&fresh);
        }
    }

    fn conclude(&mut self) {
        self.game.finish();
        self.flush_events();
        if let Some(winner) = self.game.winner() {
            self.decisions.announce_winner(winner);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
