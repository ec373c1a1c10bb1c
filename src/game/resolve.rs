//! Action Resolution
//!
//! Playing a card is three steps: discard it, give everyone a chance to Nope
//! it, then apply its effect if it survived.
//!
//! ## Nope Frames
//!
//! Each frame challenges one card. Live Nope holders are polled in seating
//! order, starting after whoever played the challenged card. The first yes
//! discards that player's Nope and opens a new frame challenging the Nope
//! itself. A frame nobody answers ends resolution, and the play is canceled
//! iff the number of Nopes is odd.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::game::card::{Card, CardKind};
use crate::game::decision::{bounded, Decisions};
use crate::game::error::GameError;
use crate::game::events::GameEventData;
use crate::game::player::PlayerId;
use crate::game::state::Game;
use crate::game::turn::{MatchConfig, NopePolling};

/// Result of playing a card or pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayOutcome {
    /// The play was Noped away (odd Nope count).
    pub canceled: bool,
    /// The turn ends now, without a draw.
    pub ends_turn: bool,
    /// Nopes played during resolution.
    pub nopes: u32,
}

impl Game {
    // =========================================================================
    // Plays
    // =========================================================================

    /// Play the card at `index` from `actor`'s hand.
    pub async fn play_card(
        &mut self,
        actor: &PlayerId,
        index: usize,
        decisions: &dyn Decisions,
        config: &MatchConfig,
    ) -> Result<PlayOutcome, GameError> {
        let seat = self.seat_of(actor)?;
        let card = self.players[seat].remove_card_at(index)?;
        self.discard_pile.push(card);
        self.last_played = Some(card);
        debug!(player = %actor, %card, "card played");
        self.record(GameEventData::CardPlayed { player_id: actor.clone(), card });

        let nopes = self.wait_for_nope(actor, card, decisions, config).await?;
        let canceled = nopes % 2 == 1;
        self.record(GameEventData::PlayResolved {
            player_id: actor.clone(),
            kind: card.kind,
            nopes,
            canceled,
        });
        if canceled {
            return Ok(PlayOutcome { canceled, ends_turn: false, nopes });
        }

        let ends_turn = self.apply_effect(actor, card.kind, decisions, config).await?;
        Ok(PlayOutcome { canceled, ends_turn, nopes })
    }

    /// Play two Number cards of equal rank to steal a card from a target.
    pub async fn play_pair(
        &mut self,
        actor: &PlayerId,
        first: usize,
        second: usize,
        decisions: &dyn Decisions,
        config: &MatchConfig,
    ) -> Result<PlayOutcome, GameError> {
        let seat = self.seat_of(actor)?;
        let player = &self.players[seat];
        let (a, b) = match (player.card_at(first), player.card_at(second)) {
            (Some(a), Some(b)) if first != second && a.pairs_with(&b) => (a, b),
            (None, _) => return Err(GameError::IndexOutOfRange { index: first, len: player.hand_len() }),
            (_, None) => return Err(GameError::IndexOutOfRange { index: second, len: player.hand_len() }),
            _ => return Err(GameError::NotAPair { first, second }),
        };

        // Higher index first so the lower one stays valid
        let (hi, lo) = if first > second { (first, second) } else { (second, first) };
        self.players[seat].remove_card_at(hi)?;
        self.players[seat].remove_card_at(lo)?;
        self.discard_pile.push(a);
        self.discard_pile.push(b);
        self.last_played = Some(b);
        let rank = a.rank().unwrap_or_default();
        debug!(player = %actor, rank, "pair played");
        self.record(GameEventData::PairPlayed { player_id: actor.clone(), rank });

        let nopes = self.wait_for_nope(actor, a, decisions, config).await?;
        let canceled = nopes % 2 == 1;
        self.record(GameEventData::PlayResolved {
            player_id: actor.clone(),
            kind: a.kind,
            nopes,
            canceled,
        });
        if !canceled {
            if let Some(target) = self.choose_target(actor, decisions, config).await {
                self.steal_blind(actor, &target, decisions, config).await?;
            }
        }

        Ok(PlayOutcome { canceled, ends_turn: false, nopes })
    }

    // =========================================================================
    // Nope resolution
    // =========================================================================

    /// Run Nope frames until one passes unanswered.
    ///
    /// Returns the number of Nopes played; the challenged play is canceled
    /// iff it is odd.
    pub async fn wait_for_nope(
        &mut self,
        actor: &PlayerId,
        card: Card,
        decisions: &dyn Decisions,
        config: &MatchConfig,
    ) -> Result<u32, GameError> {
        let mut nope_count = 0u32;
        let mut challenged_player = actor.clone();
        let mut challenged_card = card;

        loop {
            let candidates = self.nope_candidates(&challenged_player);
            if candidates.is_empty() {
                break;
            }

            let noper = match config.nope_polling {
                NopePolling::Sequential => poll_sequential(&candidates, challenged_card, decisions, config).await,
                NopePolling::Concurrent => poll_concurrent(&candidates, challenged_card, decisions, config).await,
            };
            let Some(noper) = noper else {
                break;
            };

            let seat = self.seat_of(&noper)?;
            let Some(at) = self.players[seat].find_kind(CardKind::Nope) else {
                break;
            };
            let nope = self.players[seat].remove_card_at(at)?;
            self.discard_pile.push(nope);
            self.last_played = Some(nope);
            nope_count += 1;
            debug!(player = %noper, depth = nope_count, challenged = %challenged_card, "nope");
            self.record(GameEventData::Noped { player_id: noper.clone(), depth: nope_count });

            challenged_player = noper;
            challenged_card = nope;
        }

        Ok(nope_count)
    }

    /// Live Nope holders in seating order after `challenged`, excluding them.
    pub fn nope_candidates(&self, challenged: &PlayerId) -> Vec<PlayerId> {
        let count = self.players.len();
        let start = self.player_index(challenged).unwrap_or(self.current_index);
        (1..count)
            .map(|offset| &self.players[(start + offset) % count])
            .filter(|p| p.has_nope())
            .map(|p| p.id.clone())
            .collect()
    }

    // =========================================================================
    // Effects
    // =========================================================================

    /// Apply an unchallenged card. Returns whether the turn ends now.
    async fn apply_effect(
        &mut self,
        actor: &PlayerId,
        kind: CardKind,
        decisions: &dyn Decisions,
        config: &MatchConfig,
    ) -> Result<bool, GameError> {
        match kind {
            CardKind::Shuffle => {
                self.deck.shuffle(&mut self.rng);
                self.record(GameEventData::DeckShuffled { player_id: Some(actor.clone()) });
                Ok(false)
            }
            CardKind::SeeTheFuture => {
                let top = self.deck.peek(config.peek_depth);
                decisions.reveal_future(actor, &top);
                self.record(GameEventData::FutureSeen {
                    player_id: actor.clone(),
                    count: top.len() as u32,
                });
                Ok(false)
            }
            CardKind::Attack => {
                self.pending_attack_draws += 1;
                self.record(GameEventData::AttackQueued {
                    player_id: actor.clone(),
                    pending_draws: self.pending_attack_draws,
                });
                Ok(true)
            }
            CardKind::Skip => Ok(true),
            CardKind::Favor => {
                if let Some(target) = self.choose_target(actor, decisions, config).await {
                    let target_seat = self.seat_of(&target)?;
                    if self.players[target_seat].hand_len() > 0 {
                        let card = self.players[target_seat].random_card(&mut self.rng)?;
                        self.transfer(card, &target, actor)?;
                    }
                }
                Ok(false)
            }
            CardKind::Nope | CardKind::Defuse | CardKind::ExplodingKitten | CardKind::Number(_) => Ok(false),
        }
    }

    /// Ask `actor` for a target, falling back to the next seat holding cards.
    async fn choose_target(
        &self,
        actor: &PlayerId,
        decisions: &dyn Decisions,
        config: &MatchConfig,
    ) -> Option<PlayerId> {
        let asked = bounded(
            config.decision_timeout,
            "favor target",
            actor,
            decisions.request_favor_target(actor),
        )
        .await
        .flatten();

        match asked {
            Some(target) if &target != actor && self.player(&target).is_some() => return Some(target),
            Some(target) => warn!(player = %actor, %target, "invalid target"),
            None => {}
        }

        let count = self.players.len();
        let start = self.player_index(actor)?;
        (1..count)
            .map(|offset| &self.players[(start + offset) % count])
            .find(|p| p.hand_len() > 0)
            .map(|p| p.id.clone())
    }

    /// `actor` draws a face-down card from `target`'s freshly shuffled hand.
    ///
    /// The shuffle keeps the pick uniform whatever position is asked for; a
    /// timeout or bad position takes a random card instead.
    async fn steal_blind(
        &mut self,
        actor: &PlayerId,
        target: &PlayerId,
        decisions: &dyn Decisions,
        config: &MatchConfig,
    ) -> Result<(), GameError> {
        let target_seat = self.seat_of(target)?;
        let len = self.players[target_seat].hand_len();
        if len == 0 {
            return Ok(());
        }
        self.players[target_seat].shuffle_hand(&mut self.rng);

        let choice = bounded(
            config.decision_timeout,
            "card choice",
            actor,
            decisions.request_card_choice(actor, target, len),
        )
        .await
        .flatten();

        let card = match choice {
            Some(index) if index < len => self.players[target_seat].remove_card_at(index)?,
            Some(index) => {
                warn!(player = %actor, index, len, "card position out of range, taking random card");
                self.players[target_seat].random_card(&mut self.rng)?
            }
            None => self.players[target_seat].random_card(&mut self.rng)?,
        };
        self.transfer(card, target, actor)
    }

    fn transfer(&mut self, card: Card, from: &PlayerId, to: &PlayerId) -> Result<(), GameError> {
        let seat = self.seat_of(to)?;
        self.players[seat].add_card(card);
        self.record(GameEventData::CardTaken { from: from.clone(), to: to.clone() });
        Ok(())
    }

    fn seat_of(&self, id: &PlayerId) -> Result<usize, GameError> {
        self.player_index(id).ok_or_else(|| GameError::UnknownPlayer(id.clone()))
    }
}

// =============================================================================
// POLLING
// =============================================================================

async fn poll_sequential(
    candidates: &[PlayerId],
    challenged: Card,
    decisions: &dyn Decisions,
    config: &MatchConfig,
) -> Option<PlayerId> {
    for player in candidates {
        let answer = bounded(
            config.decision_timeout,
            "nope",
            player,
            decisions.request_nope(player, challenged),
        )
        .await;
        if answer == Some(true) {
            return Some(player.clone());
        }
    }
    None
}

/// Ask every candidate at once; the earliest seat that said yes wins.
async fn poll_concurrent(
    candidates: &[PlayerId],
    challenged: Card,
    decisions: &dyn Decisions,
    config: &MatchConfig,
) -> Option<PlayerId> {
    let answers = join_all(candidates.iter().map(|player| {
        bounded(
            config.decision_timeout,
            "nope",
            player,
            decisions.request_nope(player, challenged),
        )
    }))
    .await;

    candidates
        .iter()
        .zip(answers)
        .find(|(_, answer)| *answer == Some(true))
        .map(|(player, _)| player.clone())
}

// =============================================================================
// TESTS
// =============================================================================
