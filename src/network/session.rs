//! Match Session Management
//!
//! Each match runs as its own tokio task driving a [`Match`] against a
//! [`RemotePlayers`] decision source. Sessions share nothing but the
//! manager's lookup tables, so a match that errors or panics only ends
//! itself.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::game::error::GameError;
use crate::game::player::PlayerId;
use crate::game::turn::{Match, MatchConfig};
use crate::network::protocol::{ClientMessage, Decision, ErrorCode, ServerError, ServerMessage};
use crate::network::remote::RemotePlayers;

/// Unique session identifier (the match id).
pub type SessionId = [u8; 16];

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Match task running.
    Playing,
    /// Match finished with a winner.
    Ended,
    /// Match task returned an error or panicked.
    Failed,
}

/// Configuration for match sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Rules for every match started by the manager.
    pub match_config: MatchConfig,
    /// Outbound message buffer per player.
    pub outbound_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            outbound_buffer: 64,
        }
    }
}

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session with this id, or the player is not seated anywhere.
    #[error("Session not found")]
    SessionNotFound,

    /// Player already seated in a running match.
    #[error("Already in session: {0}")]
    AlreadyInSession(PlayerId),

    /// The prompt was answered already or its deadline passed.
    #[error("Request {0} expired")]
    RequestExpired(u64),

    /// The prompt belongs to another player.
    #[error("Request {request_id} is not addressed to {player}")]
    WrongResponder {
        /// Prompt id.
        request_id: u64,
        /// Player who answered.
        player: PlayerId,
    },

    /// The decision does not answer the prompt.
    #[error("Request {request_id} expects a {expected} decision")]
    DecisionMismatch {
        /// Prompt id.
        request_id: u64,
        /// Prompt name.
        expected: &'static str,
    },

    /// The match task failed.
    #[error("Match failed: {0}")]
    MatchFailed(String),

    /// The match could not be set up.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl SessionError {
    /// Wire form for the client that caused the error.
    pub fn to_server_error(&self) -> ServerError {
        let code = match self {
            SessionError::RequestExpired(_) => ErrorCode::RequestExpired,
            SessionError::WrongResponder { .. } => ErrorCode::WrongResponder,
            SessionError::DecisionMismatch { .. } => ErrorCode::DecisionMismatch,
            SessionError::SessionNotFound => ErrorCode::NotInMatch,
            SessionError::AlreadyInSession(_) | SessionError::Game(_) => ErrorCode::InvalidInput,
            SessionError::MatchFailed(_) => ErrorCode::InternalError,
        };
        ServerError::new(code, self.to_string())
    }
}

/// A match session.
pub struct MatchSession {
    /// Unique session identifier.
    pub id: SessionId,
    /// Current state.
    pub state: SessionState,
    /// Seated players, in seating order.
    players: Vec<PlayerId>,
    /// Decision source shared with the match task.
    remote: Arc<RemotePlayers>,
    /// Match task (taken once its result is collected).
    task: Option<JoinHandle<Result<PlayerId, GameError>>>,
    /// Winner, once known.
    winner: Option<PlayerId>,
}

impl MatchSession {
    /// Seated players.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Winner, once collected.
    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    /// Has the match task stopped?
    pub fn is_finished(&self) -> bool {
        self.state != SessionState::Playing || self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

/// Manages all active sessions.
pub struct SessionManager {
    /// Configuration applied to new matches.
    config: SessionConfig,
    /// Active sessions.
    sessions: RwLock<BTreeMap<SessionId, Arc<RwLock<MatchSession>>>>,
    /// Player to session mapping.
    player_sessions: RwLock<BTreeMap<PlayerId, SessionId>>,
}

impl SessionManager {
    /// Create new session manager.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(BTreeMap::new()),
            player_sessions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Seat `player_ids` in a new match and start it.
    ///
    /// Returns the session id and each player's inbound message stream.
    pub async fn create_match(
        &self,
        player_ids: Vec<PlayerId>,
    ) -> Result<(SessionId, BTreeMap<PlayerId, mpsc::Receiver<ServerMessage>>), SessionError> {
        let mut outbound = Vec::with_capacity(player_ids.len());
        let mut inbound = BTreeMap::new();
        for id in &player_ids {
            let (tx, rx) = mpsc::channel(self.config.outbound_buffer);
            outbound.push((id.clone(), tx));
            inbound.insert(id.clone(), rx);
        }

        let remote = Arc::new(RemotePlayers::new(outbound));
        let id = uuid::Uuid::new_v4().into_bytes();
        let game = Match::with_id(id, player_ids, self.config.match_config.clone(), remote.clone())?;
        let id = self.launch(game, remote).await?;
        Ok((id, inbound))
    }

    /// Start an already built match.
    ///
    /// Seating is checked and recorded under one lock, so a player can never
    /// be reserved by two matches at once.
    pub async fn launch(&self, game: Match, remote: Arc<RemotePlayers>) -> Result<SessionId, SessionError> {
        let id = game.game().match_id;
        let players: Vec<PlayerId> = game.game().players().iter().map(|p| p.id.clone()).collect();

        let mut player_sessions = self.player_sessions.write().await;
        if let Some(player) = players.iter().find(|p| player_sessions.contains_key(*p)) {
            return Err(SessionError::AlreadyInSession(player.clone()));
        }

        let task = tokio::spawn(game.run_to_completion());
        let session = MatchSession {
            id,
            state: SessionState::Playing,
            players: players.clone(),
            remote,
            task: Some(task),
            winner: None,
        };

        self.sessions.write().await.insert(id, Arc::new(RwLock::new(session)));
        for player in players {
            player_sessions.insert(player, id);
        }
        drop(player_sessions);

        info!(session = %hex::encode(&id[..4]), "session started");
        Ok(id)
    }

    /// Route a client answer to the prompt it quotes.
    pub async fn submit(&self, player: &PlayerId, request_id: u64, decision: Decision) -> Result<(), SessionError> {
        let session = self.get_player_session(player).await.ok_or(SessionError::SessionNotFound)?;
        let session = session.read().await;
        session.remote.submit(player, request_id, decision)
    }

    /// Handle one client message; returns the reply to send back, if any.
    pub async fn handle_message(&self, player: &PlayerId, message: ClientMessage) -> Option<ServerMessage> {
        match message {
            ClientMessage::Respond { request_id, decision } => {
                match self.submit(player, request_id, decision).await {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(%player, request_id, "rejected response: {}", e);
                        Some(ServerMessage::Error(e.to_server_error()))
                    }
                }
            }
            ClientMessage::Ping { timestamp } => {
                let server_time = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or_default();
                Some(ServerMessage::Pong { timestamp, server_time })
            }
        }
    }

    /// Wait for a match to finish and collect its winner.
    pub async fn wait(&self, id: &SessionId) -> Result<PlayerId, SessionError> {
        let session = self.get_session(id).await.ok_or(SessionError::SessionNotFound)?;

        let task = session.write().await.task.take();
        let Some(task) = task else {
            let session = session.read().await;
            return match (&session.state, &session.winner) {
                (SessionState::Ended, Some(winner)) => Ok(winner.clone()),
                _ => Err(SessionError::MatchFailed("result already collected".into())),
            };
        };

        let result = match task.await {
            Ok(Ok(winner)) => Ok(winner),
            Ok(Err(e)) => Err(SessionError::MatchFailed(e.to_string())),
            Err(e) => Err(SessionError::MatchFailed(format!("match task aborted: {}", e))),
        };

        let mut session = session.write().await;
        match &result {
            Ok(winner) => {
                session.state = SessionState::Ended;
                session.winner = Some(winner.clone());
                info!(session = %hex::encode(&id[..4]), %winner, "session ended");
            }
            Err(e) => {
                session.state = SessionState::Failed;
                error!(session = %hex::encode(&id[..4]), "session failed: {}", e);
            }
        }
        result
    }

    /// Get a session by ID.
    pub async fn get_session(&self, id: &SessionId) -> Option<Arc<RwLock<MatchSession>>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    /// Get session for a player.
    pub async fn get_player_session(&self, player_id: &PlayerId) -> Option<Arc<RwLock<MatchSession>>> {
        let session_id = self.player_sessions.read().await.get(player_id).copied()?;
        self.get_session(&session_id).await
    }

    /// Session state, if the session exists.
    pub async fn status(&self, id: &SessionId) -> Option<SessionState> {
        let session = self.get_session(id).await?;
        let state = session.read().await.state;
        Some(state)
    }

    /// Remove a session, aborting its task if still running.
    pub async fn remove_session(&self, id: &SessionId) {
        let Some(session) = self.sessions.write().await.remove(id) else {
            return;
        };
        let session = session.read().await;
        if let Some(task) = &session.task {
            task.abort();
        }

        let mut player_sessions = self.player_sessions.write().await;
        for player in &session.players {
            if player_sessions.get(player) == Some(id) {
                player_sessions.remove(player);
            }
        }
    }

    /// Get active session count.
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Remove every session whose match has stopped.
    pub async fn cleanup(&self) {
        let mut finished = Vec::new();
        for (id, session) in self.sessions.read().await.iter() {
            if session.read().await.is_finished() {
                finished.push(*id);
            }
        }

        for id in finished {
            self.remove_session(&id).await;
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
