//! Protocol Messages
//!
//! Wire format between the match server and its clients. Every decision the
//! engine needs is sent as a [`Prompt`] carrying a request id; the client
//! answers with a [`Decision`] quoting that id.
//!
//! All messages are JSON. The tagged enums here cannot go through bincode;
//! the flat [`StateSnapshot`] can (see `StateSnapshot::to_bytes`).

use serde::{Serialize, Deserialize};

use crate::game::card::Card;
use crate::game::decision::PlayerAction;
use crate::game::events::GameEvent;
use crate::game::player::PlayerId;
use crate::game::state::StateSnapshot;

// =============================================================================
// PROMPTS AND DECISIONS
// =============================================================================

/// A question put to one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// Choose your turn action.
    Action,

    /// Nope the challenged card?
    Nope {
        /// Card being challenged
        challenged: Card,
    },

    /// Choose a player to take a card from.
    FavorTarget,

    /// Pick a face-down card to steal.
    CardChoice {
        /// Player being stolen from
        target: PlayerId,
        /// Cards they hold
        hand_size: u32,
    },

    /// Choose how deep to hide the defused bomb.
    BombPlacement {
        /// Draw pile size before insertion
        deck_size: u32,
    },
}

/// A player's answer to a [`Prompt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Decision {
    /// Turn action (answers `Prompt::Action`).
    Action(PlayerAction),
    /// Nope or not (answers `Prompt::Nope`).
    Nope(bool),
    /// Target player (answers `Prompt::FavorTarget`).
    Target(PlayerId),
    /// Face-down position (answers `Prompt::CardChoice`).
    Card(usize),
    /// Depth from the top (answers `Prompt::BombPlacement`).
    Placement(usize),
}

impl Prompt {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Prompt::Action => "action",
            Prompt::Nope { .. } => "nope",
            Prompt::FavorTarget => "favor target",
            Prompt::CardChoice { .. } => "card choice",
            Prompt::BombPlacement { .. } => "bomb placement",
        }
    }

    /// Does `decision` answer this prompt?
    pub fn accepts(&self, decision: &Decision) -> bool {
        matches!(
            (self, decision),
            (Prompt::Action, Decision::Action(_))
                | (Prompt::Nope { .. }, Decision::Nope(_))
                | (Prompt::FavorTarget, Decision::Target(_))
                | (Prompt::CardChoice { .. }, Decision::Card(_))
                | (Prompt::BombPlacement { .. }, Decision::Placement(_))
        )
    }
}

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Answer an outstanding prompt.
    Respond {
        /// Id quoted from the prompt
        request_id: u64,
        /// The answer
        decision: Decision,
    },

    /// Ping for latency measurement.
    Ping {
        /// Client clock, echoed back
        timestamp: u64,
    },
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A decision is needed from this client.
    Prompt {
        /// Id to quote in the answer
        request_id: u64,
        /// The question
        prompt: Prompt,
    },

    /// Public match state (at least once per turn).
    State(StateSnapshot),

    /// Public events since the previous batch, in sequence order.
    Events {
        /// New log entries
        events: Vec<GameEvent>,
    },

    /// Your current hand (private).
    Hand {
        /// Cards held
        cards: Vec<Card>,
    },

    /// Top of the draw pile (private, after SeeTheFuture).
    Future {
        /// Top card first
        cards: Vec<Card>,
    },

    /// Match over.
    GameOver {
        /// Last player standing
        winner_id: PlayerId,
    },

    /// Pong response.
    Pong {
        /// Echo of the client's timestamp
        timestamp: u64,
        /// Server clock in milliseconds since the epoch
        server_time: u64,
    },

    /// Error message.
    Error(ServerError),
}

/// Server error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ServerError {
    /// Create an error message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The prompt was already answered or timed out.
    RequestExpired,
    /// The prompt was addressed to another player.
    WrongResponder,
    /// The decision does not answer the prompt.
    DecisionMismatch,
    /// Not seated in a running match.
    NotInMatch,
    /// Malformed message.
    InvalidInput,
    /// Internal error.
    InternalError,
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::card::CardKind;

    #[test]
    fn test_client_message_json_roundtrip() {
        let msg = ClientMessage::Respond {
            request_id: 12,
            decision: Decision::Action(PlayerAction::PlayPair(0, 3)),
        };

        let json = msg.to_json().unwrap();
        assert!(json.contains("respond"));
        assert_eq!(ClientMessage::from_json(&json).unwrap(), msg);

        let ping = ClientMessage::from_json(r#"{"type":"ping","timestamp":5}"#).unwrap();
        assert_eq!(ping, ClientMessage::Ping { timestamp: 5 });
    }

    #[test]
    fn test_server_message_json() {
        let msg = ServerMessage::Prompt {
            request_id: 3,
            prompt: Prompt::Nope { challenged: Card::new(CardKind::Attack) },
        };

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"prompt\""));
        assert!(json.contains("\"kind\":\"nope\""));
        assert_eq!(ServerMessage::from_json(&json).unwrap(), msg);
    }

    #[test]
    fn test_decision_wire_shape() {
        let json = serde_json::to_string(&Decision::Nope(true)).unwrap();
        assert_eq!(json, r#"{"kind":"nope","value":true}"#);

        let back: Decision = serde_json::from_str(r#"{"kind":"target","value":"bob"}"#).unwrap();
        assert_eq!(back, Decision::Target("bob".into()));
    }

    #[test]
    fn test_prompt_accepts() {
        assert!(Prompt::Action.accepts(&Decision::Action(PlayerAction::Pass)));
        assert!(Prompt::BombPlacement { deck_size: 4 }.accepts(&Decision::Placement(1)));
        assert!(!Prompt::Action.accepts(&Decision::Nope(true)));
        assert!(!Prompt::FavorTarget.accepts(&Decision::Card(0)));
    }

    #[test]
    fn test_struct_variant_field_names() {
        let prompt = Prompt::CardChoice { target: "bob".into(), hand_size: 4 };
        let json = serde_json::to_string(&prompt).unwrap();
        assert_eq!(json, r#"{"kind":"card_choice","target":"bob","hand_size":4}"#);

        let pong = ServerMessage::Pong { timestamp: 1, server_time: 2 };
        assert_eq!(pong.to_json().unwrap(), r#"{"type":"pong","timestamp":1,"server_time":2}"#);
    }

    #[test]
    fn test_error_codes() {
        let msg = ServerMessage::Error(ServerError::new(ErrorCode::RequestExpired, "too late"));
        let json = msg.to_json().unwrap();
        assert!(json.contains("request_expired"));
    }
}
