//! Network Layer
//!
//! Connects the engine to clients: wire messages, the channel-backed
//! decision source, and per-match session tasks. The transport itself
//! (WebSocket, pub/sub) plugs in on the other end of the channels.

pub mod protocol;
pub mod remote;
pub mod session;

pub use protocol::{ClientMessage, Decision, ErrorCode, Prompt, ServerError, ServerMessage};
pub use remote::RemotePlayers;
pub use session::{MatchSession, SessionConfig, SessionError, SessionId, SessionManager, SessionState};
