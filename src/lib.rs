//! # Kitten Fuse
//!
//! Turn engine for an Exploding Kittens style card game, with every player
//! decision raced against a deadline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       KITTEN FUSE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - State hashing                             │
//! │                                                              │
//! │  game/           - Engine                                    │
//! │  ├── card.rs     - Card kinds, standard deck                 │
//! │  ├── deck.rs     - Draw pile                                 │
//! │  ├── player.rs   - Seats and hands                           │
//! │  ├── state.rs    - Deal, draw, eliminate, advance            │
//! │  ├── resolve.rs  - Plays, Nope frames, effects               │
//! │  ├── turn.rs     - Turn state machine, match driver          │
//! │  ├── decision.rs - Decision contract, bounded requests       │
//! │  └── events.rs   - Event log                                 │
//! │                                                              │
//! │  network/        - Client plumbing                           │
//! │  ├── protocol.rs - Message types                             │
//! │  ├── remote.rs   - Channel-backed decisions                  │
//! │  └── session.rs  - Match session management                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decisions
//!
//! The engine never blocks on a player indefinitely. Every request goes
//! through [`game::bounded`]; a request that misses its deadline counts as
//! "no" (or "pass"), and an answer that arrives afterwards is discarded.
//!
//! ## Determinism
//!
//! All shuffles and random picks come from a per-match [`DeterministicRng`]
//! seeded from the match id and seating, so a match replays identically
//! given the same decisions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use game::{Card, CardKind, Decisions, Game, GameError, Match, MatchConfig, PlayerAction, PlayerId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
