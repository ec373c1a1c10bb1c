//! Kitten Fuse Demo Server
//!
//! Runs a few rooms of simulated clients side by side against the session
//! manager. Clients talk to their match only through prompts and decisions,
//! exactly like a networked client would.

use std::sync::Arc;
use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use kitten_fuse::{
    VERSION,
    core::DeterministicRng,
    game::{Card, MatchConfig, PlayerAction, PlayerId, StateSnapshot},
    network::{ClientMessage, Decision, Prompt, ServerMessage, SessionConfig, SessionManager},
};

const PLAYERS_PER_ROOM: usize = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let rooms: usize = env_or("KITTEN_ROOMS", 3)?;
    let seed: u64 = env_or("KITTEN_SEED", 0x5eed)?;

    info!("Kitten Fuse Server v{}", VERSION);
    info!("Rooms: {}, players per room: {}, client seed: {}", rooms, PLAYERS_PER_ROOM, seed);

    let config = SessionConfig {
        match_config: MatchConfig::default(),
        ..SessionConfig::default()
    };
    let manager = Arc::new(SessionManager::new(config));

    let mut sessions = Vec::with_capacity(rooms);
    for room in 0..rooms {
        let players: Vec<PlayerId> = (1..=PLAYERS_PER_ROOM)
            .map(|seat| PlayerId::new(format!("room{}-p{}", room, seat)))
            .collect();

        let (id, inboxes) = manager.create_match(players).await.context("failed to start match")?;
        for (seat, (player, inbox)) in inboxes.into_iter().enumerate() {
            let rng = DeterministicRng::new(seed.wrapping_add((room * PLAYERS_PER_ROOM + seat) as u64));
            tokio::spawn(simulated_client(manager.clone(), player, inbox, rng));
        }
        sessions.push(id);
    }

    for id in &sessions {
        match manager.wait(id).await {
            Ok(winner) => info!("Room {} won by {}", hex::encode(&id[..4]), winner),
            Err(e) => error!("Room {} failed: {}", hex::encode(&id[..4]), e),
        }
    }

    manager.cleanup().await;
    info!("All rooms finished ({} sessions left)", manager.session_count().await);
    Ok(())
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// A client that answers prompts with a seeded random policy.
async fn simulated_client(
    manager: Arc<SessionManager>,
    player: PlayerId,
    mut inbox: mpsc::Receiver<ServerMessage>,
    mut rng: DeterministicRng,
) {
    let mut hand: Vec<Card> = Vec::new();
    let mut table: Option<StateSnapshot> = None;

    while let Some(message) = inbox.recv().await {
        let (request_id, prompt) = match message {
            ServerMessage::Prompt { request_id, prompt } => (request_id, prompt),
            ServerMessage::Hand { cards } => {
                hand = cards;
                continue;
            }
            ServerMessage::State(snapshot) => {
                table = Some(snapshot);
                continue;
            }
            ServerMessage::GameOver { .. } => break,
            _ => continue,
        };

        let decision = match prompt {
            Prompt::Action => Decision::Action(choose_action(&hand, &mut rng)),
            Prompt::Nope { .. } => Decision::Nope(rng.next_index(10) < 3),
            Prompt::FavorTarget => {
                let others: Vec<&PlayerId> = table
                    .iter()
                    .flat_map(|t| &t.hand_sizes)
                    .filter(|h| h.player_id != player && h.cards > 0)
                    .map(|h| &h.player_id)
                    .collect();
                let target = rng.choose(&others).map(|p| (*p).clone()).unwrap_or_else(|| player.clone());
                Decision::Target(target)
            }
            Prompt::CardChoice { hand_size, .. } => Decision::Card(rng.next_index(hand_size.max(1) as usize)),
            Prompt::BombPlacement { deck_size } => Decision::Placement(rng.next_index(deck_size as usize + 1)),
        };

        let reply = ClientMessage::Respond { request_id, decision };
        if let Some(ServerMessage::Error(e)) = manager.handle_message(&player, reply).await {
            warn!(%player, "server rejected answer: {}", e.message);
        }
    }
}

/// Play a card half of the time; otherwise try a pair, else pass.
fn choose_action(hand: &[Card], rng: &mut DeterministicRng) -> PlayerAction {
    if rng.next_index(2) == 0 {
        if let Some(index) = hand.iter().position(|c| c.kind.is_playable_alone()) {
            return PlayerAction::Play(index);
        }
    }

    for (i, a) in hand.iter().enumerate() {
        if let Some(j) = hand.iter().skip(i + 1).position(|b| a.pairs_with(b)) {
            return PlayerAction::PlayPair(i, i + 1 + j);
        }
    }
    PlayerAction::Pass
}
