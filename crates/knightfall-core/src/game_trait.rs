use serde::{Deserialize, Serialize};

use crate::player::PlayerSlot;

/// Core trait a tick host drives.
///
/// The host owns the tick source and the input plumbing; the game only
/// advances its own simulation and reports what happened.
pub trait SimGame: Send {
    /// Game metadata for the host's title screen / logs.
    fn metadata(&self) -> GameMetadata;

    /// Called once per host tick. Returns the events raised since the
    /// previous call (including those raised by input handling).
    fn update(&mut self, dt: f32) -> Vec<GameEvent>;

    /// Apply a MessagePack-encoded input event. Malformed input is dropped.
    fn apply_input(&mut self, input: &[u8]);

    /// Serialize the full simulation snapshot for a renderer or replay log.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation snapshot. Malformed state is ignored.
    fn apply_state(&mut self, state: &[u8]);

    /// Nominal tick rate in Hz. All per-tick constants assume this cadence.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Whether gameplay logic (physics, AI, pickups) runs on the next tick.
    fn is_active(&self) -> bool;

    /// Whether the session reached a terminal outcome (victory or defeat).
    fn is_session_over(&self) -> bool;
}

/// Game metadata for the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub player_count: u8,
}

/// Score, level and collected-pickup counters as reported to observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u32,
    pub level: u32,
    pub total_pickups: u32,
}

/// Why a character died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Fall,
    Projectile,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Victory,
    Defeat,
    /// The players returned to the menu before a terminal outcome.
    Abandoned,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fired only when at least one of the three counters actually changed.
    ScoreChanged(ScoreSnapshot),
    SessionStarted,
    SessionEnded { outcome: SessionOutcome },
    CharacterDied { slot: PlayerSlot, cause: DeathCause },
    CharacterRevived { slot: PlayerSlot },
    PickupCollected { slot: PlayerSlot },
    LevelUp { level: u32 },
    /// The pause menu's quit entry was chosen; the host may close its window.
    QuitRequested,
}

/// Generates the `SimGame` snapshot methods that are identical across games:
/// `serialize_state` and `apply_state`.
///
/// Requires the implementing struct to have a `state: $StateType` field and the
/// implementing crate to depend on `rmp-serde` and `tracing`.
#[macro_export]
macro_rules! sim_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Ignored malformed state snapshot"),
            }
        }
    };
}
