use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;

/// Unique identifier for a fighter slot in a match (1 or 2 for local play).
pub type PlayerId = u64;

/// Core trait implemented by every Skirmish game mode.
///
/// The host owns the clock, input capture, and presentation; the game only
/// advances the simulation and reports what happened as plain event data.
pub trait ArenaGame: Send + Sync {
    /// Game metadata for the mode selection screen.
    fn metadata(&self) -> GameMetadata;

    /// Called once when the match is set up (and again for every rematch).
    fn init(&mut self, players: &[super::player::Player], config: &GameConfig);

    /// Called each frame. Returns the events produced by this tick.
    fn update(&mut self, dt: f32, inputs: &PlayerInputs) -> Vec<GameEvent>;

    /// Serialize the full simulation state as an immutable snapshot.
    fn serialize_state(&self) -> Vec<u8>;

    /// Restore a snapshot produced by `serialize_state`.
    fn apply_state(&mut self, state: &[u8]);

    /// Apply one player's encoded control frame to the pending input.
    fn apply_input(&mut self, player_id: PlayerId, input: &[u8]);

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Suspend tick advancement. Timers and scheduled sub-effects freeze.
    fn pause(&mut self);

    /// Resume exactly where the timers left off.
    fn resume(&mut self);

    /// Whether the match is over.
    fn is_round_complete(&self) -> bool;

    /// Final standings for the completed match.
    fn round_results(&self) -> Vec<PlayerScore>;
}

/// Game metadata for the mode selection screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
}

/// Configuration for a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Lives per fighter at match start.
    pub stock_count: u8,
    /// Mode-specific options (stage preset, loadouts, CPU settings, ...).
    pub custom: HashMap<String, serde_json::Value>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stock_count: 3,
            custom: HashMap::new(),
        }
    }
}

/// Encoded inputs collected from the capture layer for a single tick.
#[derive(Debug, Default)]
pub struct PlayerInputs {
    pub inputs: HashMap<PlayerId, Vec<u8>>,
}

/// Standing entry for a player at the end of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub score: i32,
}

/// Generates the 5 boilerplate `ArenaGame` methods shared by every mode:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_round_complete`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields,
/// and `$StateType` to have a `round_complete: bool` field.
#[macro_export]
macro_rules! arena_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::warn!(error = %e, "Ignored malformed state snapshot"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_round_complete(&self) -> bool {
            self.state.round_complete
        }
    };
}
