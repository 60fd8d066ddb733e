use serde::{Deserialize, Serialize};

use crate::game_trait::PlayerId;

/// Cosmetic particle burst categories for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstKind {
    Hit,
    Jump,
    Shield,
    Teleport,
    Dash,
    MuzzleFlash,
    Lightning,
    Shockwave,
    Ko,
}

/// Events emitted by the simulation during a tick.
///
/// Plain data: the presentation and audio collaborators react to these,
/// the simulation never calls into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Hit {
        /// `None` for environment hazards.
        attacker: Option<PlayerId>,
        defender: PlayerId,
        damage: f32,
        knockback: (f32, f32),
    },
    Ko {
        player_id: PlayerId,
    },
    AbilityUsed {
        player_id: PlayerId,
        ability: String,
    },
    ParticleBurst {
        kind: BurstKind,
        x: f32,
        y: f32,
    },
    ScreenShake {
        magnitude: f32,
    },
    StockUpdate {
        player_id: PlayerId,
        stocks: u8,
    },
    /// `winner` is `None` when both sides ran out of stocks on the same tick.
    MatchOver {
        winner: Option<PlayerId>,
    },
}
