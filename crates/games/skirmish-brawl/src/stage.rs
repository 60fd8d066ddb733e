use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Playfield width in world units.
pub const STAGE_WIDTH: f32 = 1280.0;
/// Playfield height in world units.
pub const STAGE_HEIGHT: f32 = 720.0;
/// Distance from the bottom of the playfield to the ground line.
const GROUND_OFFSET: f32 = 120.0;
/// Horizontal offset of a ledge anchor outside the platform's left edge.
const LEDGE_LEFT_INSET: f32 = 10.0;
/// Horizontal offset of a ledge anchor inside the platform's right edge.
const LEDGE_RIGHT_INSET: f32 = 30.0;
/// Height of a ledge anchor above the platform's top surface.
pub const LEDGE_RISE: f32 = 10.0;
/// Smallest playfield extent a loaded stage may have.
const MIN_STAGE_EXTENT: f32 = 100.0;

/// A one-way platform. Solid only from above while falling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left and right grab points, in that order.
    pub fn ledge_anchors(&self) -> [(f32, f32); 2] {
        let y = self.y - LEDGE_RISE;
        [
            (self.x - LEDGE_LEFT_INSET, y),
            (self.x + self.width - LEDGE_RIGHT_INSET, y),
        ]
    }
}

/// A fighter spawn position (top-left of the fighter's box).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

/// Stage layout preset selectable at match start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagePreset {
    #[default]
    Default,
    Small,
    Wide,
}

impl StagePreset {
    pub fn as_str(self) -> &'static str {
        match self {
            StagePreset::Default => "default",
            StagePreset::Small => "small",
            StagePreset::Wide => "wide",
        }
    }
}

impl fmt::Display for StagePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StagePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(StagePreset::Default),
            "small" => Ok(StagePreset::Small),
            "wide" => Ok(StagePreset::Wide),
            other => Err(format!("unknown stage preset '{other}'")),
        }
    }
}

/// Static stage geometry. Immutable for the duration of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    pub platforms: Vec<Platform>,
    pub spawn_points: Vec<SpawnPoint>,
}

impl Default for Stage {
    fn default() -> Self {
        Self::from_preset(StagePreset::Default)
    }
}

impl Stage {
    /// Build the fixed layout for a preset.
    pub fn from_preset(preset: StagePreset) -> Self {
        let w = STAGE_WIDTH;
        let ground_y = STAGE_HEIGHT - GROUND_OFFSET;
        let platforms = match preset {
            StagePreset::Default => vec![
                Platform::new(w / 2.0 - 160.0, ground_y - 160.0, 320.0, 16.0),
                Platform::new(220.0, ground_y - 260.0, 160.0, 12.0),
                Platform::new(w - 380.0, ground_y - 260.0, 160.0, 12.0),
            ],
            StagePreset::Small => vec![Platform::new(
                w / 2.0 - 110.0,
                ground_y - 120.0,
                220.0,
                16.0,
            )],
            StagePreset::Wide => vec![
                Platform::new(w / 2.0 - 220.0, ground_y - 200.0, 440.0, 16.0),
                Platform::new(220.0, ground_y - 260.0, 160.0, 12.0),
            ],
        };
        Self {
            width: w,
            height: STAGE_HEIGHT,
            ground_y,
            platforms,
            spawn_points: vec![
                SpawnPoint {
                    x: 200.0,
                    y: ground_y - 200.0,
                },
                SpawnPoint {
                    x: w - 200.0,
                    y: ground_y - 200.0,
                },
            ],
        }
    }

    /// Whether the geometry can host a match: finite, at least
    /// `MIN_STAGE_EXTENT` on each axis, and a ground line inside the playfield.
    pub fn is_playable(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width >= MIN_STAGE_EXTENT
            && self.height >= MIN_STAGE_EXTENT
            && self.ground_y > 0.0
            && self.ground_y <= self.height
    }

    /// Spawn point for the fighter in `slot` (0-based). Wraps if the stage has fewer points.
    pub fn spawn_for(&self, slot: usize) -> SpawnPoint {
        if self.spawn_points.is_empty() {
            return SpawnPoint {
                x: self.width / 2.0,
                y: self.ground_y - 200.0,
            };
        }
        self.spawn_points[slot % self.spawn_points.len()]
    }
}

/// Load a stage from a JSON file, returning `None` if the file is missing or invalid.
pub fn load_stage_from_file(path: &str) -> Option<Stage> {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Stage>(&content) {
            Ok(stage) if stage.is_playable() => Some(stage),
            Ok(stage) => {
                tracing::warn!(
                    width = stage.width,
                    height = stage.height,
                    ground_y = stage.ground_y,
                    "Ignoring unplayable stage in {path}"
                );
                None
            },
            Err(e) => {
                tracing::warn!("Failed to parse {path}: {e}");
                None
            },
        },
        Err(_) => None,
    }
}

/// Load a stage for the given preset, preferring a JSON file from the stages directory.
///
/// Checks env var `SKIRMISH_STAGES_DIR` (default `config/stages`) for a file named
/// `{preset}.json` (e.g. `small.json`). Falls back to `Stage::from_preset`.
pub fn load_stage(preset: StagePreset) -> Stage {
    let dir =
        std::env::var("SKIRMISH_STAGES_DIR").unwrap_or_else(|_| "config/stages".to_string());
    let path = format!("{dir}/{preset}.json");
    load_stage_from_file(&path).unwrap_or_else(|| Stage::from_preset(preset))
}
