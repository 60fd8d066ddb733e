use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use skirmish_brawl::error::ConfigError;
use skirmish_core::game_trait::GameConfig;

/// Default path of the match file when none is given on the command line.
pub const DEFAULT_MATCH_PATH: &str = "config/match.toml";

/// Host configuration, loaded from a match TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Pace ticks against the wall clock. Off runs the match as fast as possible.
    pub realtime: bool,
    /// Stop after this many seconds of match time even without a winner.
    pub max_match_secs: f32,
    /// Drive fighter 1 with the scripted opponent too.
    pub autopilot: bool,
    /// Display names for the two fighters.
    pub names: [String; 2],
    #[serde(rename = "match")]
    pub match_options: MatchFile,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            realtime: true,
            max_match_secs: 300.0,
            autopilot: false,
            names: ["Player1".to_string(), "Player2".to_string()],
            match_options: MatchFile::default(),
        }
    }
}

/// The `[match]` table. Mirrors the keys `MatchOptions` reads from `GameConfig.custom`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchFile {
    pub stocks: u8,
    pub stage: String,
    pub cpu: bool,
    pub difficulty: String,
    pub seed: u64,
    pub hazards: bool,
    pub fighters: Vec<FighterFile>,
}

impl Default for MatchFile {
    fn default() -> Self {
        Self {
            stocks: 3,
            stage: "default".to_string(),
            cpu: true,
            difficulty: "med".to_string(),
            seed: 42,
            hazards: false,
            fighters: Vec::new(),
        }
    }
}

/// One `[[match.fighters]]` entry. Missing fields keep the slot's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agility: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultimate: Option<String>,
}

impl MatchFile {
    /// Build the generic match config the game mode expects.
    pub fn to_game_config(&self) -> GameConfig {
        let mut custom = HashMap::new();
        custom.insert("stage".to_string(), serde_json::json!(self.stage));
        custom.insert("cpu".to_string(), serde_json::json!(self.cpu));
        custom.insert("difficulty".to_string(), serde_json::json!(self.difficulty));
        custom.insert("seed".to_string(), serde_json::json!(self.seed));
        custom.insert("hazards".to_string(), serde_json::json!(self.hazards));
        if !self.fighters.is_empty() {
            match serde_json::to_value(&self.fighters) {
                Ok(v) => {
                    custom.insert("fighters".to_string(), v);
                },
                Err(e) => tracing::warn!(error = %e, "Ignoring fighter loadouts"),
            }
        }
        GameConfig {
            stock_count: self.stocks,
            custom,
        }
    }
}

impl HostConfig {
    /// Load from `path`, or from [`DEFAULT_MATCH_PATH`] when `None`.
    /// A missing default file means defaults; any other failure is logged and
    /// also falls back to defaults.
    pub fn load(path: Option<&str>) -> Self {
        let explicit = path.is_some();
        let path = path.unwrap_or(DEFAULT_MATCH_PATH);
        match Self::load_from_path(path) {
            Ok(cfg) => {
                tracing::info!(path, "Loaded match configuration");
                cfg
            },
            Err(ConfigError::Io { .. }) if !explicit => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Using default match configuration");
                Self::default()
            },
        }
    }

    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
