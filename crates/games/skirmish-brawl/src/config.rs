use serde::{Deserialize, Serialize};

use skirmish_core::game_trait::GameConfig;

use crate::abilities::{Special, Ultimate};
use crate::bot::Difficulty;
use crate::error::ConfigError;
use crate::stage::StagePreset;

const DEFAULT_CONFIG_PATH: &str = "config/brawl.toml";

/// Lowest value any fighter stat may take.
pub const MIN_STAT: f32 = 0.1;

/// Data-driven tuning for the brawl simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrawlConfig {
    /// Downward acceleration on fighters (units/s²).
    pub gravity: f32,
    /// Horizontal acceleration while grounded (units/s²).
    pub ground_accel: f32,
    /// Horizontal acceleration while airborne (units/s²).
    pub air_accel: f32,
    /// Per-tick velocity multiplier on the ground with no direction held.
    pub ground_friction: f32,
    /// Per-tick velocity multiplier in the air with no direction held.
    pub air_friction: f32,
    /// Horizontal speed cap before multipliers (units/s).
    pub max_run_speed: f32,
    /// Upward speed of a grounded or coyote jump.
    pub ground_jump_speed: f32,
    /// Upward speed of the air jump.
    pub air_jump_speed: f32,
    /// Grace period after leaving the ground during which a ground jump is still allowed.
    pub coyote_time: f32,
    /// How long a jump press stays armed waiting for a legal jump.
    pub jump_buffer: f32,
    /// Require a double-tap of `up` for the air jump.
    pub air_jump_requires_double_tap: bool,
    /// Double-tap detection window (milliseconds).
    pub double_tap_window_ms: f32,
    /// Maximum distance from a fighter's feet to a ledge anchor for a grab.
    pub ledge_grab_radius: f32,
    /// Re-grab lockout after letting go of a ledge (seconds).
    pub ledge_regrab_lockout: f32,
    /// Downward speed applied when dropping from a ledge.
    pub ledge_drop_speed: f32,
    /// Distance below the playfield at which a fighter is knocked out.
    pub ko_margin: f32,
    /// Enable the damage-threshold KO rule.
    pub enhanced_ko: bool,
    /// Accumulated damage at which a fighter is knocked out.
    pub ko_damage_threshold: f32,
    /// Seconds between losing a stock and reappearing.
    pub respawn_delay: f32,
    /// Passive ultimate charge per second.
    pub charge_regen_rate: f32,
    /// Largest step the simulation accepts; longer frames are clamped.
    pub max_dt: f32,
    /// Downward acceleration on projectiles (units/s²).
    pub projectile_gravity: f32,
    /// Seconds between environment hazards when hazards are enabled.
    pub hazard_interval: f32,
}

impl Default for BrawlConfig {
    fn default() -> Self {
        Self {
            gravity: 2200.0,
            ground_accel: 1400.0,
            air_accel: 800.0,
            ground_friction: 0.85,
            air_friction: 0.95,
            max_run_speed: 420.0,
            ground_jump_speed: 700.0,
            air_jump_speed: 650.0,
            coyote_time: 0.1,
            jump_buffer: 0.1,
            air_jump_requires_double_tap: false,
            double_tap_window_ms: 250.0,
            ledge_grab_radius: 28.0,
            ledge_regrab_lockout: 0.25,
            ledge_drop_speed: 20.0,
            ko_margin: 300.0,
            enhanced_ko: true,
            ko_damage_threshold: 175.0,
            respawn_delay: 2.0,
            charge_regen_rate: 8.0,
            max_dt: 1.0 / 30.0,
            projectile_gravity: 1600.0,
            hazard_interval: 3.0,
        }
    }
}

impl BrawlConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SKIRMISH_BRAWL_CONFIG") {
            match Self::load_from_path(&path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(error = %e, "Ignoring SKIRMISH_BRAWL_CONFIG"),
            }
        }
        match Self::load_from_path(DEFAULT_CONFIG_PATH) {
            Ok(config) => config,
            // A missing default file is the normal case.
            Err(ConfigError::Io { .. }) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Using default brawl config");
                Self::default()
            },
        }
    }

    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        toml::from_str::<Self>(&contents)
            .map(Self::sanitized)
            .map_err(|e| ConfigError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(contents)
            .map(Self::sanitized)
            .map_err(|e| ConfigError::Parse {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })
    }

    /// Pull values that would stall or explode the simulation back into range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 || self.max_dt > 0.1 {
            self.max_dt = defaults.max_dt;
        }
        if !self.ko_damage_threshold.is_finite() || self.ko_damage_threshold <= 0.0 {
            self.ko_damage_threshold = defaults.ko_damage_threshold;
        }
        if !self.hazard_interval.is_finite() || self.hazard_interval < 0.1 {
            self.hazard_interval = defaults.hazard_interval;
        }
        self.respawn_delay = self.respawn_delay.max(0.0);
        self.double_tap_window_ms = self.double_tap_window_ms.max(0.0);
        self
    }
}

/// Per-fighter multipliers. All default to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub speed: f32,
    pub power: f32,
    pub defense: f32,
    /// Carried with the loadout; no movement rule reads it yet.
    pub agility: f32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            speed: 1.0,
            power: 1.0,
            defense: 1.0,
            agility: 1.0,
        }
    }
}

impl Stats {
    /// Every stat finite and at least `MIN_STAT`.
    pub fn clamped(self) -> Self {
        fn fix(v: f32) -> f32 {
            if v.is_finite() { v.max(MIN_STAT) } else { 1.0 }
        }
        Self {
            speed: fix(self.speed),
            power: fix(self.power),
            defense: fix(self.defense),
            agility: fix(self.agility),
        }
    }
}

/// Ability and stat selection for one fighter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FighterLoadout {
    pub stats: Stats,
    pub special: Option<Special>,
    pub ultimate: Option<Ultimate>,
}

impl FighterLoadout {
    /// Default loadout for a 0-based fighter slot.
    pub fn for_slot(slot: usize) -> Self {
        if slot == 0 {
            Self {
                stats: Stats::default(),
                special: Some(Special::Fireball),
                ultimate: Some(Ultimate::Barrage),
            }
        } else {
            Self {
                stats: Stats::default(),
                special: Some(Special::Dash),
                ultimate: Some(Ultimate::Blitz),
            }
        }
    }
}

/// Loadout as written in `GameConfig.custom["fighters"]`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLoadout {
    speed: Option<f32>,
    power: Option<f32>,
    defense: Option<f32>,
    agility: Option<f32>,
    special: Option<String>,
    ultimate: Option<String>,
}

/// Typed match options, resolved from a `GameConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub stocks: u8,
    pub stage: StagePreset,
    pub fighters: [FighterLoadout; 2],
    pub cpu: bool,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub hazards: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            stocks: 3,
            stage: StagePreset::Default,
            fighters: [FighterLoadout::for_slot(0), FighterLoadout::for_slot(1)],
            cpu: false,
            difficulty: Difficulty::Med,
            seed: 42,
            hazards: false,
        }
    }
}

impl MatchOptions {
    /// Resolve options from the generic config. Unknown values fall back with a warning.
    pub fn from_game_config(config: &GameConfig) -> Self {
        let mut options = Self {
            stocks: config.stock_count.max(1),
            ..Self::default()
        };

        if let Some(stage) = config.custom.get("stage").and_then(|v| v.as_str()) {
            match stage.parse::<StagePreset>() {
                Ok(preset) => options.stage = preset,
                Err(e) => tracing::warn!(error = %e, "Using default stage"),
            }
        }

        if let Some(cpu) = config.custom.get("cpu").and_then(|v| v.as_bool()) {
            options.cpu = cpu;
        }

        if let Some(difficulty) = config.custom.get("difficulty").and_then(|v| v.as_str()) {
            match difficulty.parse::<Difficulty>() {
                Ok(d) => options.difficulty = d,
                Err(e) => tracing::warn!(error = %e, "Using default CPU difficulty"),
            }
        }

        if let Some(seed) = config.custom.get("seed").and_then(|v| v.as_u64()) {
            options.seed = seed;
        }

        if let Some(hazards) = config.custom.get("hazards").and_then(|v| v.as_bool()) {
            options.hazards = hazards;
        }

        if let Some(list) = config.custom.get("fighters").and_then(|v| v.as_array()) {
            for (slot, value) in list.iter().take(2).enumerate() {
                match serde_json::from_value::<RawLoadout>(value.clone()) {
                    Ok(raw) => options.fighters[slot] = resolve_loadout(slot, raw),
                    Err(e) => {
                        tracing::warn!(slot, error = %e, "Ignoring malformed fighter loadout");
                    },
                }
            }
        }

        options
    }
}

fn resolve_loadout(slot: usize, raw: RawLoadout) -> FighterLoadout {
    let base = FighterLoadout::for_slot(slot);
    let stats = Stats {
        speed: raw.speed.unwrap_or(base.stats.speed),
        power: raw.power.unwrap_or(base.stats.power),
        defense: raw.defense.unwrap_or(base.stats.defense),
        agility: raw.agility.unwrap_or(base.stats.agility),
    }
    .clamped();

    let special = match raw.special.as_deref() {
        None => base.special,
        Some("" | "none") => None,
        Some(id) => id
            .parse::<Special>()
            .map_err(|e| tracing::warn!(slot, error = %e, "Special slot left empty"))
            .ok(),
    };
    let ultimate = match raw.ultimate.as_deref() {
        None => base.ultimate,
        Some("" | "none") => None,
        Some(id) => id
            .parse::<Ultimate>()
            .map_err(|e| tracing::warn!(slot, error = %e, "Ultimate slot left empty"))
            .ok(),
    };

    FighterLoadout {
        stats,
        special,
        ultimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(custom: serde_json::Value, stocks: u8) -> GameConfig {
        let mut config = GameConfig {
            stock_count: stocks,
            ..GameConfig::default()
        };
        if let serde_json::Value::Object(map) = custom {
            config.custom = map.into_iter().collect();
        }
        config
    }

    #[test]
    fn defaults_match_documented_tuning() {
        let c = BrawlConfig::default();
        assert_eq!(c.gravity, 2200.0);
        assert_eq!(c.ko_damage_threshold, 175.0);
        assert!(c.enhanced_ko);
        assert!(!c.air_jump_requires_double_tap);
        assert_eq!(c.double_tap_window_ms, 250.0);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = BrawlConfig::from_toml_str("gravity = 1800.0\nenhanced_ko = false\n").unwrap();
        assert_eq!(c.gravity, 1800.0);
        assert!(!c.enhanced_ko);
        assert_eq!(c.max_run_speed, 420.0);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = BrawlConfig::from_toml_str("gravity = \"heavy\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = BrawlConfig::load_from_path("/nonexistent/brawl.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn sanitized_rejects_runaway_step() {
        let c = BrawlConfig::from_toml_str("max_dt = 5.0\nhazard_interval = 0.0\n").unwrap();
        assert_eq!(c.max_dt, 1.0 / 30.0);
        assert_eq!(c.hazard_interval, 3.0);
    }

    #[test]
    fn stats_clamp_to_minimum() {
        let s = Stats {
            speed: 0.0,
            power: -2.0,
            defense: f32::NAN,
            agility: 1.5,
        }
        .clamped();
        assert_eq!(s.speed, MIN_STAT);
        assert_eq!(s.power, MIN_STAT);
        assert_eq!(s.defense, 1.0);
        assert_eq!(s.agility, 1.5);
    }

    #[test]
    fn options_default_loadouts_per_slot() {
        let opts = MatchOptions::from_game_config(&GameConfig::default());
        assert_eq!(opts.stocks, 3);
        assert_eq!(opts.fighters[0].special, Some(Special::Fireball));
        assert_eq!(opts.fighters[1].ultimate, Some(Ultimate::Blitz));
        assert!(!opts.cpu);
    }

    #[test]
    fn options_parse_custom_values() {
        let config = config_with(
            serde_json::json!({
                "stage": "wide",
                "cpu": true,
                "difficulty": "hard",
                "seed": 7,
                "hazards": true,
                "fighters": [
                    { "special": "shield", "ultimate": "chronos", "power": 1.5 },
                    { "special": "none", "speed": 0.0 }
                ]
            }),
            5,
        );
        let opts = MatchOptions::from_game_config(&config);
        assert_eq!(opts.stocks, 5);
        assert_eq!(opts.stage, StagePreset::Wide);
        assert!(opts.cpu);
        assert_eq!(opts.difficulty, Difficulty::Hard);
        assert_eq!(opts.seed, 7);
        assert!(opts.hazards);
        assert_eq!(opts.fighters[0].special, Some(Special::Shield));
        assert_eq!(opts.fighters[0].ultimate, Some(Ultimate::Chronos));
        assert_eq!(opts.fighters[0].stats.power, 1.5);
        assert_eq!(opts.fighters[1].special, None);
        assert_eq!(opts.fighters[1].ultimate, Some(Ultimate::Blitz));
        assert_eq!(opts.fighters[1].stats.speed, MIN_STAT);
    }

    #[test]
    fn unknown_values_fall_back() {
        let config = config_with(
            serde_json::json!({
                "stage": "volcano",
                "difficulty": "nightmare",
                "fighters": [{ "special": "laser" }]
            }),
            0,
        );
        let opts = MatchOptions::from_game_config(&config);
        assert_eq!(opts.stocks, 1);
        assert_eq!(opts.stage, StagePreset::Default);
        assert_eq!(opts.difficulty, Difficulty::Med);
        assert_eq!(opts.fighters[0].special, None);
        assert_eq!(opts.fighters[0].ultimate, Some(Ultimate::Barrage));
    }
}
