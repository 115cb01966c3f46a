use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV_VAR: &str = "KNIGHTFALL_CONFIG";
/// Config path used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/knightfall.toml";

/// Character physics tuning. The play area itself is the level's size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration added to `speed_y` every tick.
    pub gravity: f32,
    /// Terminal fall speed per tick.
    pub max_fall_speed: f32,
    /// Horizontal speed multiplier applied when no direction is held.
    pub friction: f32,
    /// Extra depth below a surface's bottom edge still accepted as a landing.
    pub landing_tolerance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            max_fall_speed: 15.0,
            friction: 0.8,
            landing_tolerance: 10.0,
        }
    }
}

/// Revive and shared-healing tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoopConfig {
    /// Center-to-center distance within which a living partner revives.
    pub revive_radius: f32,
    /// Ticks of continuous proximity needed to revive (5 s at 60 Hz).
    pub revive_ticks: f32,
    /// Progress lost per tick while the partner is out of range.
    pub revive_decay: f32,
    /// Center-to-center distance within which both characters heal.
    pub heal_radius: f32,
    /// Health restored per tick to each character below max health.
    pub heal_per_tick: f32,
    /// Ticks between cosmetic healing particles.
    pub heal_effect_interval: u64,
}

impl Default for CoopConfig {
    fn default() -> Self {
        Self {
            revive_radius: 100.0,
            revive_ticks: 300.0,
            revive_decay: 0.5,
            heal_radius: 80.0,
            heal_per_tick: 2.0 / 60.0,
            heal_effect_interval: 20,
        }
    }
}

/// Hostile actor and projectile tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileConfig {
    /// Ticks between attacks.
    pub attack_delay: u32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Maximum number of trailing positions kept per projectile.
    pub trail_length: usize,
    /// Vertical velocity applied to a character hit by a projectile.
    pub knockback: f32,
    pub base_damage: f32,
    pub damage_per_level: f32,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            attack_delay: 40,
            projectile_speed: 4.0,
            projectile_radius: 12.0,
            trail_length: 10,
            knockback: -5.0,
            base_damage: 10.0,
            damage_per_level: 5.0,
        }
    }
}

/// Pickup, scoring and level-up tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Total collected pickups that wins the session.
    pub victory_pickups: u32,
    /// Score per pickup, multiplied by the current level.
    pub score_per_pickup: u32,
    /// `max_speed` increase for both characters on level-up.
    pub level_speed_bonus: f32,
    /// Real-time delay before a cleared batch is replaced.
    pub respawn_delay_secs: f32,
    /// Batch size is `base_batch + level`, capped at `max_batch`.
    pub base_batch: u32,
    pub max_batch: u32,
    pub pickup_radius: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            victory_pickups: 50,
            score_per_pickup: 10,
            level_speed_bonus: 0.2,
            respawn_delay_secs: 0.5,
            base_batch: 3,
            max_batch: 8,
            pickup_radius: 20.0,
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnightfallConfig {
    pub physics: PhysicsConfig,
    pub coop: CoopConfig,
    pub hostile: HostileConfig,
    pub progression: ProgressionConfig,
    /// Nominal host tick rate; every per-tick constant assumes this cadence.
    pub tick_rate_hz: f32,
    /// Fixed RNG seed for deterministic replay; random when unset.
    pub seed: Option<u64>,
}

impl Default for KnightfallConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            coop: CoopConfig::default(),
            hostile: HostileConfig::default(),
            progression: ProgressionConfig::default(),
            tick_rate_hz: 60.0,
            seed: None,
        }
    }
}

/// Configuration loading/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid(m) => write!(f, "invalid config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl KnightfallConfig {
    /// Load config from `KNIGHTFALL_CONFIG` or `config/knightfall.toml`.
    /// Falls back to defaults if the file is missing, unparseable or invalid.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match Self::from_path(&path) {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path, "No config file, using defaults");
                Self::default()
            },
            Err(e) => {
                tracing::warn!("Failed to load {path}: {e}, using defaults");
                Self::default()
            },
        }
    }

    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("physics.max_fall_speed", self.physics.max_fall_speed),
            ("coop.revive_ticks", self.coop.revive_ticks),
            ("hostile.projectile_speed", self.hostile.projectile_speed),
            ("tick_rate_hz", self.tick_rate_hz),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.progression.victory_pickups == 0 {
            return Err(ConfigError::Invalid(
                "progression.victory_pickups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
