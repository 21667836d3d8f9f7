//! Game tuning and session configuration
//!
//! Loaded from JSON (all fields optional) with environment overrides for the
//! launcher. Defaults come from [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Environment variable naming a JSON settings file
pub const CONFIG_PATH_ENV: &str = "SHOOTING_GAME_CONFIG";
/// Environment variable overriding the RNG seed
pub const SEED_ENV: &str = "SHOOTING_GAME_SEED";

/// Enemy spawn schedule tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Ticks after session start before the first wave appears
    pub first_spawn_delay_ticks: u32,
    /// Initial ticks between waves
    pub interval_ticks: u32,
    /// Floor for the decaying interval
    pub min_interval_ticks: u32,
    /// Multiplier applied to the interval after each spawn (0 < decay <= 1)
    pub interval_decay: f32,
    /// Enemies in the first wave
    pub enemies_per_wave: u32,
    /// Extra enemies per cleared wave
    pub enemies_per_wave_growth: u32,
    pub max_enemies_per_wave: u32,
    /// Maximum horizontal jitter applied to each lane position (pixels)
    pub lane_jitter: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            first_spawn_delay_ticks: FIRST_SPAWN_DELAY_TICKS,
            interval_ticks: SPAWN_INTERVAL_TICKS,
            min_interval_ticks: MIN_SPAWN_INTERVAL_TICKS,
            interval_decay: SPAWN_INTERVAL_DECAY,
            enemies_per_wave: ENEMIES_PER_WAVE,
            enemies_per_wave_growth: ENEMIES_PER_WAVE_GROWTH,
            max_enemies_per_wave: MAX_ENEMIES_PER_WAVE,
            lane_jitter: 8.0,
        }
    }
}

/// Ordinary enemies shooting straight down at the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyFireSettings {
    /// Session ticks before enemies open fire
    pub delay_ticks: u64,
    /// Chance per enemy per tick
    pub chance: f32,
    pub bullet_radius: f32,
    pub bullet_speed: f32,
}

impl Default for EnemyFireSettings {
    fn default() -> Self {
        Self {
            delay_ticks: ENEMY_FIRE_DELAY_TICKS,
            chance: ENEMY_FIRE_CHANCE,
            bullet_radius: ENEMY_BULLET_RADIUS,
            bullet_speed: ENEMY_BULLET_SPEED,
        }
    }
}

/// Boss waves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossSettings {
    /// Every n-th released wave is a lone boss (0 disables bosses)
    pub every_waves: u32,
    /// Bullet hits needed to destroy a boss
    pub health: i32,
    pub radius: f32,
    /// Descent speed (pixels/sec)
    pub speed: f32,
    /// Horizontal sweep speed, reversed at the side walls
    pub sweep_speed: f32,
    pub kill_score: u64,
    /// Chance per tick of an aimed shot
    pub fire_chance: f32,
    pub shot_speed: f32,
    /// No new shot while this many enemy bullets are in flight
    pub max_shots: usize,
    /// Aim point is the player position offset by up to this much per axis
    pub aim_jitter: f32,
}

impl Default for BossSettings {
    fn default() -> Self {
        Self {
            every_waves: BOSS_EVERY_WAVES,
            health: BOSS_HEALTH,
            radius: BOSS_RADIUS,
            speed: BOSS_SPEED,
            sweep_speed: BOSS_SWEEP_SPEED,
            kill_score: BOSS_KILL_SCORE,
            fire_chance: BOSS_FIRE_CHANCE,
            shot_speed: BOSS_SHOT_SPEED,
            max_shots: BOSS_MAX_SHOTS,
            aim_jitter: BOSS_AIM_JITTER,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducible spawn jitter
    pub seed: u64,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub defense_line_y: f32,

    // === Player ===
    pub player_half_width: f32,
    pub player_half_height: f32,
    pub player_y: f32,
    pub player_speed: f32,
    pub starting_lives: u32,

    // === Bullets ===
    pub bullet_radius: f32,
    pub bullet_speed: f32,
    pub fire_cooldown_ticks: u32,

    // === Enemies ===
    pub enemy_radius: f32,
    pub enemy_speed: f32,
    pub enemy_speed_growth: f32,
    pub kill_score: u64,

    // === Session ===
    /// Ticks the game-over screen ignores restart
    pub restart_lockout_ticks: u32,
    pub explosion_ticks: u32,

    pub spawn: SpawnSettings,
    pub enemy_fire: EnemyFireSettings,
    pub boss: BossSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            defense_line_y: DEFENSE_LINE_Y,

            player_half_width: PLAYER_HALF_WIDTH,
            player_half_height: PLAYER_HALF_HEIGHT,
            player_y: PLAYER_Y,
            player_speed: PLAYER_SPEED,
            starting_lives: STARTING_LIVES,

            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            fire_cooldown_ticks: FIRE_COOLDOWN_TICKS,

            enemy_radius: ENEMY_RADIUS,
            enemy_speed: ENEMY_SPEED,
            enemy_speed_growth: ENEMY_SPEED_GROWTH,
            kill_score: KILL_SCORE,

            restart_lockout_ticks: RESTART_LOCKOUT_TICKS,
            explosion_ticks: EXPLOSION_TICKS,

            spawn: SpawnSettings::default(),
            enemy_fire: EnemyFireSettings::default(),
            boss: BossSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load from `SHOOTING_GAME_CONFIG` / `SHOOTING_GAME_SEED`, falling back to defaults
    pub fn load_or_default() -> Self {
        let mut settings = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => match Self::load(&path) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("{e}; using default settings");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        if let Ok(seed) = std::env::var(SEED_ENV) {
            match seed.parse::<u64>() {
                Ok(parsed) => settings.seed = parsed,
                Err(_) => log::warn!("Invalid {SEED_ENV} '{seed}', using {}", settings.seed),
            }
        }

        settings
    }

    /// Reject tunings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        };

        if self.playfield_width <= 0.0 || self.playfield_height <= 0.0 {
            return invalid("playfield", "dimensions must be positive");
        }
        if self.defense_line_y <= 0.0 || self.defense_line_y > self.playfield_height {
            return invalid("defense_line_y", "must lie inside the playfield");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        if self.enemy_radius <= 0.0 || self.bullet_radius <= 0.0 {
            return invalid("radius", "entity radii must be positive");
        }
        if self.enemy_radius * 2.0 > self.playfield_width {
            return invalid("enemy_radius", "an enemy must fit across the playfield");
        }
        if self.spawn.min_interval_ticks == 0 {
            return invalid("spawn.min_interval_ticks", "must be at least 1");
        }
        if self.spawn.interval_ticks < self.spawn.min_interval_ticks {
            return invalid("spawn.interval_ticks", "must not be below min_interval_ticks");
        }
        if !(self.spawn.interval_decay > 0.0 && self.spawn.interval_decay <= 1.0) {
            return invalid("spawn.interval_decay", "must be in (0, 1]");
        }
        if self.spawn.enemies_per_wave == 0 {
            return invalid("spawn.enemies_per_wave", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.enemy_fire.chance) {
            return invalid("enemy_fire.chance", "must be in [0, 1]");
        }
        if self.enemy_fire.bullet_radius <= 0.0 {
            return invalid("enemy_fire.bullet_radius", "must be positive");
        }
        if self.boss.every_waves > 0 {
            if self.boss.health < 1 {
                return invalid("boss.health", "must be at least 1");
            }
            if self.boss.radius <= 0.0 || self.boss.radius * 2.0 > self.playfield_width {
                return invalid("boss.radius", "a boss must fit across the playfield");
            }
            if !(0.0..=1.0).contains(&self.boss.fire_chance) {
                return invalid("boss.fire_chance", "must be in [0, 1]");
            }
        }
        Ok(())
    }
}
