//! Shooting Game - core of a 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, spawning, game state)
//! - `renderer`: Render snapshots and the renderer collaborator interface
//! - `platform`: Input adapters and the fixed-timestep frame loop
//! - `settings`: Data-driven game tuning
//! - `highscores`: In-memory session leaderboard

pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 640.0;
    /// Enemies whose lower edge reaches this line breach the defense
    pub const DEFENSE_LINE_Y: f32 = 630.0;

    /// Player defaults
    pub const PLAYER_HALF_WIDTH: f32 = 16.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 10.0;
    pub const PLAYER_Y: f32 = 600.0;
    pub const PLAYER_SPEED: f32 = 240.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_SPEED: f32 = 480.0;
    pub const FIRE_COOLDOWN_TICKS: u32 = 8;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 14.0;
    pub const ENEMY_SPEED: f32 = 40.0;
    /// Fractional speed gain per wave after the first
    pub const ENEMY_SPEED_GROWTH: f32 = 0.08;
    pub const ENEMY_MAX_HEALTH: i32 = 3;

    /// Score per enemy destroyed by a bullet
    pub const KILL_SCORE: u64 = 10;
    /// Ticks the game-over screen ignores restart (3 s)
    pub const RESTART_LOCKOUT_TICKS: u32 = 180;
    /// Lifetime of an explosion effect (0.8 s) and of each of its two frames
    pub const EXPLOSION_TICKS: u32 = 48;
    pub const EXPLOSION_FRAME_TICKS: u32 = 6;

    /// Enemy fire defaults
    pub const ENEMY_BULLET_RADIUS: f32 = 4.0;
    pub const ENEMY_BULLET_SPEED: f32 = 200.0;
    /// Session ticks before ordinary enemies start shooting (5 s)
    pub const ENEMY_FIRE_DELAY_TICKS: u64 = 300;
    /// Per enemy, per tick
    pub const ENEMY_FIRE_CHANCE: f32 = 0.005;

    /// Boss defaults
    pub const BOSS_EVERY_WAVES: u32 = 5;
    pub const BOSS_HEALTH: i32 = 10;
    pub const BOSS_RADIUS: f32 = 40.0;
    pub const BOSS_SPEED: f32 = 20.0;
    pub const BOSS_SWEEP_SPEED: f32 = 60.0;
    pub const BOSS_KILL_SCORE: u64 = 100;
    pub const BOSS_FIRE_CHANCE: f32 = 0.05;
    /// Boss shots fly at twice the player speed
    pub const BOSS_SHOT_SPEED: f32 = 480.0;
    /// Boss holds fire while this many enemy bullets are in flight
    pub const BOSS_MAX_SHOTS: usize = 5;
    pub const BOSS_AIM_JITTER: f32 = 50.0;

    /// Spawn schedule defaults
    pub const FIRST_SPAWN_DELAY_TICKS: u32 = 60;
    pub const SPAWN_INTERVAL_TICKS: u32 = 240;
    pub const MIN_SPAWN_INTERVAL_TICKS: u32 = 60;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.9;
    pub const ENEMIES_PER_WAVE: u32 = 4;
    pub const ENEMIES_PER_WAVE_GROWTH: u32 = 1;
    pub const MAX_ENEMIES_PER_WAVE: u32 = 12;
}
