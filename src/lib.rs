//! Rain Dodge - A tilt-controlled raindrop dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lifecycle, tick loop, collisions, difficulty)
//! - `config`: Simulation tuning loaded from JSON
//! - `settings`: Player preferences and difficulty presets
//! - `highscores`: Leaderboard of finished runs

pub mod config;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use config::SimConfig;
pub use highscores::HighScores;
pub use settings::{DifficultyPreset, DifficultyTable, Settings};

/// Game configuration constants
pub mod consts {
    /// Nominal delay between ticks (~60 steps per second)
    pub const TICK_INTERVAL_MS: u64 = 16;
    /// Active play time between level transitions
    pub const LEVEL_INTERVAL_MS: u64 = 15_000;

    /// Raindrop fall speed at level 1 (units per tick)
    pub const INITIAL_RAIN_SPEED: f32 = 20.0;
    /// Fall speed added on every level transition
    pub const RAIN_SPEED_STEP: f32 = 1.0;
    /// Spawn chance never escalates past this percentage
    pub const MAX_SPAWN_CHANCE: u32 = 30;
    /// Per-tick spawn rolls are drawn from [0, SPAWN_ROLL_RANGE)
    pub const SPAWN_ROLL_RANGE: u32 = 100;

    /// Raindrop bounding box
    pub const RAINDROP_SIZE: f32 = 50.0;
    /// Default player bounding box
    pub const PLAYER_SIZE: f32 = 100.0;
    /// Fraction of the player bounds used as the hitbox (centered)
    pub const HITBOX_SHRINK: f32 = 0.6;

    /// Tilt reading to displacement multiplier
    pub const PLAYER_SPEED_FACTOR: f32 = 50.0;
    /// Rotation clamp for the player sprite (degrees)
    pub const MAX_ROTATION_DEG: f32 = 20.0;
    /// Tilt reading that produces the full rotation
    pub const SENSOR_SENSITIVITY: f32 = 4.0;

    /// Countdown switches to warning styling at or below this many seconds
    pub const COUNTDOWN_WARNING_SECS: u64 = 5;
    /// Countdown font size hint (sp)
    pub const COUNTDOWN_FONT_SIZE: u32 = 14;
    /// Alpha for the dim half of the countdown blink
    pub const COUNTDOWN_DIM_ALPHA: f32 = 0.3;
}
