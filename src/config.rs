//! Simulation tuning
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! partial JSON document only overrides what it names.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tuning knobs for a [`GameManager`](crate::sim::GameManager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for spawn rolls and spawn positions
    pub seed: u64,
    pub tick_interval_ms: u64,
    pub level_interval_ms: u64,
    pub initial_rain_speed: f32,
    pub rain_speed_step: f32,
    pub max_spawn_chance: u32,
    /// Fraction of the player bounds used for collisions
    pub hitbox_shrink: f32,
    pub raindrop_size: Vec2,
    pub player_size: Vec2,
    pub player_speed_factor: f32,
    /// Let the second tilt axis move the player vertically
    pub vertical_movement: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            tick_interval_ms: TICK_INTERVAL_MS,
            level_interval_ms: LEVEL_INTERVAL_MS,
            initial_rain_speed: INITIAL_RAIN_SPEED,
            rain_speed_step: RAIN_SPEED_STEP,
            max_spawn_chance: MAX_SPAWN_CHANCE,
            hitbox_shrink: HITBOX_SHRINK,
            raindrop_size: Vec2::splat(RAINDROP_SIZE),
            player_size: Vec2::splat(PLAYER_SIZE),
            player_speed_factor: PLAYER_SPEED_FACTOR,
            vertical_movement: false,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Parse a JSON config, falling back to defaults if it is malformed
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid sim config ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values into the ranges the simulation relies on
    pub fn sanitized(mut self) -> Self {
        if self.tick_interval_ms == 0 {
            log::warn!("tick_interval_ms must be positive, using 1");
            self.tick_interval_ms = 1;
        }
        if self.level_interval_ms == 0 {
            log::warn!("level_interval_ms must be positive, using 1");
            self.level_interval_ms = 1;
        }
        self.max_spawn_chance = self.max_spawn_chance.min(SPAWN_ROLL_RANGE);
        self.hitbox_shrink = if self.hitbox_shrink.is_finite() {
            self.hitbox_shrink.clamp(0.0, 1.0)
        } else {
            HITBOX_SHRINK
        };
        self.raindrop_size = self.raindrop_size.max(Vec2::ZERO);
        self.player_size = self.player_size.max(Vec2::ZERO);
        self.rain_speed_step = self.rain_speed_step.max(0.0);
        self
    }
}
