//! Game state and core simulation types
//!
//! Everything a tick reads or mutates lives in [`GameState`], owned exclusively
//! by the [`GameManager`](super::GameManager).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress (never started, or stopped)
    #[default]
    Idle,
    /// A run is in progress (possibly paused or host-suspended)
    Playing,
    /// Player was hit; terminal until the next start
    GameOver,
}

/// A falling raindrop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raindrop {
    pub id: u32,
    /// Top-left corner in playfield coordinates (y grows downward)
    pub pos: Vec2,
    pub size: Vec2,
}

impl Raindrop {
    pub fn new(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self { id, pos, size }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Move down by `speed` units
    #[inline]
    pub fn fall(&mut self, speed: f32) {
        self.pos.y += speed;
    }

    /// True once the top edge has passed the bottom of the playfield
    #[inline]
    pub fn is_below(&self, playfield_height: f32) -> bool {
        self.pos.y > playfield_height
    }
}

/// The player avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner in playfield coordinates
    pub pos: Vec2,
    pub size: Vec2,
    /// Sprite tilt for the presentation layer (degrees, not used for collisions)
    pub rotation_deg: f32,
}

impl Player {
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            rotation_deg: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Center the player in the playfield, or park it at the origin if the
    /// playfield has no area
    pub fn center_in(&mut self, playfield: Vec2) {
        self.rotation_deg = 0.0;
        if playfield.x <= 0.0 || playfield.y <= 0.0 {
            self.pos = Vec2::ZERO;
            return;
        }
        self.pos = ((playfield - self.size) / 2.0).max(Vec2::ZERO);
    }

    /// Apply one accelerometer reading.
    ///
    /// Tilting right (negative x) moves the player right. The vertical axis is
    /// only honored when `vertical` is set.
    pub fn apply_tilt(&mut self, tilt: Vec2, playfield: Vec2, speed_factor: f32, vertical: bool) {
        let x = self.pos.x - tilt.x * speed_factor;
        self.pos.x = clamp_axis(x, playfield.x - self.size.x);

        if vertical {
            let y = self.pos.y + tilt.y * speed_factor;
            self.pos.y = clamp_axis(y, playfield.y - self.size.y);
        }

        self.rotation_deg = (-(tilt.x / SENSOR_SENSITIVITY) * MAX_ROTATION_DEG)
            .clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG);
    }
}

/// Clamp into [0, max], with max itself floored at 0 for tiny playfields
fn clamp_axis(value: f32, max: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    value.min(max).max(0.0)
}

/// Difficulty parameters for the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Spawn chance chosen at start
    pub base_spawn_chance: u32,
    /// Current per-tick spawn chance (percent)
    pub spawn_chance: u32,
    /// Current fall speed (units per tick)
    pub rain_speed: f32,
}

impl Difficulty {
    pub fn new(base_spawn_chance: u32, initial_speed: f32) -> Self {
        Self {
            base_spawn_chance,
            spawn_chance: base_spawn_chance,
            rain_speed: initial_speed,
        }
    }

    /// One level transition worth of escalation
    pub fn escalate(&mut self, speed_step: f32, max_spawn_chance: u32) {
        self.rain_speed += speed_step;
        if self.spawn_chance < max_spawn_chance {
            self.spawn_chance += 1;
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(0, INITIAL_RAIN_SPEED)
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// The loop is live: set by start and resume, cleared by host suspension
    /// and stops. Pausing leaves it set.
    pub running: bool,
    /// Run is logically paused by the player
    pub paused: bool,
    pub score: u64,
    pub score_multiplier: u32,
    pub level: u32,
    /// Wall-clock start of the run, for duration analytics
    pub run_started_at_ms: u64,
    /// Baseline for elapsed play time; pushed forward by every paused interval
    pub elapsed_reference_ms: u64,
    pub paused_at_ms: Option<u64>,
    pub difficulty: Difficulty,
    /// Raindrops in spawn order
    pub raindrops: Vec<Raindrop>,
    pub player: Player,
    /// Playfield size as last reported by the host
    pub playfield: Option<Vec2>,
    next_id: u32,
}

impl GameState {
    pub fn new(player_size: Vec2) -> Self {
        Self {
            phase: GamePhase::Idle,
            running: false,
            paused: false,
            score: 0,
            score_multiplier: 1,
            level: 1,
            run_started_at_ms: 0,
            elapsed_reference_ms: 0,
            paused_at_ms: None,
            difficulty: Difficulty::default(),
            raindrops: Vec::new(),
            player: Player::new(player_size),
            playfield: None,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Playfield size, treating an unknown or malformed size as empty
    pub fn playfield_size(&self) -> Vec2 {
        match self.playfield {
            Some(size) if size.is_finite() => size.max(Vec2::ZERO),
            _ => Vec2::ZERO,
        }
    }

    /// Active play time, excluding every completed pause
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.elapsed_reference_ms)
    }

    pub fn clear_raindrops(&mut self) {
        self.raindrops.clear();
    }
}
