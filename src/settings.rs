//! Player settings and difficulty presets
//!
//! Both serialize to JSON so the host can persist them however it likes.

use serde::{Deserialize, Serialize};

/// Difficulty picked on the title screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub const ALL: [DifficultyPreset; 3] = [
        DifficultyPreset::Easy,
        DifficultyPreset::Normal,
        DifficultyPreset::Hard,
    ];

    /// Analytics label
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "easy",
            DifficultyPreset::Normal => "normal",
            DifficultyPreset::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "medium" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Built-in start parameters for this preset
    pub fn default_params(&self) -> DifficultyParams {
        match self {
            DifficultyPreset::Easy => DifficultyParams::new(1, 1),
            DifficultyPreset::Normal => DifficultyParams::new(5, 3),
            DifficultyPreset::Hard => DifficultyParams::new(10, 5),
        }
    }
}

/// Arguments for [`GameManager::start`](crate::sim::GameManager::start)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Initial per-tick spawn chance (percent)
    pub spawn_chance: u32,
    pub score_multiplier: u32,
}

impl DifficultyParams {
    pub fn new(spawn_chance: u32, score_multiplier: u32) -> Self {
        Self {
            spawn_chance,
            score_multiplier,
        }
    }
}

/// Per-preset start parameters, overridable from a remotely fetched JSON
/// document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyParams,
    pub normal: DifficultyParams,
    pub hard: DifficultyParams,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyPreset::Easy.default_params(),
            normal: DifficultyPreset::Normal.default_params(),
            hard: DifficultyPreset::Hard.default_params(),
        }
    }
}

impl DifficultyTable {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse overrides, keeping the built-in table if they are malformed
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(table) => {
                log::info!("Loaded difficulty overrides");
                table
            }
            Err(e) => {
                log::warn!("Invalid difficulty overrides ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn params(&self, preset: DifficultyPreset) -> DifficultyParams {
        match preset {
            DifficultyPreset::Easy => self.easy,
            DifficultyPreset::Normal => self.normal,
            DifficultyPreset::Hard => self.hard,
        }
    }

    /// Preset whose spawn chance matches (first match in easy → hard order)
    pub fn preset_for_spawn_chance(&self, spawn_chance: u32) -> Option<DifficultyPreset> {
        DifficultyPreset::ALL
            .into_iter()
            .find(|preset| self.params(*preset).spawn_chance == spawn_chance)
    }

    /// Analytics label for a run started with `spawn_chance`
    pub fn label_for_spawn_chance(&self, spawn_chance: u32) -> &'static str {
        self.preset_for_spawn_chance(spawn_chance)
            .map(|p| p.as_str())
            .unwrap_or("unknown")
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Vibrate on game over
    pub vibration: bool,
    /// Tutorial has been dismissed once
    pub tutorial_shown: bool,
    /// Best score across all runs
    pub high_score: u64,
    /// Last difficulty picked
    pub last_preset: DifficultyPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            vibration: true,
            tutorial_shown: false,
            high_score: 0,
            last_preset: DifficultyPreset::Normal,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(|mut s| {
            s.set_volume(s.volume);
            s
        })
    }

    /// Load stored settings, or defaults if nothing usable was stored
    pub fn load(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Stored settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Set volume, clamped to [0, 1]
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.5
        };
    }

    /// Raise the high score if `score` beats it. Returns true on a new best.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }
}
