//! Events emitted by the simulation for the presentation layer

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Countdown text color hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextColor {
    #[default]
    Normal,
    /// Final seconds before a level transition
    Warning,
}

/// "Next level" countdown line with presentation hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownText {
    pub text: String,
    pub font_size: u32,
    pub color: TextColor,
    /// 1.0 normally; alternates with a dim value during the warning window
    pub alpha: f32,
}

impl CountdownText {
    /// Blank line, used to reset the display when a run starts
    pub fn cleared() -> Self {
        Self {
            text: String::new(),
            font_size: COUNTDOWN_FONT_SIZE,
            color: TextColor::Normal,
            alpha: 1.0,
        }
    }

    /// Countdown for `secs` whole seconds remaining
    ///
    /// Within the warning window even seconds render dim and odd seconds full,
    /// so the text blinks once per second.
    pub fn remaining(secs: u64) -> Self {
        let (color, alpha) = if secs <= COUNTDOWN_WARNING_SECS {
            let alpha = if secs % 2 == 0 { COUNTDOWN_DIM_ALPHA } else { 1.0 };
            (TextColor::Warning, alpha)
        } else {
            (TextColor::Normal, 1.0)
        };
        Self {
            text: format!("NEXT LEVEL: {}s", secs),
            font_size: COUNTDOWN_FONT_SIZE,
            color,
            alpha,
        }
    }
}

/// Receiver for simulation events.
///
/// Callbacks run synchronously inside the tick that produced them.
pub trait GameCallback {
    /// A raindrop left the playfield; `score_delta` is this event's award only
    fn on_object_missed(&mut self, score_delta: u64);
    /// The player was hit
    fn on_game_over(&mut self, final_score: u64);
    fn on_level_up(&mut self, new_level: u32);
    fn on_countdown_text_update(&mut self, text: &CountdownText);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl GameCallback for NoopCallback {
    fn on_object_missed(&mut self, _score_delta: u64) {}
    fn on_game_over(&mut self, _final_score: u64) {}
    fn on_level_up(&mut self, _new_level: u32) {}
    fn on_countdown_text_update(&mut self, _text: &CountdownText) {}
}

/// A recorded simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    ObjectMissed { score_delta: u64 },
    GameOver { final_score: u64 },
    LevelUp { level: u32 },
    Countdown(CountdownText),
}

/// Records every event in emission order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Drain recorded events
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn missed(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ObjectMissed { score_delta } => Some(*score_delta),
                _ => None,
            })
            .collect()
    }

    pub fn game_overs(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver { final_score } => Some(*final_score),
                _ => None,
            })
            .collect()
    }

    pub fn level_ups(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LevelUp { level } => Some(*level),
                _ => None,
            })
            .collect()
    }

    pub fn last_countdown(&self) -> Option<&CountdownText> {
        self.events.iter().rev().find_map(|e| match e {
            GameEvent::Countdown(text) => Some(text),
            _ => None,
        })
    }
}

impl GameCallback for EventLog {
    fn on_object_missed(&mut self, score_delta: u64) {
        self.events.push(GameEvent::ObjectMissed { score_delta });
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.events.push(GameEvent::GameOver { final_score });
    }

    fn on_level_up(&mut self, new_level: u32) {
        self.events.push(GameEvent::LevelUp { level: new_level });
    }

    fn on_countdown_text_update(&mut self, text: &CountdownText) {
        self.events.push(GameEvent::Countdown(text.clone()));
    }
}
