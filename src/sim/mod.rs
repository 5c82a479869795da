//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform
//! dependencies:
//! - Time only through [`Clock`]
//! - Randomness only through [`RandomSource`]
//! - Stable iteration order (spawn order)
//! - Output only through [`GameCallback`]

pub mod clock;
pub mod collision;
pub mod events;
pub mod manager;
pub mod random;
pub mod schedule;
pub mod state;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collision::{Rect, first_collision};
pub use events::{CountdownText, EventLog, GameCallback, GameEvent, NoopCallback, TextColor};
pub use manager::{GameManager, RunSummary};
pub use random::{RandomSource, ScriptedRolls};
pub use schedule::{TickHandle, TickScheduler};
pub use state::{Difficulty, GamePhase, GameState, Player, Raindrop};
pub use tick::{TickOutcome, level_for_elapsed, seconds_to_next_level, tick};
