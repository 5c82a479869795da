//! Game manager: run lifecycle and the self-rescheduling tick loop
//!
//! The manager owns the [`GameState`] and is driven from a single thread. The
//! host calls the lifecycle operations and either [`GameManager::poll`]s it
//! from its frame/timer callback or fires [`GameManager::tick`] itself when the
//! pending tick comes due.
//!
//! Two independent bits gate the loop:
//! - `paused`: the player paused the run. Level timing excludes paused time.
//! - `running`: the loop is live. The host clears it when it gets backgrounded
//!   ([`GameManager::stop_scheduling`]) without touching pause state.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::events::{CountdownText, GameCallback};
use super::random::{self, RandomSource};
use super::schedule::{TickHandle, TickScheduler};
use super::state::{Difficulty, GamePhase, GameState};
use super::tick::{self, TickOutcome};
use crate::config::SimConfig;

/// Facts about the current (or last) run for analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    pub started_at_ms: u64,
    /// Wall-clock seconds since the run started, paused time included
    pub duration_secs: u64,
}

pub struct GameManager<C, K = SystemClock, R = Pcg32> {
    state: GameState,
    config: SimConfig,
    scheduler: TickScheduler,
    clock: K,
    rng: R,
    callback: C,
}

impl<C: GameCallback> GameManager<C> {
    /// Manager on the wall clock with a PCG generator seeded from `config`
    pub fn new(config: SimConfig, callback: C) -> Self {
        let rng = random::seeded(config.seed);
        Self::with_parts(config, callback, SystemClock, rng)
    }
}

impl<C, K, R> GameManager<C, K, R>
where
    C: GameCallback,
    K: Clock,
    R: RandomSource,
{
    pub fn with_parts(config: SimConfig, callback: C, clock: K, rng: R) -> Self {
        let config = config.sanitized();
        Self {
            state: GameState::new(config.player_size),
            config,
            scheduler: TickScheduler::new(),
            clock,
            rng,
            callback,
        }
    }

    // === Lifecycle ===

    /// Begin a fresh run and arm the first tick immediately.
    ///
    /// Score, level, difficulty and raindrops are all reset; the player is
    /// re-centered.
    pub fn start(&mut self, spawn_chance_base: u32, score_multiplier: u32) {
        let now = self.clock.now_ms();
        let ceiling = self.config.max_spawn_chance;
        if spawn_chance_base > ceiling {
            log::warn!("Spawn chance {}% above ceiling, using {}%", spawn_chance_base, ceiling);
        }
        let spawn_chance_base = spawn_chance_base.min(ceiling);
        let state = &mut self.state;

        state.phase = GamePhase::Playing;
        state.running = true;
        state.paused = false;
        state.paused_at_ms = None;
        state.score = 0;
        state.score_multiplier = score_multiplier.max(1);
        state.level = 1;
        state.difficulty = Difficulty::new(spawn_chance_base, self.config.initial_rain_speed);
        state.run_started_at_ms = now;
        state.elapsed_reference_ms = now;
        state.clear_raindrops();

        let playfield = state.playfield_size();
        state.player.center_in(playfield);

        log::info!(
            "Run started: spawn chance {}%, multiplier x{}",
            spawn_chance_base,
            state.score_multiplier
        );

        self.callback
            .on_countdown_text_update(&CountdownText::cleared());
        self.scheduler.schedule(now, 0);
    }

    /// Pause a live run. No-op unless running and not already paused.
    pub fn pause(&mut self) {
        if !self.state.running || self.state.paused {
            log::debug!("pause ignored (running={}, paused={})", self.state.running, self.state.paused);
            return;
        }
        self.state.paused = true;
        self.state.paused_at_ms = Some(self.clock.now_ms());
        self.scheduler.cancel();
        log::debug!("Paused at level {}, score {}", self.state.level, self.state.score);
    }

    /// Resume a paused run, excluding the paused interval from level timing.
    /// No-op unless paused.
    pub fn resume(&mut self) {
        if !self.state.paused {
            log::debug!("resume ignored (not paused)");
            return;
        }
        let now = self.clock.now_ms();
        if let Some(paused_at) = self.state.paused_at_ms.take() {
            let paused_for = now.saturating_sub(paused_at);
            self.state.elapsed_reference_ms =
                self.state.elapsed_reference_ms.saturating_add(paused_for);
            log::debug!("Resumed after {} ms paused", paused_for);
        }
        self.state.paused = false;
        self.state.running = true;
        self.scheduler.schedule(now, 0);
    }

    /// Host suspension: drop the pending tick but leave pause and run state
    /// alone
    pub fn stop_scheduling(&mut self) {
        self.state.running = false;
        self.scheduler.cancel();
        log::debug!("Scheduling suspended");
    }

    /// Re-arm the loop after a host suspension.
    ///
    /// No-op unless a run is in progress, not paused, and the loop is not
    /// already live, so repeated host resume events never double-schedule.
    pub fn resume_scheduling(&mut self) {
        let state = &self.state;
        if state.phase != GamePhase::Playing || state.paused || state.running {
            log::debug!(
                "resume_scheduling ignored (phase={:?}, paused={}, running={})",
                state.phase,
                state.paused,
                state.running
            );
            return;
        }
        self.state.running = true;
        self.scheduler.schedule(self.clock.now_ms(), 0);
        log::debug!("Scheduling resumed");
    }

    /// Deliberate exit from a run
    pub fn stop(&mut self) {
        log::info!("Run stopped at level {}, score {}", self.state.level, self.state.score);
        self.full_stop();
    }

    /// Unconditionally halt the loop and clear every raindrop.
    ///
    /// A run in progress goes back to idle; a finished run keeps its game-over
    /// phase and score.
    pub fn full_stop(&mut self) {
        self.scheduler.cancel();
        let state = &mut self.state;
        state.running = false;
        state.paused = false;
        state.paused_at_ms = None;
        state.clear_raindrops();
        if state.phase == GamePhase::Playing {
            state.phase = GamePhase::Idle;
        }
    }

    // === Loop ===

    /// Run the pending tick if it is due. Returns whether a tick ran.
    ///
    /// At most one tick runs per call; late ticks are not caught up.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now_ms();
        if self.scheduler.take_due(now).is_some() {
            self.tick();
            true
        } else {
            false
        }
    }

    /// Execute one simulation step now and schedule its successor.
    ///
    /// A stale host timer firing while the loop is suspended or stopped is
    /// dropped without touching the run.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            self.scheduler.cancel();
            return TickOutcome::Halted;
        }
        let now = self.clock.now_ms();
        let outcome = tick::tick(
            &mut self.state,
            &self.config,
            now,
            &mut self.rng,
            &mut self.callback,
        );

        match outcome {
            TickOutcome::Continue => {
                self.scheduler.schedule(now, self.config.tick_interval_ms);
            }
            TickOutcome::Halted | TickOutcome::GameOver => {
                self.scheduler.cancel();
            }
        }
        outcome
    }

    /// The pending tick, if any
    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.scheduler.pending()
    }

    // === Host input ===

    /// Report the playfield size (`None` while the host doesn't know it yet)
    pub fn set_playfield(&mut self, size: Option<Vec2>) {
        self.state.playfield = size;
    }

    /// Feed one accelerometer reading. Ignored outside a live, unpaused run.
    pub fn apply_tilt(&mut self, tilt: Vec2) {
        if self.state.phase != GamePhase::Playing || self.state.paused {
            return;
        }
        let playfield = self.state.playfield_size();
        self.state.player.apply_tilt(
            tilt,
            playfield,
            self.config.player_speed_factor,
            self.config.vertical_movement,
        );
    }

    // === Queries ===

    pub fn current_score(&self) -> u64 {
        self.state.score
    }

    /// Wall-clock start of the current run
    pub fn run_start_timestamp(&self) -> u64 {
        self.state.run_started_at_ms
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn run_summary(&self) -> RunSummary {
        let now = self.clock.now_ms();
        RunSummary {
            score: self.state.score,
            level: self.state.level,
            started_at_ms: self.state.run_started_at_ms,
            duration_secs: now.saturating_sub(self.state.run_started_at_ms) / 1000,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }
}
