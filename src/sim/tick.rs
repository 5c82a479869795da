//! Fixed-step simulation tick
//!
//! One tick runs, in order: level timer, spawn roll, raindrop advance, and the
//! collision check. Level timing is driven by elapsed wall-clock play time,
//! while fall speed is per tick, so host timer jitter changes the effective
//! frame rate but never the level schedule.

use glam::Vec2;

use super::collision::first_collision;
use super::events::{CountdownText, GameCallback};
use super::random::RandomSource;
use super::state::{GamePhase, GameState, Raindrop};
use crate::config::SimConfig;
use crate::consts::SPAWN_ROLL_RANGE;

/// What the loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, idle or already over; do not reschedule
    Halted,
    /// Schedule the next tick
    Continue,
    /// The player was hit during this tick
    GameOver,
}

/// Advance the game state by one step at time `now_ms`
pub fn tick<R, C>(
    state: &mut GameState,
    config: &SimConfig,
    now_ms: u64,
    rng: &mut R,
    callback: &mut C,
) -> TickOutcome
where
    R: RandomSource + ?Sized,
    C: GameCallback + ?Sized,
{
    if state.phase != GamePhase::Playing || state.paused {
        return TickOutcome::Halted;
    }

    update_level_timer(state, config, now_ms, callback);
    spawn_raindrop(state, config, rng);
    move_raindrops(state, callback);

    if check_collisions(state, config, callback) {
        TickOutcome::GameOver
    } else {
        TickOutcome::Continue
    }
}

/// Level reached after `elapsed_ms` of active play
pub fn level_for_elapsed(elapsed_ms: u64, level_interval_ms: u64) -> u32 {
    let interval = level_interval_ms.max(1);
    u32::try_from(elapsed_ms / interval)
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

/// Whole seconds (rounded up) until the next level transition
pub fn seconds_to_next_level(elapsed_ms: u64, level_interval_ms: u64) -> u64 {
    let interval = level_interval_ms.max(1);
    let remaining_ms = interval - elapsed_ms % interval;
    remaining_ms.div_ceil(1000)
}

/// Apply any pending level transitions and publish the countdown text.
///
/// A tick that crosses several levels at once (after a host suspension)
/// escalates once per level gained rather than once per tick.
pub fn update_level_timer<C: GameCallback + ?Sized>(
    state: &mut GameState,
    config: &SimConfig,
    now_ms: u64,
    callback: &mut C,
) {
    let elapsed = state.elapsed_ms(now_ms);
    let expected_level = level_for_elapsed(elapsed, config.level_interval_ms);

    if expected_level > state.level {
        // One escalation per level gained
        while state.level < expected_level {
            state.level += 1;
            state
                .difficulty
                .escalate(config.rain_speed_step, config.max_spawn_chance);
        }
        log::info!(
            "Level {}: speed={}, spawn chance={}%",
            state.level,
            state.difficulty.rain_speed,
            state.difficulty.spawn_chance
        );
        callback.on_level_up(state.level);
    }

    let secs = seconds_to_next_level(elapsed, config.level_interval_ms);
    callback.on_countdown_text_update(&CountdownText::remaining(secs));
}

/// Roll for a new raindrop. Returns true if one spawned.
pub fn spawn_raindrop<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &SimConfig,
    rng: &mut R,
) -> bool {
    if rng.below(SPAWN_ROLL_RANGE) >= state.difficulty.spawn_chance {
        return false;
    }

    // Keep the whole drop inside the playfield; no usable width means x = 0
    let max_x = (state.playfield_size().x - config.raindrop_size.x).floor();
    let x = if max_x >= 1.0 {
        rng.below(max_x as u32) as f32
    } else {
        0.0
    };

    let id = state.next_entity_id();
    state
        .raindrops
        .push(Raindrop::new(id, Vec2::new(x, 0.0), config.raindrop_size));
    true
}

/// Drop every raindrop by the current speed and retire the ones that left the
/// playfield, awarding score for each. Returns the number retired.
pub fn move_raindrops<C: GameCallback + ?Sized>(state: &mut GameState, callback: &mut C) -> usize {
    let speed = state.difficulty.rain_speed;
    let height = state.playfield_size().y;

    let before = state.raindrops.len();
    state.raindrops.retain_mut(|drop| {
        drop.fall(speed);
        !drop.is_below(height)
    });
    let retired = before - state.raindrops.len();

    let delta = u64::from(state.score_multiplier);
    for _ in 0..retired {
        state.score += delta;
        callback.on_object_missed(delta);
    }
    retired
}

/// End the run if any raindrop overlaps the player's hitbox. Returns true on a
/// hit.
pub fn check_collisions<C: GameCallback + ?Sized>(
    state: &mut GameState,
    config: &SimConfig,
    callback: &mut C,
) -> bool {
    if state.is_game_over() {
        return false;
    }

    let hitbox = state.player.bounds().shrunk(config.hitbox_shrink);
    let Some(index) = first_collision(&hitbox, &state.raindrops) else {
        return false;
    };

    let hit = state.raindrops.remove(index);
    log::info!(
        "Hit by raindrop {} at ({:.0}, {:.0}); final score {}",
        hit.id,
        hit.pos.x,
        hit.pos.y,
        state.score
    );

    state.phase = GamePhase::GameOver;
    state.running = false;
    state.paused = false;
    state.paused_at_ms = None;
    state.clear_raindrops();

    callback.on_game_over(state.score);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::{EventLog, GameEvent, TextColor};
    use crate::sim::random::ScriptedRolls;
    use crate::sim::state::Difficulty;

    const NO_SPAWN: u32 = 99;

    fn playing_state(spawn_chance: u32, multiplier: u32) -> GameState {
        let mut state = GameState::new(Vec2::splat(100.0));
        state.phase = GamePhase::Playing;
        state.running = true;
        state.score_multiplier = multiplier;
        state.difficulty = Difficulty::new(spawn_chance, 20.0);
        state.playfield = Some(Vec2::new(400.0, 300.0));
        // Park the player out of the raindrops' way
        state.player.pos = Vec2::new(300.0, 200.0);
        state
    }

    #[test]
    fn test_level_for_elapsed() {
        assert_eq!(level_for_elapsed(0, 15_000), 1);
        assert_eq!(level_for_elapsed(14_999, 15_000), 1);
        assert_eq!(level_for_elapsed(15_000, 15_000), 2);
        assert_eq!(level_for_elapsed(45_001, 15_000), 4);
    }

    #[test]
    fn test_seconds_to_next_level_rounds_up() {
        assert_eq!(seconds_to_next_level(0, 15_000), 15);
        assert_eq!(seconds_to_next_level(1, 15_000), 15);
        assert_eq!(seconds_to_next_level(1_000, 15_000), 14);
        assert_eq!(seconds_to_next_level(14_999, 15_000), 1);
        assert_eq!(seconds_to_next_level(15_000, 15_000), 15);
    }

    #[test]
    fn test_tick_halts_when_paused() {
        let mut state = playing_state(100, 1);
        state.paused = true;
        let mut rolls = ScriptedRolls::constant(0);
        let mut log = EventLog::new();

        let outcome = tick(&mut state, &SimConfig::default(), 1_000, &mut rolls, &mut log);
        assert_eq!(outcome, TickOutcome::Halted);
        assert!(state.raindrops.is_empty());
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_spawn_respects_chance() {
        let config = SimConfig::default();
        let mut state = playing_state(5, 1);

        let mut rolls = ScriptedRolls::new([5]);
        assert!(!spawn_raindrop(&mut state, &config, &mut rolls));

        let mut rolls = ScriptedRolls::new([4, 120]);
        assert!(spawn_raindrop(&mut state, &config, &mut rolls));
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].pos, Vec2::new(120.0, 0.0));
    }

    #[test]
    fn test_spawn_keeps_drop_inside_playfield() {
        let config = SimConfig::default();
        let mut state = playing_state(100, 1);
        // 400 wide, 50 wide drop: x in [0, 350)
        let mut rolls = ScriptedRolls::new([0, 349, 0, 350]);
        spawn_raindrop(&mut state, &config, &mut rolls);
        spawn_raindrop(&mut state, &config, &mut rolls);
        assert_eq!(state.raindrops[0].pos.x, 349.0);
        assert_eq!(state.raindrops[1].pos.x, 0.0);
        assert!(state.raindrops.iter().all(|d| d.bounds().max().x <= 400.0));
    }

    #[test]
    fn test_spawn_without_playfield_defaults_to_origin() {
        let config = SimConfig::default();
        let mut state = playing_state(100, 1);
        state.playfield = None;
        let mut rolls = ScriptedRolls::constant(0);
        assert!(spawn_raindrop(&mut state, &config, &mut rolls));
        assert_eq!(state.raindrops[0].pos, Vec2::ZERO);

        state.playfield = Some(Vec2::new(30.0, 300.0));
        assert!(spawn_raindrop(&mut state, &config, &mut rolls));
        assert_eq!(state.raindrops[1].pos, Vec2::ZERO);
    }

    #[test]
    fn test_raindrop_retired_once_past_bottom() {
        let mut state = playing_state(0, 3);
        let id = state.next_entity_id();
        state
            .raindrops
            .push(Raindrop::new(id, Vec2::new(0.0, 0.0), Vec2::splat(50.0)));
        let mut log = EventLog::new();

        for _ in 0..15 {
            assert_eq!(move_raindrops(&mut state, &mut log), 0);
        }
        assert_eq!(state.raindrops[0].pos.y, 300.0);

        assert_eq!(move_raindrops(&mut state, &mut log), 1);
        assert!(state.raindrops.is_empty());
        assert_eq!(state.score, 3);
        assert_eq!(log.missed(), vec![3]);

        assert_eq!(move_raindrops(&mut state, &mut log), 0);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_missed_events_carry_delta_not_total() {
        let mut state = playing_state(0, 5);
        for x in [0.0, 60.0] {
            let id = state.next_entity_id();
            state
                .raindrops
                .push(Raindrop::new(id, Vec2::new(x, 290.0), Vec2::splat(50.0)));
        }
        let mut log = EventLog::new();
        assert_eq!(move_raindrops(&mut state, &mut log), 2);
        assert_eq!(log.missed(), vec![5, 5]);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_collision_ends_run_and_clears_drops() {
        let config = SimConfig::default();
        let mut state = playing_state(0, 1);
        state.score = 12;
        // Hitbox for a 100x100 player at (300, 200) is (320..380, 220..280)
        for pos in [Vec2::new(0.0, 0.0), Vec2::new(330.0, 230.0)] {
            let id = state.next_entity_id();
            state.raindrops.push(Raindrop::new(id, pos, Vec2::splat(50.0)));
        }
        let mut log = EventLog::new();

        assert!(check_collisions(&mut state, &config, &mut log));
        assert!(state.is_game_over());
        assert!(!state.running);
        assert!(!state.paused);
        assert!(state.raindrops.is_empty());
        assert_eq!(log.game_overs(), vec![12]);

        // Already over: no second event
        assert!(!check_collisions(&mut state, &config, &mut log));
        assert_eq!(log.game_overs().len(), 1);
    }

    #[test]
    fn test_level_up_escalates_per_level() {
        let config = SimConfig::default();
        let mut state = playing_state(29, 1);
        let mut log = EventLog::new();

        update_level_timer(&mut state, &config, 15_000, &mut log);
        assert_eq!(state.level, 2);
        assert_eq!(state.difficulty.spawn_chance, 30);
        assert_eq!(state.difficulty.rain_speed, 21.0);

        // Jump two levels at once (e.g. after a host suspension)
        update_level_timer(&mut state, &config, 45_000, &mut log);
        assert_eq!(state.level, 4);
        assert_eq!(state.difficulty.spawn_chance, 30);
        assert_eq!(state.difficulty.rain_speed, 23.0);
        assert_eq!(log.level_ups(), vec![2, 4]);
    }

    #[test]
    fn test_countdown_emitted_on_level_boundary() {
        let config = SimConfig::default();
        let mut state = playing_state(0, 1);
        let mut log = EventLog::new();

        update_level_timer(&mut state, &config, 15_000, &mut log);
        assert_eq!(log.level_ups(), vec![2]);
        assert_eq!(
            log.last_countdown().map(|t| t.text.as_str()),
            Some("NEXT LEVEL: 15s")
        );
    }

    #[test]
    fn test_countdown_emitted_every_update() {
        let config = SimConfig::default();
        let mut state = playing_state(0, 1);
        let mut log = EventLog::new();

        update_level_timer(&mut state, &config, 0, &mut log);
        update_level_timer(&mut state, &config, 10_500, &mut log);
        update_level_timer(&mut state, &config, 11_500, &mut log);

        let texts: Vec<_> = log
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Countdown(t) => Some(t.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0].text, "NEXT LEVEL: 15s");
        assert_eq!(texts[0].color, TextColor::Normal);
        assert_eq!(texts[1].text, "NEXT LEVEL: 5s");
        assert_eq!(texts[1].alpha, 1.0);
        assert_eq!(texts[2].text, "NEXT LEVEL: 4s");
        assert_eq!(texts[2].alpha, 0.3);
    }

    #[test]
    fn test_full_tick_order() {
        let config = SimConfig::default();
        let mut state = playing_state(10, 2);
        let mut log = EventLog::new();
        // Spawn at x=10, then it falls by 20
        let mut rolls = ScriptedRolls::new([0, 10]).with_fallback(NO_SPAWN);

        let outcome = tick(&mut state, &config, 16, &mut rolls, &mut log);
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].pos, Vec2::new(10.0, 20.0));
        assert!(matches!(log.events.first(), Some(GameEvent::Countdown(_))));
    }
}
