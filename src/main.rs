//! Rain Dodge entry point
//!
//! Native builds run a headless demo: an autopilot tilts the player away from
//! incoming rain while the HUD events are logged.
//!
//! Usage: `rain-dodge [easy|normal|hard] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use glam::Vec2;
    use rain_dodge::highscores::HighScoreEntry;
    use rain_dodge::sim::{CountdownText, GameCallback, GameManager, GameState, TextColor};
    use rain_dodge::{DifficultyPreset, DifficultyTable, HighScores, Settings, SimConfig};

    /// Playfield of a typical portrait phone (dp)
    const PLAYFIELD: Vec2 = Vec2::new(411.0, 731.0);
    /// Give up after this long even if the autopilot survives
    const MAX_RUN_SECS: u64 = 60;

    /// Logs HUD updates instead of drawing them
    #[derive(Default)]
    struct ConsoleHud {
        last_countdown: String,
        missed: u64,
    }

    impl GameCallback for ConsoleHud {
        fn on_object_missed(&mut self, score_delta: u64) {
            self.missed += 1;
            log::debug!("Dodged (+{})", score_delta);
        }

        fn on_game_over(&mut self, final_score: u64) {
            log::info!("GAME OVER - final score {}", final_score);
        }

        fn on_level_up(&mut self, level: u32) {
            log::info!("Level {}!", level);
        }

        fn on_countdown_text_update(&mut self, countdown: &CountdownText) {
            // Only log when the visible text changes
            if countdown.text != self.last_countdown {
                if countdown.color == TextColor::Warning {
                    log::info!("{} (alpha {:.1})", countdown.text, countdown.alpha);
                } else if !countdown.text.is_empty() {
                    log::debug!("{}", countdown.text);
                }
                self.last_countdown.clone_from(&countdown.text);
            }
        }
    }

    /// Tilt reading that steers the player away from the closest drop above it
    fn autopilot_tilt(state: &GameState) -> Vec2 {
        let player = state.player.bounds();
        let player_cx = player.pos.x + player.size.x / 2.0;

        let threat = state
            .raindrops
            .iter()
            .filter(|drop| drop.pos.y + drop.size.y <= player.max().y)
            .filter(|drop| drop.pos.x < player.max().x && drop.pos.x + drop.size.x > player.pos.x)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let Some(drop) = threat else {
            return Vec2::ZERO;
        };
        let drop_cx = drop.pos.x + drop.size.x / 2.0;
        let room_right = state.playfield_size().x - player.max().x;

        // Negative x tilt moves right
        if (drop_cx < player_cx && room_right > 0.0) || player.pos.x <= 0.0 {
            Vec2::new(-1.0, 0.0)
        } else {
            Vec2::new(1.0, 0.0)
        }
    }

    fn load_config(path: Option<&str>) -> SimConfig {
        let Some(path) = path else {
            return SimConfig::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => SimConfig::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {} ({}), using default config", path, e);
                SimConfig::default()
            }
        }
    }

    pub fn run() {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let preset = args
            .first()
            .and_then(|s| DifficultyPreset::from_str(s))
            .unwrap_or_default();
        let config = load_config(args.get(1).map(String::as_str));
        let tick_interval = Duration::from_millis(config.tick_interval_ms);

        let mut settings = Settings::load(None);
        let mut high_scores = HighScores::load(None);
        let table = DifficultyTable::default();
        let params = table.params(preset);

        let mut game = GameManager::new(config, ConsoleHud::default());
        game.set_playfield(Some(PLAYFIELD));
        game.start(params.spawn_chance, params.score_multiplier);
        log::info!(
            "Playing on {} ({})",
            preset.as_str(),
            table.label_for_spawn_chance(params.spawn_chance)
        );

        while !game.is_game_over() {
            if game.run_summary().duration_secs >= MAX_RUN_SECS {
                log::info!("Time limit reached");
                game.stop();
                break;
            }
            let tilt = autopilot_tilt(game.state());
            game.apply_tilt(tilt);
            game.poll();
            std::thread::sleep(tick_interval);
        }

        let summary = game.run_summary();
        log::info!(
            "Run over: score {}, level {}, {}s, {} drops dodged",
            summary.score,
            summary.level,
            summary.duration_secs,
            game.callback().missed
        );

        settings.last_preset = preset;
        if settings.record_score(summary.score) {
            log::info!("New best score!");
        }
        if let Some(rank) = high_scores.add(HighScoreEntry::from_summary(&summary, Some(preset))) {
            log::info!("Leaderboard rank #{}", rank);
        }

        match (settings.to_json(), high_scores.to_json()) {
            (Ok(settings), Ok(scores)) => {
                log::debug!("settings: {}", settings);
                log::debug!("highscores: {}", scores);
            }
            (Err(e), _) | (_, Err(e)) => log::warn!("Failed to serialize save data: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rain Dodge (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly
}
