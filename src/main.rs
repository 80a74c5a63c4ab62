//! Gridiron Dash entry point
//!
//! Native builds play a headless demo run with a simple bot. The web build
//! exposes a `WebRun` handle that the page's render loop drives each frame.

#[cfg(target_arch = "wasm32")]
mod web_run {
    use wasm_bindgen::prelude::*;

    use gridiron_dash::persistence::LocalStorageStore;
    use gridiron_dash::sim::{FrameClock, GameEvent, Notification, RunState, TickInput, tick};
    use gridiron_dash::{HighScores, LearningTracker, RunResultSink, Tuning};

    /// Sim time between tracker movement samples (ms)
    const TRACK_INTERVAL_MS: f64 = 100.0;

    /// One browser-hosted run plus everything persisted around it
    #[wasm_bindgen]
    pub struct WebRun {
        state: RunState,
        clock: FrameClock,
        input: TickInput,
        store: LocalStorageStore,
        tracker: LearningTracker,
        scores: HighScores,
        notifications: Vec<Notification>,
        last_tracked_ms: f64,
        submitted: bool,
    }

    #[wasm_bindgen]
    impl WebRun {
        /// Start a run. `seed` is truncated to an integer (pass `Date.now()`).
        #[wasm_bindgen(constructor)]
        pub fn new(seed: f64) -> WebRun {
            let store = LocalStorageStore;
            let tuning = Tuning::load(&store);
            let tracker = LearningTracker::load(&store);
            let scores = HighScores::load(&store);
            log::info!("Run handle created with seed {}", seed as u64);
            WebRun {
                state: RunState::with_tuning(seed as u64, tuning),
                clock: FrameClock::new(),
                input: TickInput::default(),
                store,
                tracker,
                scores,
                notifications: Vec::new(),
                last_tracked_ms: 0.0,
                submitted: false,
            }
        }

        /// Advance by the time since the previous frame. Returns false once
        /// the run is over.
        pub fn frame(&mut self, now_ms: f64) -> bool {
            let dt = self.clock.delta(now_ms);
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt);

            let now = self.state.elapsed_ms;
            if input.jump && !self.state.events.contains(&GameEvent::JumpStarted) {
                self.tracker.track_jump(now, false);
            }
            self.tracker.observe(&self.state.events, now);
            if now - self.last_tracked_ms >= TRACK_INTERVAL_MS {
                self.tracker.track_movement(self.state.player.pos, now);
                self.last_tracked_ms = now;
            }

            let tuning = &self.state.tuning;
            self.notifications.extend(
                self.state
                    .events
                    .iter()
                    .filter_map(|e| e.notification(tuning)),
            );

            if let Some(summary) = self.state.summary()
                && !self.submitted
            {
                self.submitted = true;
                self.scores.submit(&summary, js_sys::Date::now());
                self.scores.save(&mut self.store);
                self.tracker.save(&mut self.store);
            }
            !self.state.is_over()
        }

        /// Field position the player should run toward
        pub fn set_move_target(&mut self, x: f32, y: f32) {
            self.input.move_target = Some(glam::Vec2::new(x, y));
        }

        pub fn request_jump(&mut self) {
            self.input.jump = true;
        }

        /// Toggle pause. Resuming re-bases the frame clock so the paused gap
        /// is not simulated.
        pub fn toggle_pause(&mut self, now_ms: f64) {
            let input = TickInput {
                pause: true,
                ..Default::default()
            };
            tick(&mut self.state, &input, 0.0);
            self.clock.rebase(now_ms);
        }

        pub fn is_paused(&self) -> bool {
            self.state.is_paused()
        }

        /// Full run state as JSON for the renderer
        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&self.state).unwrap_or_default()
        }

        /// Pending notifications as a JSON array (drained)
        pub fn notifications_json(&mut self) -> String {
            let pending = std::mem::take(&mut self.notifications);
            serde_json::to_string(&pending).unwrap_or_default()
        }

        /// Final results once the run is over
        pub fn summary_json(&self) -> Option<String> {
            self.state
                .summary()
                .and_then(|s| serde_json::to_string(&s).ok())
        }

        pub fn high_scores_json(&self) -> String {
            serde_json::to_string(&self.scores).unwrap_or_default()
        }

        /// Yards covered
        pub fn score(&self) -> f64 {
            self.state.score() as f64
        }

        pub fn currency(&self) -> u32 {
            self.state.currency
        }

        pub fn adaptation_level(&self) -> f32 {
            self.tracker.adaptation_level()
        }

        /// Start a new run with a fresh seed (pass `Date.now()`)
        pub fn restart(&mut self, seed: f64) {
            self.state.restart_with_seed(seed as u64);
            self.clock.reset();
            self.input = TickInput::default();
            self.notifications.clear();
            self.last_tracked_ms = 0.0;
            self.submitted = false;
        }
    }

    #[wasm_bindgen(start)]
    pub fn wasm_main() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Gridiron Dash loaded");
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use gridiron_dash::consts::{FIELD_WIDTH, PLAYER_SPAWN_Y, REFERENCE_FRAME_MS};
    use gridiron_dash::persistence::MemoryStore;
    use gridiron_dash::sim::{RunState, TickInput, tick};
    use gridiron_dash::{HighScores, LearningTracker, RunResultSink, Tuning};

    /// Five minutes of 60 Hz frames
    const MAX_TICKS: u64 = 5 * 60 * 60;
    const TRACK_EVERY: u64 = 6;
    const THREAT_RANGE: f32 = 150.0;
    const DODGE_STEP: f32 = 60.0;
    const JUMP_RANGE: f32 = 60.0;

    /// Pick this frame's input: sidestep the nearest defender ahead, otherwise
    /// go for the closest collectible, otherwise drift back to the middle.
    pub fn bot_input(state: &RunState) -> TickInput {
        let me = state.player.pos;

        let threat = state
            .defenders()
            .filter(|d| !d.is_down() && d.pos.y < me.y + 20.0)
            .map(|d| (d, d.pos.distance(me)))
            .filter(|(_, dist)| *dist < THREAT_RANGE)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let jump = threat.is_some_and(|(d, dist)| dist < JUMP_RANGE && d.is_diving());

        let move_target = match threat {
            Some((d, _)) => {
                let away = if d.pos.x > me.x { -1.0 } else { 1.0 };
                // Cut back toward the open side near the sidelines
                let away = if (me.x < 60.0 && away < 0.0) || (me.x > FIELD_WIDTH - 60.0 && away > 0.0)
                {
                    -away
                } else {
                    away
                };
                Vec2::new(me.x + away * DODGE_STEP, me.y)
            }
            None => state
                .collectibles()
                .filter(|c| c.pos.y < me.y && c.pos.y > me.y - 200.0)
                .min_by(|a, b| a.pos.distance(me).total_cmp(&b.pos.distance(me)))
                .map(|c| c.pos)
                .unwrap_or(Vec2::new(FIELD_WIDTH / 2.0, PLAYER_SPAWN_Y)),
        };

        TickInput {
            move_target: Some(move_target),
            jump,
            pause: false,
        }
    }

    fn load_tuning(path: Option<String>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {path}: {e}");
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg.parse().unwrap_or_else(|_| {
                log::warn!("Seed {arg:?} is not a number, using 42");
                42
            }),
            None => 42,
        };
        let tuning = load_tuning(args.next());

        let mut store = MemoryStore::default();
        let mut tracker = LearningTracker::load(&store);
        let mut scores = HighScores::load(&store);
        let mut state = RunState::with_tuning(seed, tuning);

        while !state.is_over() && state.time_ticks < MAX_TICKS {
            let input = bot_input(&state);
            tick(&mut state, &input, REFERENCE_FRAME_MS);

            let now = state.elapsed_ms;
            tracker.observe(&state.events, now);
            if state.time_ticks % TRACK_EVERY == 0 {
                tracker.track_movement(state.player.pos, now);
            }
            for event in &state.events {
                log::debug!("{event:?}");
                if let Some(n) = event.notification(&state.tuning) {
                    log::info!("{}: {}", n.title, n.message);
                }
            }
        }

        let params = tracker.adaptive_params(state.score(), state.elapsed_ms);
        log::info!(
            "Tracker: side {:?}, adaptation {:.2}, counters {:?}",
            tracker.profile.preferred_side,
            tracker.adaptation_level(),
            params.counter_patterns
        );

        match state.summary() {
            Some(summary) => {
                scores.submit(&summary, state.elapsed_ms);
                scores.save(&mut store);
                tracker.save(&mut store);
                println!(
                    "Tackled after {} yards, {} coins, {:.1}s (level {})",
                    summary.distance,
                    summary.currency,
                    summary.elapsed_ms / 1000.0,
                    summary.difficulty_level + 1
                );
            }
            None => println!(
                "Still running after {:.0}s: {} yards, {} coins",
                state.elapsed_ms / 1000.0,
                state.score(),
                state.currency
            ),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gridiron Dash (native) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
