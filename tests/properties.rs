//! Property tests over arbitrary seeds, input streams and frame timings

use glam::Vec2;
use proptest::prelude::*;

use gridiron_dash::consts::{MAX_DELTA_MS, MAX_STAMINA};
use gridiron_dash::sim::{
    EntityKind, MAX_LEVEL, PLAYER_BOUNDS, RunState, TickInput, level_for_elapsed, tick,
};
use gridiron_dash::{LearningTracker, chance_for_delta};

fn input_strategy() -> impl Strategy<Value = TickInput> {
    (
        prop::option::of((-200.0f32..600.0, -200.0f32..800.0)),
        prop::bool::weighted(0.05),
        prop::bool::weighted(0.01),
    )
        .prop_map(|(target, jump, pause)| TickInput {
            move_target: target.map(|(x, y)| Vec2::new(x, y)),
            jump,
            pause,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn run_invariants_hold(
        seed in any::<u64>(),
        inputs in prop::collection::vec((input_strategy(), -50.0f32..200.0), 1..400),
    ) {
        let mut state = RunState::new(seed);
        let mut last_score = 0;
        let mut was_over = false;

        for (input, dt) in &inputs {
            let elapsed_before = state.elapsed_ms;
            tick(&mut state, input, *dt);

            prop_assert!((0.0..=MAX_STAMINA).contains(&state.player.stamina));
            prop_assert!(state.difficulty_level <= MAX_LEVEL);
            prop_assert!(PLAYER_BOUNDS.contains(state.player.pos));
            prop_assert!(state.elapsed_ms - elapsed_before <= MAX_DELTA_MS as f64 + 1e-9);
            prop_assert!(
                state.pool.active_count(EntityKind::Defender) <= state.defender_cap
            );

            prop_assert!(state.score() >= last_score);
            if was_over {
                prop_assert_eq!(state.score(), last_score);
            }
            last_score = state.score();
            was_over = state.is_over();
        }
    }

    #[test]
    fn difficulty_level_is_monotonic_and_capped(a in 0.0f64..1e7, b in 0.0f64..1e7) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(level_for_elapsed(lo) <= level_for_elapsed(hi));
        prop_assert!(level_for_elapsed(hi) <= MAX_LEVEL);
    }

    #[test]
    fn delta_chance_is_a_probability(p in -1.0f32..2.0, dt in -100.0f32..100.0) {
        let chance = chance_for_delta(p, dt);
        prop_assert!((0.0..=1.0).contains(&chance));
    }

    #[test]
    fn learning_state_survives_export(
        points in prop::collection::vec((0.0f32..400.0, 0.0f32..600.0), 10..150),
        jumps in prop::collection::vec(0.0f64..1e6, 0..60),
        outcomes in prop::collection::vec(any::<bool>(), 0..120),
    ) {
        let mut tracker = LearningTracker::new();
        for (i, (x, y)) in points.iter().enumerate() {
            tracker.track_movement(Vec2::new(*x, *y), i as f64 * 16.0);
        }
        for t in &jumps {
            tracker.track_jump(*t, true);
        }
        for (i, success) in outcomes.iter().enumerate() {
            tracker.update_adaptation(*success, "move", "chase", i as f64);
        }

        let level = tracker.adaptation_level();
        prop_assert!((0.0..=10.0).contains(&level));

        let restored = LearningTracker::import(&tracker.export());
        prop_assert_eq!(restored, tracker);
    }
}
