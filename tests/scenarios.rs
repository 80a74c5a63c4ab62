//! End-to-end run scenarios on a quiet field (no random spawns)

use glam::Vec2;

use gridiron_dash::consts::{DEFENDER_POOL_SIZE, MAX_STAMINA, REFERENCE_FRAME_MS as FRAME};
use gridiron_dash::sim::{
    CollectibleKind, EntityKind, GameEvent, RunPhase, RunState, TickInput, tick,
};
use gridiron_dash::{HighScores, RunResultSink, Tuning, yards_from_scroll};

fn quiet_run(seed: u64) -> RunState {
    RunState::with_tuning(seed, Tuning::without_spawns())
}

fn idle(state: &mut RunState, ticks: usize) {
    for _ in 0..ticks {
        tick(state, &TickInput::default(), FRAME);
    }
}

#[test]
fn stationary_player_drains_stamina_and_covers_ground() {
    let mut state = quiet_run(1);
    let mut last_stamina = state.player.stamina;
    let mut last_score = 0;

    for _ in 0..300 {
        tick(&mut state, &TickInput::default(), FRAME);
        let stamina = state.player.stamina;
        assert!(stamina < last_stamina);
        assert!((last_stamina - stamina - 0.1).abs() < 1e-3);
        assert_eq!(state.score(), yards_from_scroll(state.scroll_offset()));
        assert!(state.score() >= last_score);
        last_stamina = stamina;
        last_score = state.score();
    }

    assert_eq!(state.phase, RunPhase::Running);
    assert!((state.player.stamina - (MAX_STAMINA - 30.0)).abs() < 0.01);
    // 300 frames at 2 px/frame with no milestone yet
    assert_eq!(state.score(), 100);
}

#[test]
fn forced_dive_ends_the_run() {
    let tuning = Tuning {
        dive_probability: 1.0,
        ..Tuning::without_spawns()
    };
    let mut state = RunState::with_tuning(7, tuning);
    let start = state.player.pos - Vec2::new(0.0, 60.0);
    let id = state.spawn_defender_at(start).unwrap();

    tick(&mut state, &TickInput::default(), FRAME);
    assert!(state.events.contains(&GameEvent::DiveStarted { id }));
    assert!(state.pool.defenders.get(id).unwrap().is_diving());

    let mut ticks = 0;
    while !state.is_over() && ticks < 30 {
        tick(&mut state, &TickInput::default(), FRAME);
        ticks += 1;
    }
    assert!(state.is_over());
    assert!(state.events.contains(&GameEvent::Tackled { by: id }));
    assert!(state.elapsed_ms <= 400.0 + 2.0 * FRAME as f64);

    let frozen = state.score();
    idle(&mut state, 20);
    assert_eq!(state.score(), frozen);
    assert!(state.summary().is_some());
}

#[test]
fn jumping_over_a_dive_avoids_the_tackle() {
    let tuning = Tuning {
        dive_probability: 1.0,
        ..Tuning::without_spawns()
    };
    let mut state = RunState::with_tuning(7, tuning);
    let start = state.player.pos - Vec2::new(0.0, 60.0);
    let id = state.spawn_defender_at(start).unwrap();

    let jump = TickInput {
        jump: true,
        ..Default::default()
    };
    tick(&mut state, &jump, FRAME);
    assert!(state.player.is_airborne());

    // Airborne for 600 ms, the dive lasts 400 ms
    let mut downed = false;
    for _ in 0..30 {
        tick(&mut state, &TickInput::default(), FRAME);
        downed |= state.events.contains(&GameEvent::DefenderDown { id });
    }
    assert!(downed);
    assert!(!state.is_over());
}

#[test]
fn pickup_is_consumed_once() {
    let mut state = quiet_run(3);
    let pos = state.player.pos;
    let id = state
        .spawn_collectible_at(pos, CollectibleKind::Currency)
        .unwrap();

    tick(&mut state, &TickInput::default(), FRAME);
    assert_eq!(state.currency, 1);
    assert!(!state.pool.is_active(EntityKind::Collectible, id));
    assert!(matches!(
        state.events.as_slice(),
        [GameEvent::CollectiblePicked {
            kind: CollectibleKind::Currency,
            ..
        }]
    ));

    tick(&mut state, &TickInput::default(), FRAME);
    assert_eq!(state.currency, 1);
    assert!(state.events.is_empty());
}

#[test]
fn energy_pickup_restores_stamina() {
    let mut state = quiet_run(4);
    idle(&mut state, 300);
    let tired = state.player.stamina;
    let pos = state.player.pos;
    state.spawn_collectible_at(pos, CollectibleKind::Energy);
    tick(&mut state, &TickInput::default(), FRAME);
    assert!(state.player.stamina > tired + 20.0);
}

#[test]
fn exhausted_pool_refuses_spawns() {
    let mut state = quiet_run(5);
    let ids: Vec<_> = (0..DEFENDER_POOL_SIZE)
        .map(|i| {
            state
                .spawn_defender_at(Vec2::new(40.0 + i as f32 * 20.0, 50.0))
                .unwrap()
        })
        .collect();
    assert!(state.spawn_defender_at(Vec2::new(200.0, 50.0)).is_none());
    assert!(state.spawn_defender().is_none());

    assert!(state.pool.release(EntityKind::Defender, ids[3]));
    assert!(!state.pool.release(EntityKind::Defender, ids[3]));
    assert!(state.spawn_defender_at(Vec2::new(200.0, 50.0)).is_some());
    assert_eq!(
        state.pool.active_count(EntityKind::Defender),
        DEFENDER_POOL_SIZE
    );
}

#[test]
fn milestones_fire_once_per_hundred_yards() {
    let mut state = quiet_run(6);
    let mut milestones = Vec::new();
    while state.score() < 250 {
        tick(&mut state, &TickInput::default(), FRAME);
        for event in &state.events {
            if let GameEvent::MilestoneReached { yards, .. } = *event {
                milestones.push(yards);
            }
        }
    }
    assert_eq!(milestones, vec![100, 200]);
    assert_eq!(state.currency, 20);
    assert!(state.achievement.is_some());
    // Milestones nudge the target speed up
    assert!(state.target_speed > state.base_speed);
}

#[test]
fn difficulty_rises_with_elapsed_time() {
    let mut state = quiet_run(8);
    let mut levels = Vec::new();
    // Just over 30 s of frames
    for _ in 0..(31 * 60) {
        tick(&mut state, &TickInput::default(), FRAME);
        for event in &state.events {
            if let GameEvent::DifficultyIncreased { level } = *event {
                levels.push(level);
                assert!(event.notification(&state.tuning).is_some());
            }
        }
    }
    assert_eq!(levels, vec![1, 2]);
    assert_eq!(state.defender_cap, 5);
}

#[test]
fn finished_run_reaches_the_board() {
    let mut state = quiet_run(9);
    idle(&mut state, 120);
    let pos = state.player.pos;
    state.spawn_defender_at(pos);
    tick(&mut state, &TickInput::default(), FRAME);
    let summary = state.summary().expect("run should be over");

    let mut scores = HighScores::new();
    scores.submit(&summary, 1_000.0);
    assert_eq!(scores.top_distance(), Some(summary.distance));
}

#[test]
fn restart_begins_a_fresh_run() {
    let mut state = RunState::new(11);
    idle(&mut state, 200);
    state.restart();
    let fresh = RunState::new(11);
    assert_eq!(state.score(), 0);
    assert_eq!(state.elapsed_ms, 0.0);
    assert_eq!(state.player, fresh.player);
    let a: Vec<_> = state.defenders().cloned().collect();
    let b: Vec<_> = fresh.defenders().cloned().collect();
    assert_eq!(a, b);
}
