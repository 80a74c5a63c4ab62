//! Per-tick simulation step
//!
//! One call advances a run by a (clamped) delta: kinematics, defender AI,
//! collisions, then the difficulty scheduler. The step is a pure function of
//! the previous state, the delta and the input, so identical seeds and input
//! streams replay identically.

use glam::Vec2;
use rand::Rng;

use super::collision::{resolve_pickups, resolve_tackle};
use super::defender::{
    despawn_defenders, separate_defenders, settle_dives, spawn_defenders, update_defenders,
};
use super::difficulty::{
    ai_params, check_milestones, expire_achievement, update_difficulty, update_speed,
};
use super::kinematics::{
    COLLECTIBLE_BOUNDS, PLAYER_BOUNDS, clamp_delta, integrate_player, scroll_delta,
};
use super::state::{GameEvent, RunPhase, RunState};
use crate::consts::COLLECTIBLE_DESPAWN_Y;
use crate::{chance_for_delta, frame_scale};

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Where the player wants to be (from drag/mouse/keys)
    pub move_target: Option<Vec2>,
    /// Jump requested this tick
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by `dt_ms`
///
/// `dt_ms` is clamped to one 60 Hz frame. Paused and finished runs don't move;
/// `state.events` is refilled with what happened during this call.
pub fn tick(state: &mut RunState, input: &TickInput, dt_ms: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            RunPhase::Running => {
                state.phase = RunPhase::Paused;
                log::info!("Run paused at {:.1}s", state.elapsed_ms / 1000.0);
                return;
            }
            RunPhase::Paused => {
                state.phase = RunPhase::Running;
                log::info!("Run resumed");
            }
            RunPhase::Over => {}
        }
    }

    if state.phase != RunPhase::Running {
        return;
    }

    let dt = clamp_delta(dt_ms);
    state.time_ticks += 1;
    state.elapsed_ms += dt as f64;
    let now = state.elapsed_ms;

    // Input
    if let Some(target) = input.move_target {
        state.player.target = PLAYER_BOUNDS.clamp(target);
        state.player.last_input_at = now;
    }
    state.player.update_jump(now, state.tuning.jump_duration_ms);
    if input.jump && state.player.try_jump(now, &state.tuning) {
        state.events.push(GameEvent::JumpStarted);
    }

    // Kinematics
    integrate_player(&mut state.player, &state.tuning, dt);
    let drain = state.tuning.stamina_drain * frame_scale(dt);
    state.player.drain_stamina(drain);
    let scrolled = scroll_delta(state.scroll_speed, dt);
    state.advance_scroll(scrolled);
    advance_collectibles(state, scrolled, dt);

    // Defender AI
    let ai = ai_params(state.difficulty_level);
    update_defenders(state, dt, &ai);
    separate_defenders(state);
    spawn_defenders(state, dt);
    despawn_defenders(state);

    // Collisions
    resolve_pickups(state);
    resolve_tackle(state);
    settle_dives(state);
    if state.is_over() {
        return;
    }

    // Difficulty & milestones
    update_difficulty(state);
    update_speed(state, dt);
    check_milestones(state);
    expire_achievement(state);
}

/// Scroll collectibles with the field, retire the ones past the bottom and
/// roll for a new one
fn advance_collectibles(state: &mut RunState, scrolled: f32, dt_ms: f32) {
    for c in state.pool.collectibles.iter_mut() {
        c.target.y += scrolled;
        c.target = COLLECTIBLE_BOUNDS.clamp(c.target);
        c.pos = c.target;
    }
    state
        .pool
        .collectibles
        .release_where(|c| c.pos.y > COLLECTIBLE_DESPAWN_Y);

    let chance = chance_for_delta(state.tuning.collectible_spawn_chance, dt_ms);
    if state.rng.random_bool(chance) {
        // A full pool just skips this spawn
        state.spawn_collectible();
    }
}
