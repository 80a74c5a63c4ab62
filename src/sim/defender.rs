//! Defender AI
//!
//! Each defender runs a small state machine (`Ready -> Diving -> Down`, see
//! `DiveState`). Ready defenders chase a pattern-adjusted point near the player
//! and may commit to a single dive when close; divers lunge toward a spot just
//! ahead of the player; downed defenders only drift with the field.

use glam::Vec2;
use rand::Rng;

use super::difficulty::AiParams;
use super::kinematics::{DEFENDER_BOUNDS, PLAYER_BOUNDS, scroll_delta, step_toward};
use super::pool::EntityId;
use super::state::{BehaviorPattern, DiveState, GameEvent, RunState};
use crate::consts::{DEFENDER_DESPAWN_Y, MAX_STAMINA};
use crate::{chance_for_delta, frame_scale};

/// Vertical slack before a defender counts as trailing the player
const BEHIND_SLACK: f32 = 10.0;
/// How far a defender must be behind the player to trigger a burst spawn
const BURST_TRIGGER_GAP: f32 = 40.0;

impl BehaviorPattern {
    /// Steering offset from the player for pattern clock `t_ms`
    pub fn offset(self, t_ms: f32, amplitude: f32) -> Vec2 {
        match self {
            BehaviorPattern::Straight => Vec2::ZERO,
            BehaviorPattern::Zigzag => {
                // Triangle wave, one sweep per 1.2 s
                let phase = (t_ms / 1200.0).fract();
                let tri = 4.0 * (phase - 0.5).abs() - 1.0;
                Vec2::new(amplitude * tri, 0.0)
            }
            BehaviorPattern::Curved => {
                let a = t_ms * 0.002;
                Vec2::new(amplitude * a.sin(), amplitude * 0.5 * a.cos())
            }
            BehaviorPattern::Aggressive => {
                // Cut off the runner's lane with a slight sway
                let sway = (t_ms * 0.004).sin() * amplitude * 0.25;
                Vec2::new(sway, -amplitude * 0.5)
            }
        }
    }
}

/// Steer, dive and drift every active defender
pub fn update_defenders(state: &mut RunState, dt_ms: f32, ai: &AiParams) {
    let now = state.elapsed_ms;
    let scale = frame_scale(dt_ms);
    let drift = scroll_delta(state.scroll_speed, dt_ms);
    let player_pos = state.player.pos;
    let tuning = &state.tuning;
    let rng = &mut state.rng;
    let dive_chance = chance_for_delta(tuning.dive_probability, dt_ms);
    let mut dives: Vec<EntityId> = Vec::new();

    for d in state.pool.defenders.iter_mut() {
        match d.dive {
            DiveState::Ready => {
                d.pattern_time += dt_ms;
                let offset = d.pattern.offset(d.pattern_time, ai.pattern_amplitude);
                let jitter = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
                    * tuning.aim_jitter
                    * (1.0 - ai.accuracy);
                d.target = DEFENDER_BOUNDS.clamp(player_pos + offset + jitter);

                let stamina_factor = 0.5 + 0.5 * (d.stamina / MAX_STAMINA);
                let behind = if d.pos.y > player_pos.y + BEHIND_SLACK {
                    tuning.behind_penalty
                } else {
                    1.0
                };
                let speed = d.speed * stamina_factor * behind * ai.speed_multiplier;
                d.pos = step_toward(d.pos, d.target, speed * scale);
                d.pos.y += drift;
                d.pos = DEFENDER_BOUNDS.clamp(d.pos);
                d.stamina = (d.stamina - tuning.defender_stamina_drain * scale).max(0.0);

                let in_range = d.pos.distance(player_pos) <= tuning.dive_trigger_range;
                if in_range && rng.random_bool(dive_chance) {
                    let aim = PLAYER_BOUNDS.clamp(player_pos - Vec2::new(0.0, tuning.dive_lead));
                    if d.start_dive(now, aim) {
                        dives.push(d.id);
                    }
                }
            }
            DiveState::Diving {
                started_at,
                origin,
                target,
            } => {
                let t = ((now - started_at) / tuning.dive_duration_ms as f64).clamp(0.0, 1.0);
                d.pos = DEFENDER_BOUNDS.clamp(origin.lerp(target, t as f32));
            }
            DiveState::Down { .. } => {
                d.pos.y += drift;
                d.pos = DEFENDER_BOUNDS.clamp(d.pos);
            }
        }
    }

    for id in dives {
        log::debug!("Defender {} dives", id.0);
        state.events.push(GameEvent::DiveStarted { id });
    }
}

/// Put divers whose lunge has run its full duration on the ground
///
/// Runs after collision resolution so the final lunge position still counts.
pub fn settle_dives(state: &mut RunState) {
    let now = state.elapsed_ms;
    let duration = state.tuning.dive_duration_ms as f64;
    let mut downed = Vec::new();
    for d in state.pool.defenders.iter_mut() {
        if let DiveState::Diving { started_at, .. } = d.dive
            && now - started_at >= duration
            && d.land(now)
        {
            downed.push(d.id);
        }
    }
    for id in downed {
        state.events.push(GameEvent::DefenderDown { id });
    }
}

/// Push apart defenders closer than `min_separation`
///
/// Only ready defenders are moved: divers are locked into their lunge and
/// downed defenders just drift with the field.
pub fn separate_defenders(state: &mut RunState) {
    let min_sep = state.tuning.defender_separation;
    if min_sep <= 0.0 {
        return;
    }
    let ids: Vec<EntityId> = state
        .pool
        .defenders
        .iter()
        .filter(|d| d.dive == DiveState::Ready)
        .map(|d| d.id)
        .collect();
    let mut positions: Vec<Vec2> = ids
        .iter()
        .filter_map(|&id| state.pool.defenders.get(id).map(|d| d.pos))
        .collect();

    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[j] - positions[i];
            let dist = delta.length();
            if dist >= min_sep {
                continue;
            }
            let dir = if dist > 1e-4 { delta / dist } else { Vec2::X };
            let push = dir * (min_sep - dist) * 0.5;
            positions[i] -= push;
            positions[j] += push;
        }
    }

    for (id, pos) in ids.into_iter().zip(positions) {
        if let Some(d) = state.pool.defenders.get_mut(id) {
            d.pos = DEFENDER_BOUNDS.clamp(pos);
        }
    }
}

/// Roll for new defenders this tick
///
/// All rules share one budget: room under the difficulty cap, bounded by free
/// pool slots. Returns how many spawned.
pub fn spawn_defenders(state: &mut RunState, dt_ms: f32) -> usize {
    let active = state.pool.defenders.active_count();
    let mut budget = state
        .defender_cap
        .saturating_sub(active)
        .min(state.pool.defenders.free_count());
    if budget == 0 {
        return 0;
    }

    let level = state.difficulty_level as f32;
    let tuning = &state.tuning;
    let spawn_chance = chance_for_delta(
        tuning.defender_spawn_chance + tuning.defender_spawn_chance_per_level * level,
        dt_ms,
    );
    let burst_chance = chance_for_delta(
        tuning.burst_chance + tuning.burst_chance_per_level * level,
        dt_ms,
    );
    let burst_size = tuning.burst_size;

    let mut spawned = 0;
    if state.rng.random_bool(spawn_chance) && state.spawn_defender().is_some() {
        spawned += 1;
        budget -= 1;
    }

    // Keep pressure on a runner who has slipped past the chasers
    let player_y = state.player.pos.y;
    let outran = state
        .defenders()
        .any(|d| !d.has_dived() && d.pos.y > player_y + BURST_TRIGGER_GAP);
    if budget > 0 && outran && state.rng.random_bool(burst_chance) {
        for _ in 0..burst_size.min(budget) {
            if state.spawn_defender().is_none() {
                break;
            }
            spawned += 1;
        }
    }
    spawned
}

/// Release defenders that scrolled past the trailing edge
pub fn despawn_defenders(state: &mut RunState) -> usize {
    state
        .pool
        .defenders
        .release_where(|d| d.pos.y > DEFENDER_DESPAWN_Y)
        .len()
}
