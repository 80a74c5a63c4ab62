//! Kinematics and boundary model
//!
//! Delta-time handling, smoothed movement, field bounds and scrolling. All
//! per-frame rates are expressed for a 60 Hz reference frame and rescaled by
//! the (clamped) delta, so a stalled host never integrates a huge step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PlayerState;
use crate::consts::*;
use crate::frame_scale;
use crate::tuning::Tuning;

/// Axis-aligned legal area for an entity class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Where the player may stand
pub const PLAYER_BOUNDS: Bounds = Bounds::new(
    Vec2::new(PLAYER_MARGIN, PLAYER_MARGIN),
    Vec2::new(FIELD_WIDTH - PLAYER_MARGIN, FIELD_HEIGHT - PLAYER_MARGIN),
);

/// Defenders stay between the sidelines; the bottom is handled by despawn
pub const DEFENDER_BOUNDS: Bounds = Bounds::new(
    Vec2::new(DEFENDER_MARGIN, ENTITY_TOP_LIMIT),
    Vec2::new(FIELD_WIDTH - DEFENDER_MARGIN, f32::MAX),
);

pub const COLLECTIBLE_BOUNDS: Bounds = Bounds::new(
    Vec2::new(COLLECTIBLE_MARGIN, ENTITY_TOP_LIMIT),
    Vec2::new(FIELD_WIDTH - COLLECTIBLE_MARGIN, f32::MAX),
);

/// Clamp a raw delta to `[0, MAX_DELTA_MS]`
#[inline]
pub fn clamp_delta(dt_ms: f32) -> f32 {
    if dt_ms.is_finite() {
        dt_ms.clamp(0.0, MAX_DELTA_MS)
    } else {
        0.0
    }
}

/// Turns host frame timestamps into clamped simulation deltas
///
/// After a pause the host calls `rebase` with the resume time so the paused
/// wall-clock gap is never fed to the simulation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame, clamped. The first frame yields 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        clamp_delta(dt)
    }

    /// Restart delta measurement from `now_ms`
    pub fn rebase(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Per-frame blend factor rescaled for `dt_ms`
///
/// `1 - (1 - blend)^(dt / frame)`, so two half frames cover the same ground as
/// one full frame.
#[inline]
pub fn blend_for_delta(blend: f32, dt_ms: f32) -> f32 {
    1.0 - (1.0 - blend.clamp(0.0, 1.0)).powf(frame_scale(dt_ms))
}

/// Exponential approach toward `target`, limited to `max_step` per call
#[inline]
pub fn smooth_toward(current: Vec2, target: Vec2, blend: f32, max_step: f32) -> Vec2 {
    let step = (target - current) * blend;
    current + step.clamp_length_max(max_step.max(0.0))
}

/// Move straight toward `target` by at most `max_dist`
#[inline]
pub fn step_toward(current: Vec2, target: Vec2, max_dist: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_dist || dist <= f32::EPSILON {
        target
    } else {
        current + delta / dist * max_dist
    }
}

/// Scalar exponential approach (speed tracking)
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt_ms: f32) -> f32 {
    current + (target - current) * blend_for_delta(rate, dt_ms)
}

/// Field scroll in pixels for this delta
#[inline]
pub fn scroll_delta(scroll_speed: f32, dt_ms: f32) -> f32 {
    scroll_speed.max(0.0) * frame_scale(dt_ms)
}

/// Ease the player toward its target and keep both inside the field
pub fn integrate_player(player: &mut PlayerState, tuning: &Tuning, dt_ms: f32) {
    player.target = PLAYER_BOUNDS.clamp(player.target);
    let blend = blend_for_delta(tuning.player_smoothing, dt_ms);
    let max_step = tuning.player_max_step * player.speed_factor() * frame_scale(dt_ms);
    player.pos = PLAYER_BOUNDS.clamp(smooth_toward(player.pos, player.target, blend, max_step));
}
