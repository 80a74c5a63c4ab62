//! Gridiron Dash - An endless-runner football arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, defender AI, collisions, difficulty)
//! - `learning`: Adaptive tracker for observed player habits
//! - `tuning`: Data-driven game balance
//! - `persistence`: Key/value blob storage (LocalStorage on web)
//! - `highscores`: Local run history

pub mod error;
pub mod highscores;
pub mod learning;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::{LearningError, TuningError};
pub use highscores::{HighScores, RunResultSink};
pub use learning::LearningTracker;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Field dimensions (pixels, y grows toward the player's back)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    pub const SIDELINE_X: f32 = 20.0;

    /// Reference frame time the per-frame constants are expressed in (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest delta a single tick may integrate
    pub const MAX_DELTA_MS: f32 = REFERENCE_FRAME_MS;

    /// Scroll pixels per yard of distance (yard lines every 10 yards = 60px)
    pub const PIXELS_PER_YARD: f64 = 6.0;
    /// Scroll speed at the start of a run (pixels per reference frame)
    pub const BASE_SCROLL_SPEED: f32 = 2.0;

    pub const MAX_STAMINA: f32 = 100.0;

    /// Player movement box
    pub const PLAYER_MARGIN: f32 = 30.0;
    pub const PLAYER_SPAWN_X: f32 = FIELD_WIDTH / 2.0;
    pub const PLAYER_SPAWN_Y: f32 = FIELD_HEIGHT - 100.0;

    /// Pool capacities
    pub const DEFENDER_POOL_SIZE: usize = 15;
    pub const COLLECTIBLE_POOL_SIZE: usize = 20;

    /// Entity lateral margins and vertical bands
    pub const DEFENDER_MARGIN: f32 = 30.0;
    pub const COLLECTIBLE_MARGIN: f32 = 15.0;
    pub const ENTITY_TOP_LIMIT: f32 = -40.0;
    pub const DEFENDER_SPAWN_Y: f32 = -20.0;
    pub const COLLECTIBLE_SPAWN_Y: f32 = -15.0;
    pub const DEFENDER_DESPAWN_Y: f32 = FIELD_HEIGHT + 50.0;
    pub const COLLECTIBLE_DESPAWN_Y: f32 = FIELD_HEIGHT + 30.0;
}

/// Delta time expressed in reference frames (1.0 = one 60 Hz frame)
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::REFERENCE_FRAME_MS
}

/// Convert a per-reference-frame probability into the probability for `dt_ms`
///
/// Keeps spawn/dive rates independent of the host frame rate. A chance of 1.0
/// stays 1.0 for any positive delta.
#[inline]
pub fn chance_for_delta(per_frame: f32, dt_ms: f32) -> f64 {
    let p = per_frame.clamp(0.0, 1.0) as f64;
    if dt_ms <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    1.0 - (1.0 - p).powf(frame_scale(dt_ms) as f64)
}

/// Whole yards covered by an accumulated scroll offset
#[inline]
pub fn yards_from_scroll(scroll_offset: f64) -> u64 {
    (scroll_offset.max(0.0) / consts::PIXELS_PER_YARD).floor() as u64
}
