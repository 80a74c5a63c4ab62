//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only from the delta passed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod collision;
pub mod defender;
pub mod difficulty;
pub mod kinematics;
pub mod pool;
pub mod state;
pub mod tick;

pub use collision::{find_tackler, resolve_pickups, resolve_tackle, within_radius};
pub use difficulty::{AiParams, MAX_LEVEL, TIERS, Tier, ai_params, level_for_elapsed};
pub use kinematics::{Bounds, FrameClock, PLAYER_BOUNDS, clamp_delta};
pub use pool::{EntityId, EntityKind, EntityPool, Pool};
pub use state::{
    Achievement, BehaviorPattern, Collectible, CollectibleKind, Defender, DiveState, GameEvent,
    JumpState, Notification, PlayerState, RunPhase, RunState, RunSummary,
};
pub use tick::{TickInput, tick};
