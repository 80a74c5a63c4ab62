//! Difficulty tiers and distance milestones
//!
//! Both checks are edge-triggered: a tier increase or milestone fires its side
//! effects exactly once, on the tick the threshold is crossed.

use super::kinematics::approach;
use super::state::{Achievement, GameEvent, RunState};

/// One row of the difficulty table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    /// Elapsed run seconds at which the tier begins
    pub from_secs: f32,
    pub defender_cap: usize,
    /// Multiplier applied to base scroll speed
    pub speed_multiplier: f32,
}

pub const TIERS: [Tier; 7] = [
    Tier {
        from_secs: 0.0,
        defender_cap: 3,
        speed_multiplier: 1.0,
    },
    Tier {
        from_secs: 15.0,
        defender_cap: 4,
        speed_multiplier: 1.15,
    },
    Tier {
        from_secs: 30.0,
        defender_cap: 5,
        speed_multiplier: 1.3,
    },
    Tier {
        from_secs: 60.0,
        defender_cap: 6,
        speed_multiplier: 1.45,
    },
    Tier {
        from_secs: 90.0,
        defender_cap: 8,
        speed_multiplier: 1.6,
    },
    Tier {
        from_secs: 120.0,
        defender_cap: 10,
        speed_multiplier: 1.8,
    },
    Tier {
        from_secs: 180.0,
        defender_cap: 12,
        speed_multiplier: 2.0,
    },
];

pub const MAX_LEVEL: u8 = (TIERS.len() - 1) as u8;

/// Tier for a level (levels past the table use the last tier)
pub fn tier(level: u8) -> Tier {
    TIERS[(level as usize).min(TIERS.len() - 1)]
}

/// Difficulty level for a run time
pub fn level_for_elapsed(elapsed_ms: f64) -> u8 {
    let secs = (elapsed_ms / 1000.0) as f32;
    TIERS
        .iter()
        .rposition(|t| secs >= t.from_secs)
        .unwrap_or(0) as u8
}

/// Defender tuning derived from the difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiParams {
    /// Multiplier on defender chase speed
    pub speed_multiplier: f32,
    /// 0..1, reduces aim jitter
    pub accuracy: f32,
    /// Pattern oscillation amplitude (pixels); shrinks as difficulty rises
    pub pattern_amplitude: f32,
}

pub fn ai_params(level: u8) -> AiParams {
    let level = level.min(MAX_LEVEL) as f32;
    AiParams {
        speed_multiplier: 1.0 + 0.15 * level,
        accuracy: (0.5 + 0.075 * level).min(0.95),
        pattern_amplitude: 40.0 * (1.0 - 0.1 * level),
    }
}

/// Raise the level when the run time crosses a tier boundary
///
/// Returns whether the level increased this call.
pub fn update_difficulty(state: &mut RunState) -> bool {
    let level = level_for_elapsed(state.elapsed_ms).min(MAX_LEVEL);
    if level <= state.difficulty_level {
        return false;
    }
    state.difficulty_level = level;
    state.defender_cap = tier(level).defender_cap;
    log::info!(
        "Difficulty level {} at {:.1}s (cap {})",
        level,
        state.elapsed_ms / 1000.0,
        state.defender_cap
    );
    state.events.push(GameEvent::DifficultyIncreased { level });
    true
}

/// Recompute target speed and ease the scroll speed toward it
pub fn update_speed(state: &mut RunState, dt_ms: f32) {
    state.target_speed =
        state.base_speed * tier(state.difficulty_level).speed_multiplier + state.milestone_bonus;
    state.scroll_speed = approach(
        state.scroll_speed,
        state.target_speed,
        state.tuning.speed_approach,
        dt_ms,
    );
}

/// Award every milestone crossed since the last check
///
/// Returns how many fired.
pub fn check_milestones(state: &mut RunState) -> u32 {
    let step = state.tuning.milestone_yards.max(1);
    let mut fired = 0;
    while state.score() >= state.last_milestone + step {
        state.last_milestone += step;
        let yards = state.last_milestone;
        let reward = state.tuning.milestone_reward;

        state.currency += reward;
        state.milestone_bonus = (state.milestone_bonus + state.tuning.milestone_speed_bonus)
            .min(state.tuning.milestone_speed_bonus_cap);
        state.achievement = Some(Achievement {
            message: format!("{yards} yards! +{reward} coins"),
            reward,
            expires_at: state.elapsed_ms + state.tuning.milestone_notice_ms as f64,
        });
        state.events.push(GameEvent::MilestoneReached { yards, reward });
        log::info!("Milestone {yards} yards (+{reward} coins)");
        fired += 1;
    }
    fired
}

/// Clear the milestone notice once its display window has passed
pub fn expire_achievement(state: &mut RunState) {
    if state
        .achievement
        .as_ref()
        .is_some_and(|a| state.elapsed_ms >= a.expires_at)
    {
        state.achievement = None;
    }
}
