//! Collision detection and outcome resolution
//!
//! Everything is a circle-distance test against the player: pickups within the
//! pickup radius are consumed, defenders within tackle range end the run.

use glam::Vec2;

use super::pool::EntityId;
use super::state::{CollectibleKind, DiveState, GameEvent, RunPhase, RunState};

/// Whether two points are closer than `radius`
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Consume every collectible touching the player
///
/// Each match is released from the pool immediately, so a collectible can
/// never be counted twice. Returns the number consumed.
pub fn resolve_pickups(state: &mut RunState) -> usize {
    let player_pos = state.player.pos;
    let radius = state.tuning.pickup_radius;
    let touched: Vec<(EntityId, CollectibleKind, Vec2)> = state
        .collectibles()
        .filter(|c| within_radius(c.pos, player_pos, radius))
        .map(|c| (c.id, c.kind, c.pos))
        .collect();

    let mut consumed = 0;
    for (id, kind, pos) in touched {
        if !state.pool.collectibles.release(id) {
            continue;
        }
        match kind {
            CollectibleKind::Energy => {
                let amount = state.tuning.energy_restore;
                state.player.restore_stamina(amount);
            }
            CollectibleKind::Currency => state.currency += 1,
        }
        state
            .events
            .push(GameEvent::CollectiblePicked { id, kind, pos });
        consumed += 1;
    }
    consumed
}

/// First defender in contact with the player, if any
///
/// Chasing defenders tackle inside the tackle radius, divers inside the larger
/// dive radius, downed defenders never. An airborne player can't be touched.
pub fn find_tackler(state: &RunState) -> Option<EntityId> {
    if state.player.is_airborne() {
        return None;
    }
    let player_pos = state.player.pos;
    let tuning = &state.tuning;
    state
        .defenders()
        .find(|d| match d.dive {
            DiveState::Ready => within_radius(d.pos, player_pos, tuning.tackle_radius),
            DiveState::Diving { .. } => {
                within_radius(d.pos, player_pos, tuning.dive_tackle_radius)
            }
            DiveState::Down { .. } => false,
        })
        .map(|d| d.id)
}

/// End the run if a defender made contact. Returns whether the run ended.
pub fn resolve_tackle(state: &mut RunState) -> bool {
    if state.is_over() {
        return false;
    }
    let Some(by) = find_tackler(state) else {
        return false;
    };
    state.phase = RunPhase::Over;
    state.events.push(GameEvent::Tackled { by });
    log::info!(
        "Tackled by defender {} after {} yards ({} coins)",
        by.0,
        state.score(),
        state.currency
    );
    true
}
