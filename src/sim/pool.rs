//! Fixed-capacity entity pools
//!
//! Defenders and collectibles live in pre-allocated slots that are reused by
//! identity. A handle (`EntityId`) is only meaningful while its slot is active;
//! once released the same id may be handed out again, so callers re-check
//! `is_active` before trusting a retained handle.

use serde::{Deserialize, Serialize};

use super::state::{Collectible, Defender};
use crate::consts::{COLLECTIBLE_POOL_SIZE, DEFENDER_POOL_SIZE};

/// Pool slot identity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

/// Which pool an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Defender,
    Collectible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    active: bool,
    entity: T,
}

/// A fixed set of reusable slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

impl<T: Default> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                active: false,
                entity: T::default(),
            })
            .collect();
        Self { slots }
    }

    /// Claim a free slot and initialize it
    ///
    /// The entity is reset to its default before `init` runs, so nothing from
    /// the slot's previous life leaks through. Returns `None` when every slot
    /// is active; that is a "spawn skipped" outcome, not an error.
    pub fn acquire(&mut self, init: impl FnOnce(EntityId, &mut T)) -> Option<EntityId> {
        let index = self.slots.iter().position(|s| !s.active)?;
        let id = EntityId(index as u32);
        let slot = &mut self.slots[index];
        slot.entity = T::default();
        init(id, &mut slot.entity);
        slot.active = true;
        Some(id)
    }
}

impl<T> Pool<T> {
    /// Free a slot. Releasing a free or unknown slot is a no-op.
    ///
    /// Returns whether the slot was active.
    pub fn release(&mut self, id: EntityId) -> bool {
        match self.slots.get_mut(id.0 as usize) {
            Some(slot) if slot.active => {
                slot.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.slots
            .get(id.0 as usize)
            .is_some_and(|slot| slot.active)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .get(id.0 as usize)
            .filter(|slot| slot.active)
            .map(|slot| &slot.entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .get_mut(id.0 as usize)
            .filter(|slot| slot.active)
            .map(|slot| &mut slot.entity)
    }

    /// Active entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.active).map(|s| &s.entity)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots
            .iter_mut()
            .filter(|s| s.active)
            .map(|s| &mut s.entity)
    }

    /// Ids of active slots in slot order
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, _)| EntityId(i as u32))
            .collect()
    }

    /// Release every active entity the predicate rejects, returning their ids
    pub fn release_where(&mut self, mut reject: impl FnMut(&T) -> bool) -> Vec<EntityId> {
        let mut released = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.active && reject(&slot.entity) {
                slot.active = false;
                released.push(EntityId(i as u32));
            }
        }
        released
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.capacity() - self.active_count()
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }
}

/// The two entity pools a run owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool {
    pub defenders: Pool<Defender>,
    pub collectibles: Pool<Collectible>,
}

impl Default for EntityPool {
    fn default() -> Self {
        Self {
            defenders: Pool::with_capacity(DEFENDER_POOL_SIZE),
            collectibles: Pool::with_capacity(COLLECTIBLE_POOL_SIZE),
        }
    }
}

impl EntityPool {
    pub fn release(&mut self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Defender => self.defenders.release(id),
            EntityKind::Collectible => self.collectibles.release(id),
        }
    }

    pub fn is_active(&self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Defender => self.defenders.is_active(id),
            EntityKind::Collectible => self.collectibles.is_active(id),
        }
    }

    pub fn active_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Defender => self.defenders.active_count(),
            EntityKind::Collectible => self.collectibles.active_count(),
        }
    }

    pub fn clear(&mut self) {
        self.defenders.clear();
        self.collectibles.clear();
    }
}
