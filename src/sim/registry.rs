//! Entity registry and dense component storage
//!
//! One `ComponentStore<T>` per component type. Values are packed in a dense
//! `Vec<T>` (stable insertion order, swap-remove on delete) with a sparse
//! entity-id → slot index beside it, so iteration is a linear walk and lookup
//! is O(1). Iteration order is part of the determinism contract.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use super::components::{
    Archetype, Dash, DeathTimer, Enemy, Jumper, Motion, Obstacle, Projectile,
};
use super::events::SimEvent;
use super::mesh::Mesh;

/// Opaque entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }

    #[inline]
    fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Dense storage for one component type
#[derive(Debug, Clone)]
pub struct ComponentStore<T> {
    dense: Vec<T>,
    entities: Vec<Entity>,
    sparse: Vec<Option<u32>>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }
}

impl<T> ComponentStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a component, returning the one it replaced
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(idx) = self.index_of(entity) {
            return Some(std::mem::replace(&mut self.dense[idx], value));
        }
        if self.sparse.len() <= entity.slot() {
            self.sparse.resize(entity.slot() + 1, None);
        }
        self.sparse[entity.slot()] = Some(self.dense.len() as u32);
        self.dense.push(value);
        self.entities.push(entity);
        None
    }

    /// Detach a component. The last element moves into the freed slot.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let idx = self.index_of(entity)?;
        self.sparse[entity.slot()] = None;
        let value = self.dense.swap_remove(idx);
        self.entities.swap_remove(idx);
        if let Some(&moved) = self.entities.get(idx) {
            self.sparse[moved.slot()] = Some(idx as u32);
        }
        Some(value)
    }

    #[inline]
    fn index_of(&self, entity: Entity) -> Option<usize> {
        self.sparse
            .get(entity.slot())
            .copied()
            .flatten()
            .map(|i| i as usize)
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index_of(entity).is_some()
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.index_of(entity).map(|i| &self.dense[i])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.index_of(entity).map(|i| &mut self.dense[i])
    }

    /// Mutable access to two distinct entities at once
    ///
    /// Returns `None` if either is missing or `a == b`.
    pub fn get_pair_mut(&mut self, a: Entity, b: Entity) -> Option<(&mut T, &mut T)> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.dense.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.dense.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Entities holding this component, in storage order
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }
}

/// Missing components are integration bugs, not runtime conditions
impl<T> Index<Entity> for ComponentStore<T> {
    type Output = T;

    fn index(&self, entity: Entity) -> &T {
        match self.index_of(entity) {
            Some(i) => &self.dense[i],
            None => panic!(
                "{entity:?} has no {} component",
                std::any::type_name::<T>()
            ),
        }
    }
}

impl<T> IndexMut<Entity> for ComponentStore<T> {
    fn index_mut(&mut self, entity: Entity) -> &mut T {
        match self.index_of(entity) {
            Some(i) => &mut self.dense[i],
            None => panic!(
                "{entity:?} has no {} component",
                std::any::type_name::<T>()
            ),
        }
    }
}

/// All simulation state shared by physics and AI
#[derive(Debug, Default)]
pub struct Registry {
    next_id: u32,
    pub motions: ComponentStore<Motion>,
    pub enemies: ComponentStore<Enemy>,
    pub archetypes: ComponentStore<Archetype>,
    pub obstacles: ComponentStore<Obstacle>,
    pub meshes: ComponentStore<Arc<Mesh>>,
    pub dashes: ComponentStore<Dash>,
    pub jumpers: ComponentStore<Jumper>,
    pub projectiles: ComponentStore<Projectile>,
    pub death_timers: ComponentStore<DeathTimer>,
    player: Option<Entity>,
    events: Vec<SimEvent>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn spawn(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        entity
    }

    /// Remove an entity from every store
    pub fn despawn(&mut self, entity: Entity) {
        self.motions.remove(entity);
        self.enemies.remove(entity);
        self.archetypes.remove(entity);
        self.obstacles.remove(entity);
        self.meshes.remove(entity);
        self.dashes.remove(entity);
        self.jumpers.remove(entity);
        self.projectiles.remove(entity);
        self.death_timers.remove(entity);
        if self.player == Some(entity) {
            self.player = None;
        }
    }

    #[inline]
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn set_player(&mut self, player: Option<Entity>) {
        self.player = player;
    }

    #[inline]
    pub fn is_obstacle(&self, entity: Entity) -> bool {
        self.obstacles.contains(entity)
    }

    #[inline]
    pub fn is_dead(&self, entity: Entity) -> bool {
        self.death_timers.contains(entity)
    }

    /// Put an entity into its dead state for `duration_ms`
    ///
    /// Dead entities stop receiving AI updates. Calling this on an already
    /// dead entity does nothing.
    pub fn mark_dead(&mut self, entity: Entity, duration_ms: f32) {
        if self.is_dead(entity) {
            return;
        }
        self.death_timers.insert(entity, DeathTimer::new(duration_ms));
        if let Some(motion) = self.motions.get_mut(entity) {
            motion.velocity.x = 0.0;
            motion.velocity.y = 0.0;
        }
        log::debug!("{entity:?} died");
        self.push_event(SimEvent::Died { entity });
    }

    /// Count down death timers, returning the entities whose timer ran out
    ///
    /// Each entity is returned once, on the tick its timer reaches zero. It
    /// stays dead until despawned.
    pub fn tick_death_timers(&mut self, elapsed_ms: f32) -> Vec<Entity> {
        let mut expired = Vec::new();
        for (entity, timer) in self.death_timers.iter_mut() {
            if timer.expired {
                continue;
            }
            timer.remaining_ms -= elapsed_ms;
            if timer.remaining_ms <= 0.0 {
                timer.expired = true;
                expired.push(entity);
            }
        }
        expired
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
