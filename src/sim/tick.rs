//! Per-frame simulation tick
//!
//! Fixed order every tick: physics step, AI step, death timers, then drain
//! collisions and events for the frame loop. Same seed plus same elapsed
//! sequence gives the same world.

use glam::Vec2;

use super::ai::{Ai, ProjectileSpawner};
use super::components::Dash;
use super::events::SimEvent;
use super::physics::{Collision, Physics};
use super::registry::{Entity, Registry};
use super::terrain::{FlatTerrain, Terrain};
use crate::consts::{FRAME_MS, MAX_SUBSTEPS};
use crate::error::TuningError;
use crate::tuning::Tuning;

/// Everything a tick produced that the frame loop has to react to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Confirmed overlaps, both orderings
    pub collisions: Vec<Collision>,
    pub events: Vec<SimEvent>,
    /// Entities whose death state finished this tick
    pub expired: Vec<Entity>,
}

impl TickReport {
    fn merge(&mut self, other: TickReport) {
        self.collisions.extend(other.collisions);
        self.events.extend(other.events);
        self.expired.extend(other.expired);
    }
}

#[derive(Debug)]
pub struct Simulation {
    pub registry: Registry,
    pub physics: Physics,
    pub ai: Ai,
    /// Ticks run so far
    pub ticks: u64,
}

impl Simulation {
    /// Build an empty world, refusing tuning the systems can't run with
    pub fn new(tuning: Tuning, terrain: Box<dyn Terrain>, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            registry: Registry::new(),
            physics: Physics::new(tuning.world.clone(), terrain),
            ai: Ai::new(tuning, seed),
            ticks: 0,
        })
    }

    /// Flat arena
    pub fn flat(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Self::new(tuning, Box::new(FlatTerrain), seed)
    }

    /// Run one tick of `elapsed_ms`
    pub fn tick(&mut self, elapsed_ms: f32, spawner: &mut dyn ProjectileSpawner) -> TickReport {
        self.physics.step(&mut self.registry, elapsed_ms);
        self.ai.step(&mut self.registry, elapsed_ms, spawner);
        let expired = self.registry.tick_death_timers(elapsed_ms);
        self.ticks += 1;

        TickReport {
            collisions: self.physics.drain_collisions(),
            events: self.registry.drain_events(),
            expired,
        }
    }

    /// Run a whole frame as ticks no longer than `FRAME_MS`
    ///
    /// At most `MAX_SUBSTEPS` ticks run; anything beyond that is dropped so a
    /// long stall can't snowball.
    pub fn advance(&mut self, frame_ms: f32, spawner: &mut dyn ProjectileSpawner) -> TickReport {
        let mut report = TickReport::default();
        let mut remaining = frame_ms.max(0.0);
        let mut substeps = 0;
        while remaining > 0.0 && substeps < MAX_SUBSTEPS {
            let step = remaining.min(FRAME_MS);
            report.merge(self.tick(step, spawner));
            remaining -= step;
            substeps += 1;
        }
        if remaining > 0.0 {
            log::debug!("Dropped {remaining:.1} ms of frame time");
        }
        report
    }

    /// Force a charger into its cooldown
    pub fn stun(&mut self, entity: Entity) -> bool {
        self.ai.stun(&mut self.registry, entity)
    }

    /// Dash `entity` from where it stands to `to` over the tuned dash time
    ///
    /// Returns false if the entity has no body to move.
    pub fn dash(&mut self, entity: Entity, to: Vec2) -> bool {
        let Some(motion) = self.registry.motions.get(entity) else {
            return false;
        };
        let from = motion.ground_position();
        let duration_ms = self.ai.tuning().dash_ms;
        self.registry.dashes.insert(entity, Dash::start(from, to, duration_ms));
        true
    }
}
