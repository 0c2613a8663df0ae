//! Enemy behaviour
//!
//! Runs after physics each tick and only writes velocities, facing and
//! per-archetype state. Positions are physics' business. All randomness comes
//! from the seeded RNG owned here, so a given seed and input sequence always
//! produces the same decisions.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ballistics::launch_velocity;
use super::components::{
    Archetype, ChargerPhase, ChargerState, ChaserState, Motion, Projectile, RangedPhase,
    RangedState,
};
use super::events::{Behavior, SimEvent};
use super::registry::{Entity, Registry};
use super::steering::choose_direction;
use crate::tuning::Tuning;

/// Creates projectile entities on behalf of the AI
///
/// The AI decides when and how fast to shoot; what an arrow looks like is
/// up to the caller.
pub trait ProjectileSpawner {
    fn spawn_projectile(
        &mut self,
        registry: &mut Registry,
        source: Entity,
        origin: Vec3,
        velocity: Vec3,
    ) -> Entity;
}

/// Plain arrows: a small non-solid box that damages until it lands
#[derive(Debug, Clone)]
pub struct ArrowSpawner {
    pub hitbox: Vec3,
}

impl ArrowSpawner {
    pub fn new(hitbox: Vec3) -> Self {
        Self { hitbox }
    }
}

impl ProjectileSpawner for ArrowSpawner {
    fn spawn_projectile(
        &mut self,
        registry: &mut Registry,
        source: Entity,
        origin: Vec3,
        velocity: Vec3,
    ) -> Entity {
        let arrow = registry.spawn();
        let mut motion = Motion::new(origin, self.hitbox).with_velocity(velocity);
        motion.facing = velocity.truncate().try_normalize();
        registry.motions.insert(arrow, motion);
        registry.projectiles.insert(arrow, Projectile::new(Some(source)));
        arrow
    }
}

#[derive(Debug)]
pub struct Ai {
    tuning: Tuning,
    rng: Pcg32,
}

impl Ai {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Update every living enemy
    ///
    /// Does nothing while there is no player to react to.
    pub fn step(&mut self, registry: &mut Registry, elapsed_ms: f32, spawner: &mut dyn ProjectileSpawner) {
        let Some(player) = registry.player() else {
            return;
        };
        let target = registry.motions[player].position;

        let enemies = registry.archetypes.entities().to_vec();
        for entity in enemies {
            if registry.is_dead(entity) {
                continue;
            }

            // Work on a copy so the behaviours can borrow the registry freely
            let mut archetype = registry.archetypes[entity];
            let before = archetype.behavior();
            match &mut archetype {
                Archetype::Chaser(state) => {
                    self.chase(registry, entity, state, target.truncate(), elapsed_ms)
                }
                Archetype::Charger(state) => self.charge(registry, entity, state, target, elapsed_ms),
                Archetype::Ranged(state) => {
                    self.kite(registry, entity, state, target, elapsed_ms, spawner)
                }
            }
            registry.archetypes[entity] = archetype;

            let behavior = archetype.behavior();
            if behavior != before {
                log::debug!("{entity:?}: {before:?} -> {behavior:?}");
                registry.push_event(SimEvent::BehaviorChanged { entity, behavior });
            }
        }
    }

    /// Knock a charger straight into its cooldown
    ///
    /// Returns false (and changes nothing) for other archetypes.
    pub fn stun(&self, registry: &mut Registry, entity: Entity) -> bool {
        let Some(Archetype::Charger(state)) = registry.archetypes.get_mut(entity) else {
            return false;
        };
        let was = state.phase;
        state.phase = ChargerPhase::Cooldown;
        state.timer_ms = self.tuning.charger.cooldown_ms;
        state.jitter = Vec2::ZERO;
        registry.motions[entity].set_ground_velocity(Vec2::ZERO);

        if was != ChargerPhase::Cooldown {
            log::debug!("{entity:?} stunned");
            registry.push_event(SimEvent::BehaviorChanged {
                entity,
                behavior: Behavior::Cooldown,
            });
        }
        true
    }

    /// Walk toward `target`, re-choosing a heading when the countdown runs out
    fn chase(
        &mut self,
        registry: &mut Registry,
        entity: Entity,
        state: &mut ChaserState,
        target: Vec2,
        elapsed_ms: f32,
    ) {
        state.repath_ms -= elapsed_ms;
        if state.repath_ms > 0.0 {
            return;
        }

        let speed = registry.enemies[entity].speed;
        let dir = choose_direction(registry, &self.tuning.steering, entity, target, &mut self.rng);
        let motion = &mut registry.motions[entity];
        motion.set_ground_velocity(dir * speed);
        if dir != Vec2::ZERO {
            motion.facing = Some(dir);
        }

        let chaser = &self.tuning.chaser;
        state.repath_ms = self
            .rng
            .random_range(chaser.repath_min_ms..=chaser.repath_max_ms);
    }

    fn charge(
        &mut self,
        registry: &mut Registry,
        entity: Entity,
        state: &mut ChargerState,
        target: Vec3,
        elapsed_ms: f32,
    ) {
        let cfg = self.tuning.charger.clone();
        let pos = registry.motions[entity].ground_position();
        let distance = pos.distance(target.truncate());

        // A committed windup or charge plays out regardless of distance
        let committed = matches!(state.phase, ChargerPhase::Preparing | ChargerPhase::Charging);
        if distance > cfg.disengage_radius && !committed {
            if state.phase == ChargerPhase::Cooldown {
                state.phase = ChargerPhase::Chasing;
                state.timer_ms = 0.0;
                state.chase.repath_ms = 0.0;
            }
            self.chase(registry, entity, &mut state.chase, target.truncate(), elapsed_ms);
            return;
        }

        if state.phase == ChargerPhase::Cooldown {
            registry.motions[entity].set_ground_velocity(Vec2::ZERO);
            state.timer_ms -= elapsed_ms;
            if state.timer_ms <= 0.0 {
                state.phase = ChargerPhase::Chasing;
                state.chase.repath_ms = 0.0;
            }
            return;
        }

        match state.phase {
            ChargerPhase::Chasing if distance < cfg.aggro_radius => {
                state.phase = ChargerPhase::Preparing;
                state.timer_ms = cfg.windup_ms;
                registry.motions[entity].set_ground_velocity(Vec2::ZERO);
            }
            ChargerPhase::Chasing => {
                self.chase(registry, entity, &mut state.chase, target.truncate(), elapsed_ms);
            }
            ChargerPhase::Preparing => {
                registry.motions[entity].set_ground_velocity(Vec2::ZERO);
                state.timer_ms -= elapsed_ms;
                state.jitter = Vec2::new(
                    self.rng.random_range(-cfg.jitter..=cfg.jitter),
                    self.rng.random_range(-cfg.jitter..=cfg.jitter),
                );
                if state.timer_ms <= 0.0 {
                    let motion = &mut registry.motions[entity];
                    let dir = (target.truncate() - pos)
                        .try_normalize()
                        .or(motion.facing)
                        .unwrap_or(Vec2::X);
                    state.phase = ChargerPhase::Charging;
                    state.timer_ms = cfg.charge_ms;
                    state.charge_dir = dir;
                    state.jitter = Vec2::ZERO;
                    motion.set_ground_velocity(dir * cfg.charge_speed);
                    motion.facing = Some(dir);
                }
            }
            ChargerPhase::Charging => {
                state.timer_ms -= elapsed_ms;
                let motion = &mut registry.motions[entity];
                if state.timer_ms <= 0.0 {
                    state.phase = ChargerPhase::Cooldown;
                    state.timer_ms = cfg.cooldown_ms;
                    motion.set_ground_velocity(Vec2::ZERO);
                } else {
                    // Heading is locked for the whole charge
                    motion.set_ground_velocity(state.charge_dir * cfg.charge_speed);
                }
            }
            ChargerPhase::Cooldown => {}
        }
    }

    fn kite(
        &mut self,
        registry: &mut Registry,
        entity: Entity,
        state: &mut RangedState,
        target: Vec3,
        elapsed_ms: f32,
        spawner: &mut dyn ProjectileSpawner,
    ) {
        let (engage, disengage, draw_ms) = {
            let r = &self.tuning.ranged;
            (r.engage_radius, r.disengage_radius, r.draw_ms)
        };
        let pos = registry.motions[entity].ground_position();
        let distance = pos.distance(target.truncate());

        if distance < engage {
            state.phase = RangedPhase::Aiming;
            let motion = &mut registry.motions[entity];
            motion.set_ground_velocity(Vec2::ZERO);
            if let Some(dir) = (target.truncate() - pos).try_normalize() {
                motion.facing = Some(dir);
            }
            state.draw_ms += elapsed_ms;
            if state.draw_ms >= draw_ms {
                state.draw_ms = 0.0;
                self.shoot_arrow(registry, entity, target, spawner);
            }
        } else {
            // Aiming left the archer standing still; pick a heading right away
            if state.phase == RangedPhase::Aiming {
                state.chase.repath_ms = 0.0;
            }
            if distance > disengage {
                state.phase = RangedPhase::Disengaged;
                state.draw_ms = 0.0;
            } else {
                state.phase = RangedPhase::Closing;
            }
            self.chase(registry, entity, &mut state.chase, target.truncate(), elapsed_ms);
        }
    }

    /// Release an arrow from `archer` toward `target`
    ///
    /// Returns `None` when no 45° shot can reach; the draw is lost either way.
    pub fn shoot_arrow(
        &mut self,
        registry: &mut Registry,
        archer: Entity,
        target: Vec3,
        spawner: &mut dyn ProjectileSpawner,
    ) -> Option<Entity> {
        let r = &self.tuning.ranged;
        let origin = registry.motions[archer].position + Vec3::Z * r.launch_height;
        let Some(velocity) = launch_velocity(origin, target, r.arrow_gravity, r.max_arrow_speed)
        else {
            log::trace!("{archer:?} has no shot at {target}");
            return None;
        };

        let spread = 1.0 + self.rng.random_range(-r.speed_jitter..=r.speed_jitter);
        let arrow = spawner.spawn_projectile(registry, archer, origin, velocity * spread);
        log::debug!("{archer:?} fired {arrow:?}");
        registry.push_event(SimEvent::ArrowFired { archer, arrow });
        Some(arrow)
    }
}
