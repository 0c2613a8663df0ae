//! Collision engine
//!
//! One `step` per tick:
//! 1. integrate velocities, gravity and dash overrides
//! 2. broad phase box overlap over every pair, polygon refinement for meshes
//! 3. push solid pairs apart along the axis of least penetration
//! 4. clamp everything inside the world edges
//!
//! Confirmed overlaps are recorded in both orderings and held until the
//! frame loop drains them.

use glam::Vec2;

use super::components::Motion;
use super::events::SimEvent;
use super::geometry::polygons_intersect;
use super::mesh::Mesh;
use super::registry::{Entity, Registry};
use super::terrain::{FlatTerrain, Terrain};
use crate::tuning::WorldTuning;

/// One side of a detected overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub entity: Entity,
    pub other: Entity,
}

pub struct Physics {
    world: WorldTuning,
    terrain: Box<dyn Terrain>,
    collisions: Vec<Collision>,
}

impl std::fmt::Debug for Physics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Physics")
            .field("world", &self.world)
            .field("collisions", &self.collisions)
            .finish_non_exhaustive()
    }
}

impl Physics {
    pub fn new(world: WorldTuning, terrain: Box<dyn Terrain>) -> Self {
        Self {
            world,
            terrain,
            collisions: Vec::new(),
        }
    }

    pub fn flat(world: WorldTuning) -> Self {
        Self::new(world, Box::new(FlatTerrain))
    }

    pub fn world(&self) -> &WorldTuning {
        &self.world
    }

    pub fn terrain(&self) -> &dyn Terrain {
        self.terrain.as_ref()
    }

    /// Advance the world by `elapsed_ms`
    ///
    /// A zero step moves nothing but still detects, resolves and clamps.
    pub fn step(&mut self, registry: &mut Registry, elapsed_ms: f32) {
        self.integrate(registry, elapsed_ms);

        let contacts = self.detect(registry);
        for &(a, b) in &contacts {
            self.collisions.push(Collision { entity: a, other: b });
            self.collisions.push(Collision { entity: b, other: a });
        }
        for &(a, b) in &contacts {
            resolve_pair(registry, &self.world, a, b);
        }

        clamp_to_world(registry, &self.world);
    }

    /// Pairs found since the last drain, in discovery order
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn drain_collisions(&mut self) -> Vec<Collision> {
        std::mem::take(&mut self.collisions)
    }

    fn integrate(&self, registry: &mut Registry, elapsed_ms: f32) {
        let dt = elapsed_ms / 1000.0;
        let gravity = self.world.gravity;

        // Snapshot IDs so landing effects can touch other stores
        let entities = registry.motions.entities().to_vec();
        for entity in entities {
            let dash_pos = match registry.dashes.get_mut(entity) {
                Some(dash) if dash.active => Some(dash.advance(elapsed_ms)),
                _ => None,
            };

            let motion = &mut registry.motions[entity];
            if motion.position.z > self.terrain.elevation(motion.ground_position()) {
                motion.velocity.z -= gravity * dt;
            }

            match dash_pos {
                Some(pos) => {
                    motion.position.x = pos.x;
                    motion.position.y = pos.y;
                }
                None => {
                    motion.position.x += motion.velocity.x * dt;
                    motion.position.y += motion.velocity.y * dt;
                }
            }
            motion.position.z += motion.velocity.z * dt;

            let rest = self.terrain.elevation(motion.ground_position());
            if motion.position.z < rest {
                motion.position.z = rest;
                motion.velocity.z = 0.0;
                land(registry, entity);
            }
        }
    }

    /// Unordered overlapping pairs, storage order
    fn detect(&self, registry: &Registry) -> Vec<(Entity, Entity)> {
        let entities = registry.motions.entities();
        let mut pairs = Vec::new();
        for (i, &a) in entities.iter().enumerate() {
            for &b in &entities[i + 1..] {
                if registry.is_obstacle(a) && registry.is_obstacle(b) {
                    continue;
                }
                if entities_overlap(registry, &self.world, a, b) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

/// Landing effects for whatever just hit the ground
fn land(registry: &mut Registry, entity: Entity) {
    if let Some(jumper) = registry.jumpers.get_mut(entity)
        && jumper.airborne
    {
        jumper.airborne = false;
        registry.push_event(SimEvent::Landed { entity });
    }

    if let Some(projectile) = registry.projectiles.get_mut(entity) {
        let was_damaging = projectile.damaging;
        projectile.spend();
        registry.motions[entity].set_ground_velocity(Vec2::ZERO);
        if was_damaging {
            registry.push_event(SimEvent::ProjectileGrounded { entity });
        }
    }
}

/// Full overlap test: 3D boxes, then mesh refinement if either side has one
pub fn entities_overlap(registry: &Registry, world: &WorldTuning, a: Entity, b: Entity) -> bool {
    let ma = &registry.motions[a];
    let mb = &registry.motions[b];
    if !ma.aabb().overlaps(&mb.aabb()) {
        return false;
    }

    let shrink = world.mesh_footprint_shrink;
    match (registry.meshes.get(a), registry.meshes.get(b)) {
        (None, None) => true,
        (Some(mesh), None) => mesh_overlaps(mesh, ma, mb, shrink),
        (None, Some(mesh)) => mesh_overlaps(mesh, mb, ma, shrink),
        (Some(mesh_a), Some(mesh_b)) => {
            mesh_overlaps(mesh_a, ma, mb, shrink) || mesh_overlaps(mesh_b, mb, ma, shrink)
        }
    }
}

/// Any triangle of `owner`'s mesh against `other`'s shrunken footprint
fn mesh_overlaps(mesh: &Mesh, owner: &Motion, other: &Motion, shrink: f32) -> bool {
    let footprint = other.footprint().scaled(shrink).vertices();
    mesh.triangles_at(owner.ground_position(), owner.scale)
        .any(|tri| polygons_intersect(&tri, &footprint))
}

#[inline]
fn sign(d: f32) -> f32 {
    if d < 0.0 { -1.0 } else { 1.0 }
}

/// Least-penetration push-out for a solid pair
///
/// Obstacles hold still and the other side takes the whole correction (and
/// loses any dash). Two movers each take `recoil_strength` of it.
pub fn resolve_pair(registry: &mut Registry, world: &WorldTuning, a: Entity, b: Entity) {
    let (ma, mb) = (&registry.motions[a], &registry.motions[b]);
    if !(ma.solid && mb.solid) {
        return;
    }

    let overlap = ma.footprint().overlap(&mb.footprint());
    let delta = mb.ground_position() - ma.ground_position();
    // Direction b must move to get away from a
    let push = if overlap.x < overlap.y {
        Vec2::new(overlap.x.max(0.0) * sign(delta.x), 0.0)
    } else {
        Vec2::new(0.0, overlap.y.max(0.0) * sign(delta.y))
    };

    let (a_static, b_static) = (registry.is_obstacle(a), registry.is_obstacle(b));
    log::trace!("resolve {a:?}/{b:?} push {push}");
    match (a_static, b_static) {
        (true, true) => {}
        (true, false) => push_out(registry, b, push),
        (false, true) => push_out(registry, a, -push),
        (false, false) => {
            let recoil = push * world.recoil_strength;
            if let Some((ma, mb)) = registry.motions.get_pair_mut(a, b) {
                ma.position -= recoil.extend(0.0);
                mb.position += recoil.extend(0.0);
            }
        }
    }
}

fn push_out(registry: &mut Registry, entity: Entity, push: Vec2) {
    registry.motions[entity].position += push.extend(0.0);
    if let Some(dash) = registry.dashes.get_mut(entity)
        && dash.active
    {
        dash.cancel();
        registry.push_event(SimEvent::DashCancelled { entity });
    }
}

/// Keep every footprint inside the world
///
/// x ∈ [half width, width - half width], y ∈ [half visual height, height].
/// Applying it twice is the same as once.
pub fn clamp_to_world(registry: &mut Registry, world: &WorldTuning) {
    for (_, motion) in registry.motions.iter_mut() {
        let half_w = motion.hitbox.x * 0.5;
        let min_y = motion.scale.y.abs() * 0.5;
        motion.position.x = motion.position.x.max(half_w).min(world.width - half_w);
        motion.position.y = motion.position.y.max(min_y).min(world.height);
    }
}
