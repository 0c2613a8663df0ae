//! Obstacle-avoiding heading selection
//!
//! Fans out candidate headings around the straight line to the target,
//! nearest first, and sweeps the mover's footprint along each one. The first
//! heading with a clear corridor wins. If none is clear, the heading that got
//! furthest wins, unless even that is a dead end, in which case a random
//! heading shakes the mover loose.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::geometry::{corridor, half_length_along, polygons_intersect};
use super::registry::{Entity, Registry};
use crate::tuning::SteeringTuning;

/// Signed fan index: 0, +1, -1, +2, -2, …
#[inline]
fn fan_offset(k: u32) -> i32 {
    let step = k.div_ceil(2) as i32;
    if k % 2 == 1 { step } else { -step }
}

/// Convex shapes of the obstacles a corridor of `reach` from `origin` could touch
fn nearby_blockers(registry: &Registry, mover: Entity, origin: Vec2, reach: f32) -> Vec<Vec<Vec2>> {
    let mover_box = registry.motions[mover].aabb();
    let mut blockers = Vec::new();

    for &obstacle in registry.obstacles.entities() {
        if obstacle == mover {
            continue;
        }
        let motion = &registry.motions[obstacle];
        if !mover_box.overlaps_vertically(&motion.aabb()) {
            continue;
        }

        // Any point of the box is within one half-diagonal of some corner
        let footprint = motion.footprint();
        let limit = reach + footprint.half.length();
        let vertices = footprint.vertices();
        if !vertices.iter().any(|v| v.distance(origin) <= limit) {
            continue;
        }

        match registry.meshes.get(obstacle) {
            Some(mesh) => blockers.extend(
                mesh.triangles_at(motion.ground_position(), motion.scale)
                    .map(|tri| tri.to_vec()),
            ),
            None => blockers.push(vertices.to_vec()),
        }
    }
    blockers
}

/// How far a heading can be followed
///
/// `None` means the whole corridor is clear; `Some(d)` is the free distance
/// before the first blocker.
fn sweep(origin: Vec2, half: Vec2, dir: Vec2, length: f32, blockers: &[Vec<Vec2>]) -> Option<f32> {
    let lane = corridor(origin, half, dir, length);
    let forward = half_length_along(half, dir);
    let mut clear: Option<f32> = None;

    for shape in blockers {
        if !polygons_intersect(&lane, shape) {
            continue;
        }
        let nearest = shape
            .iter()
            .map(|v| (*v - origin).dot(dir))
            .fold(f32::INFINITY, f32::min);
        let free = (nearest - forward).clamp(0.0, length);
        clear = Some(clear.map_or(free, |c| c.min(free)));
    }
    clear
}

/// Unit heading for `mover` toward `target` that steers around obstacles
///
/// Returns `Vec2::ZERO` only when the mover already stands on the target.
/// Randomness is drawn only for the dead-end escape.
pub fn choose_direction<R: Rng>(
    registry: &Registry,
    steering: &SteeringTuning,
    mover: Entity,
    target: Vec2,
    rng: &mut R,
) -> Vec2 {
    let motion = &registry.motions[mover];
    let origin = motion.ground_position();
    let to_target = target - origin;
    let distance = to_target.length();
    if distance <= f32::EPSILON {
        return Vec2::ZERO;
    }

    let straight = to_target / distance;
    let length = steering.search_radius.min(distance);
    let half = motion.footprint().half;
    let blockers = nearby_blockers(registry, mover, origin, length + half.length());
    if blockers.is_empty() {
        return straight;
    }

    let count = steering.candidate_count.max(1);
    let step = TAU / count as f32;
    let mut best_dir = straight;
    let mut best_clear = f32::NEG_INFINITY;

    for k in 0..count {
        let dir = Vec2::from_angle(fan_offset(k) as f32 * step).rotate(straight);
        match sweep(origin, half, dir, length, &blockers) {
            None => return dir,
            Some(clear) if clear > best_clear => {
                best_clear = clear;
                best_dir = dir;
            }
            Some(_) => {}
        }
    }

    if best_clear < steering.min_clear_distance {
        log::trace!("{mover:?} boxed in (best clear {best_clear}), picking random heading");
        return Vec2::from_angle(rng.random_range(0.0..TAU));
    }
    best_dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::{Motion, Obstacle};
    use glam::Vec3;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn mover(reg: &mut Registry, pos: Vec2) -> Entity {
        let e = reg.spawn();
        reg.motions.insert(
            e,
            Motion::new(pos.extend(0.0), Vec3::new(20.0, 20.0, 20.0)).solid(),
        );
        e
    }

    fn wall(reg: &mut Registry, center: Vec2, size: Vec2) -> Entity {
        let e = reg.spawn();
        reg.motions
            .insert(e, Motion::new(center.extend(0.0), size.extend(40.0)).solid());
        reg.obstacles.insert(e, Obstacle);
        e
    }

    #[test]
    fn test_fan_order() {
        let offsets: Vec<i32> = (0..7).map(fan_offset).collect();
        assert_eq!(offsets, vec![0, 1, -1, 2, -2, 3, -3]);
    }

    #[test]
    fn test_open_field_goes_straight() {
        let mut reg = Registry::new();
        let e = mover(&mut reg, Vec2::new(100.0, 100.0));
        let mut rng = Pcg32::seed_from_u64(1);
        let dir = choose_direction(&reg, &SteeringTuning::default(), e, Vec2::new(100.0, 300.0), &mut rng);
        assert!((dir - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_at_target_is_zero() {
        let mut reg = Registry::new();
        let e = mover(&mut reg, Vec2::new(100.0, 100.0));
        let mut rng = Pcg32::seed_from_u64(1);
        let dir = choose_direction(&reg, &SteeringTuning::default(), e, Vec2::new(100.0, 100.0), &mut rng);
        assert_eq!(dir, Vec2::ZERO);
    }

    #[test]
    fn test_steers_around_wall_with_least_detour() {
        let mut reg = Registry::new();
        let e = mover(&mut reg, Vec2::new(100.0, 300.0));
        // Wall straight ahead, gap only above it
        wall(&mut reg, Vec2::new(160.0, 280.0), Vec2::new(20.0, 120.0));
        let mut rng = Pcg32::seed_from_u64(1);
        let dir = choose_direction(&reg, &SteeringTuning::default(), e, Vec2::new(400.0, 300.0), &mut rng);

        assert!(dir.y > 0.0, "should detour over the wall, got {dir}");
        assert!(dir.x > 0.0, "should still head toward target, got {dir}");
        assert!((dir.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_distant_wall_beyond_target_ignored() {
        let mut reg = Registry::new();
        let e = mover(&mut reg, Vec2::new(100.0, 300.0));
        wall(&mut reg, Vec2::new(200.0, 300.0), Vec2::new(20.0, 200.0));
        let mut rng = Pcg32::seed_from_u64(1);
        // Target is short of the wall: corridor is capped at the target distance
        let dir = choose_direction(&reg, &SteeringTuning::default(), e, Vec2::new(150.0, 300.0), &mut rng);
        assert!((dir - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_obstacle_above_mover_ignored() {
        let mut reg = Registry::new();
        let e = mover(&mut reg, Vec2::new(100.0, 300.0));
        let bridge = wall(&mut reg, Vec2::new(160.0, 300.0), Vec2::new(20.0, 400.0));
        reg.motions[bridge].position.z = 100.0;
        let mut rng = Pcg32::seed_from_u64(1);
        let dir = choose_direction(&reg, &SteeringTuning::default(), e, Vec2::new(400.0, 300.0), &mut rng);
        assert!((dir - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_partial_block_takes_furthest() {
        let mut reg = Registry::new();
        let e = mover(&mut reg, Vec2::new(300.0, 300.0));
        // A ring of walls with the right-hand wall set furthest back
        wall(&mut reg, Vec2::new(300.0, 360.0), Vec2::new(200.0, 20.0));
        wall(&mut reg, Vec2::new(300.0, 240.0), Vec2::new(200.0, 20.0));
        wall(&mut reg, Vec2::new(240.0, 300.0), Vec2::new(20.0, 200.0));
        wall(&mut reg, Vec2::new(390.0, 300.0), Vec2::new(20.0, 200.0));
        let steering = SteeringTuning {
            min_clear_distance: 5.0,
            ..SteeringTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let dir = choose_direction(&reg, &steering, e, Vec2::new(300.0, 500.0), &mut rng);
        // Up is blocked after 40, right after 70
        assert!(dir.x > 0.9, "expected rightward escape, got {dir}");
    }

    fn boxed_in(reg: &mut Registry) -> Entity {
        let e = mover(reg, Vec2::new(300.0, 300.0));
        wall(reg, Vec2::new(300.0, 322.0), Vec2::new(80.0, 20.0));
        wall(reg, Vec2::new(300.0, 278.0), Vec2::new(80.0, 20.0));
        wall(reg, Vec2::new(278.0, 300.0), Vec2::new(20.0, 80.0));
        wall(reg, Vec2::new(322.0, 300.0), Vec2::new(20.0, 80.0));
        e
    }

    #[test]
    fn test_dead_end_random_is_seeded() {
        let mut reg = Registry::new();
        let e = boxed_in(&mut reg);
        let steering = SteeringTuning::default();
        let target = Vec2::new(300.0, 600.0);

        let a = choose_direction(&reg, &steering, e, target, &mut Pcg32::seed_from_u64(7));
        let b = choose_direction(&reg, &steering, e, target, &mut Pcg32::seed_from_u64(7));
        let c = choose_direction(&reg, &steering, e, target, &mut Pcg32::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    proptest! {
        #[test]
        fn prop_dead_end_never_degenerate(seed in 0u64..10_000, tx in 0.0f32..1000.0, ty in 0.0f32..1000.0) {
            let mut reg = Registry::new();
            let e = boxed_in(&mut reg);
            prop_assume!(Vec2::new(tx, ty).distance(Vec2::new(300.0, 300.0)) > 1.0);
            let mut rng = Pcg32::seed_from_u64(seed);
            let dir = choose_direction(&reg, &SteeringTuning::default(), e, Vec2::new(tx, ty), &mut rng);
            prop_assert!(dir.is_finite());
            prop_assert!((dir.length() - 1.0).abs() < 1e-4);
        }
    }
}
