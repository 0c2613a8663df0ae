//! Fixed-angle launch solve for arcing projectiles
//!
//! Arrows always leave at 45°. For a horizontal distance `d` and a rise `h`
//! the required speed satisfies `v² = g·d² / (d − h)`.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec3;

/// Launch speed that lands a 45° shot `rise` higher after `horizontal`
///
/// `None` when no 45° arc reaches the target (rise at or above the distance,
/// or no horizontal separation at all).
pub fn launch_speed(horizontal: f32, rise: f32, gravity: f32) -> Option<f32> {
    let slack = horizontal - rise;
    if horizontal <= f32::EPSILON || slack <= 0.0 {
        return None;
    }
    let speed_sq = gravity * horizontal * horizontal / slack;
    speed_sq.is_finite().then(|| speed_sq.sqrt())
}

/// Velocity that carries a projectile from `origin` to `target` at 45°
///
/// Shots needing more than `max_speed` are refused.
pub fn launch_velocity(origin: Vec3, target: Vec3, gravity: f32, max_speed: f32) -> Option<Vec3> {
    let flat = target.truncate() - origin.truncate();
    let horizontal = flat.length();
    let speed = launch_speed(horizontal, target.z - origin.z, gravity)?;
    if speed > max_speed {
        return None;
    }
    let component = speed * FRAC_1_SQRT_2;
    Some((flat / horizontal * component).extend(component))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Height of a shot after covering `horizontal` ground distance
    fn height_at(velocity: Vec3, horizontal: f32, gravity: f32) -> f32 {
        let t = horizontal / velocity.truncate().length();
        velocity.z * t - 0.5 * gravity * t * t
    }

    #[test]
    fn test_flat_shot_speed() {
        // Level ground: v² = g·d
        let v = launch_speed(400.0, 0.0, 1000.0).unwrap();
        assert!((v - 632.455_5).abs() < 1e-2);
    }

    #[test]
    fn test_refuses_steep_targets() {
        assert_eq!(launch_speed(100.0, 100.0, 1000.0), None);
        assert_eq!(launch_speed(100.0, 150.0, 1000.0), None);
        assert_eq!(launch_speed(0.0, -10.0, 1000.0), None);
    }

    #[test]
    fn test_speed_cap() {
        let origin = Vec3::new(0.0, 0.0, 20.0);
        assert!(launch_velocity(origin, Vec3::new(500.0, 0.0, 0.0), 1000.0, 1500.0).is_some());
        assert!(launch_velocity(origin, Vec3::new(500.0, 0.0, 0.0), 1000.0, 500.0).is_none());
    }

    #[test]
    fn test_velocity_is_45_degrees_toward_target() {
        let v = launch_velocity(Vec3::ZERO, Vec3::new(0.0, -300.0, 0.0), 1000.0, 2000.0).unwrap();
        assert!(v.x.abs() < 1e-4);
        assert!(v.y < 0.0);
        assert!((v.z - v.y.abs()).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_shot_lands_on_target_height(
            tx in -800.0f32..800.0, ty in -800.0f32..800.0,
            rise in -60.0f32..60.0,
        ) {
            let origin = Vec3::new(0.0, 0.0, 20.0);
            let target = Vec3::new(tx, ty, 20.0 + rise);
            let d = target.truncate().length();
            prop_assume!(d > rise + 1.0 && d > 1.0);

            let v = launch_velocity(origin, target, 1000.0, f32::MAX).unwrap();
            let h = height_at(v, d, 1000.0);
            prop_assert!((h - rise).abs() < 0.05 * d.max(1.0), "h {h} vs rise {rise}");
        }
    }
}
