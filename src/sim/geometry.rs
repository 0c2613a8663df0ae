//! Shape utilities: box overlap, convex polygon SAT, box vertices
//!
//! Pure functions, no state. Intervals are closed: touching counts as
//! overlapping everywhere in this module.

use glam::{Vec2, Vec3};

/// Axis-aligned 3D box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half: Vec3,
}

impl Aabb {
    #[inline]
    pub fn new(center: Vec3, half: Vec3) -> Self {
        Self { center, half }
    }

    /// True when the boxes overlap on all three axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x <= reach.x && d.y <= reach.y && d.z <= reach.z
    }

    /// True when the vertical extents overlap
    #[inline]
    pub fn overlaps_vertically(&self, other: &Aabb) -> bool {
        (self.center.z - other.center.z).abs() <= self.half.z + other.half.z
    }
}

/// Axis-aligned 2D rectangle on the world plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Same center, extents multiplied by `factor`
    #[inline]
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.center, self.half * factor)
    }

    /// Per-axis overlap amount (negative on an axis means separated)
    #[inline]
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        self.half + other.half - (self.center - other.center).abs()
    }

    /// Corners counter-clockwise from the bottom-left
    pub fn vertices(&self) -> [Vec2; 4] {
        box_vertices(self.center, self.half, 0.0)
    }
}

/// Corners of a box centered on `center` with the given half extents,
/// rotated by `angle` radians, counter-clockwise
pub fn box_vertices(center: Vec2, half: Vec2, angle: f32) -> [Vec2; 4] {
    let rot = Vec2::from_angle(angle);
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|corner| center + rot.rotate(corner))
}

/// Project polygon vertices onto an axis, returning (min, max)
#[inline]
fn project(poly: &[Vec2], axis: Vec2) -> (f32, f32) {
    poly.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        let p = v.dot(axis);
        (lo.min(p), hi.max(p))
    })
}

/// True if some edge normal of `poly` separates it from `other`
fn has_separating_edge(poly: &[Vec2], other: &[Vec2]) -> bool {
    let n = poly.len();
    for i in 0..n {
        let edge = poly[(i + 1) % n] - poly[i];
        let normal = edge.perp();
        // Coincident vertices give no axis
        if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
            continue;
        }
        let (min_a, max_a) = project(poly, normal);
        let (min_b, max_b) = project(other, normal);
        if max_a < min_b || max_b < min_a {
            return true;
        }
    }
    false
}

/// Separating-axis test between two convex polygons
///
/// Exact for convex input. Degenerate polygons (all vertices coincident)
/// contribute no axes of their own, so they collapse to a point test against
/// the other polygon.
pub fn polygons_intersect(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    !has_separating_edge(a, b) && !has_separating_edge(b, a)
}

/// Half width of a rectangle's footprint measured across `dir`
#[inline]
pub fn half_width_across(half: Vec2, dir: Vec2) -> f32 {
    let perp = dir.perp();
    (half.x * perp.x).abs() + (half.y * perp.y).abs()
}

/// Half length of a rectangle's footprint measured along `dir`
#[inline]
pub fn half_length_along(half: Vec2, dir: Vec2) -> f32 {
    (half.x * dir.x).abs() + (half.y * dir.y).abs()
}

/// Oriented rectangle swept from `origin` along unit `dir`
///
/// The trailing edge passes through `origin` (so a mover pressed against a
/// wall behind it isn't blocked), the leading edge sits `length` plus the
/// footprint's forward reach ahead, and the width matches the footprint
/// measured across `dir`.
pub fn corridor(origin: Vec2, half: Vec2, dir: Vec2, length: f32) -> [Vec2; 4] {
    let side = dir.perp() * half_width_across(half, dir);
    let front = origin + dir * (length + half_length_along(half, dir));
    [origin - side, front - side, front + side, origin + side]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(center: Vec2, half: f32) -> [Vec2; 4] {
        Rect::new(center, Vec2::splat(half)).vertices()
    }

    #[test]
    fn test_aabb_touching_counts() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(5.0));
        let b = Aabb::new(Vec3::new(10.0, 0.0, 0.0), Vec3::splat(5.0));
        let c = Aabb::new(Vec3::new(10.1, 0.0, 0.0), Vec3::splat(5.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_aabb_needs_all_three_axes() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(5.0));
        let above = Aabb::new(Vec3::new(0.0, 0.0, 20.0), Vec3::splat(5.0));
        assert!(!a.overlaps(&above));
        assert!(!a.overlaps_vertically(&above));
    }

    #[test]
    fn test_degenerate_box_only_touches_at_points() {
        let point = Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO);
        let inside = Aabb::new(Vec3::ZERO, Vec3::splat(5.0));
        let apart = Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::splat(5.0));
        assert!(point.overlaps(&inside));
        assert!(!point.overlaps(&apart));
    }

    #[test]
    fn test_rect_overlap_amounts() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(20.0));
        let b = Rect::new(Vec2::new(30.0, 0.0), Vec2::splat(20.0));
        assert_eq!(a.overlap(&b), Vec2::new(10.0, 40.0));
    }

    #[test]
    fn test_box_vertices_rotated() {
        let v = box_vertices(Vec2::ZERO, Vec2::new(2.0, 1.0), std::f32::consts::FRAC_PI_2);
        // (-2,-1) rotated 90° CCW is (1,-2)
        assert!((v[0] - Vec2::new(1.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_sat_triangle_vs_square() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(polygons_intersect(&tri, &square(Vec2::new(2.0, 2.0), 1.0)));
        // Close to the hypotenuse but on the far side: only the diagonal axis separates
        assert!(!polygons_intersect(&tri, &square(Vec2::new(7.0, 7.0), 1.0)));
    }

    #[test]
    fn test_sat_coincident_vertices_no_panic() {
        let degenerate = [Vec2::ONE; 3];
        assert!(polygons_intersect(&degenerate, &square(Vec2::ZERO, 2.0)));
        assert!(!polygons_intersect(&degenerate, &square(Vec2::splat(10.0), 2.0)));
    }

    #[test]
    fn test_corridor_shape() {
        let c = corridor(Vec2::ZERO, Vec2::splat(5.0), Vec2::X, 100.0);
        assert!((c[0] - Vec2::new(0.0, -5.0)).length() < 1e-5);
        assert!((c[1] - Vec2::new(105.0, -5.0)).length() < 1e-5);
        assert!((c[2] - Vec2::new(105.0, 5.0)).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_aabb_overlap_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, az in -20.0f32..20.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, bz in -20.0f32..20.0,
            ha in 0.0f32..50.0, hb in 0.0f32..50.0,
        ) {
            let a = Aabb::new(Vec3::new(ax, ay, az), Vec3::splat(ha));
            let b = Aabb::new(Vec3::new(bx, by, bz), Vec3::splat(hb));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_sat_symmetric(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let a = box_vertices(Vec2::new(ax, ay), Vec2::new(10.0, 4.0), angle);
            let b = square(Vec2::new(bx, by), 6.0);
            prop_assert_eq!(polygons_intersect(&a, &b), polygons_intersect(&b, &a));
        }

        #[test]
        fn prop_sat_matches_aabb_for_axis_aligned(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0,
        ) {
            let ra = Rect::new(Vec2::new(ax, ay), Vec2::new(8.0, 3.0));
            let rb = Rect::new(Vec2::new(bx, by), Vec2::new(5.0, 5.0));
            let o = ra.overlap(&rb);
            prop_assert_eq!(
                polygons_intersect(&ra.vertices(), &rb.vertices()),
                o.x >= 0.0 && o.y >= 0.0
            );
        }
    }
}
