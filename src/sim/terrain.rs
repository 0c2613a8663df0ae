//! Ground elevation
//!
//! Resting height is a pure function of the horizontal position. The shipped
//! arena is flat; the slope exists for terrain experiments and tests.

use glam::Vec2;

/// Height of the ground under a point
pub trait Terrain {
    fn elevation(&self, at: Vec2) -> f32;
}

/// Ground at z = 0 everywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain;

impl Terrain for FlatTerrain {
    #[inline]
    fn elevation(&self, _at: Vec2) -> f32 {
        0.0
    }
}

/// Planar ramp: `base + gradient · at`
#[derive(Debug, Clone, Copy)]
pub struct SlopedTerrain {
    pub base: f32,
    pub gradient: Vec2,
}

impl Terrain for SlopedTerrain {
    #[inline]
    fn elevation(&self, at: Vec2) -> f32 {
        self.base + self.gradient.dot(at)
    }
}
