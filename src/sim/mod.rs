//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied elapsed time only
//! - Seeded RNG only
//! - Stable iteration order (component storage order)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod ballistics;
pub mod components;
pub mod events;
pub mod geometry;
pub mod mesh;
pub mod physics;
pub mod prefabs;
pub mod registry;
pub mod steering;
pub mod terrain;
pub mod tick;

pub use ai::{Ai, ArrowSpawner, ProjectileSpawner};
pub use components::{
    Archetype, ChargerPhase, ChargerState, ChaserState, Dash, DeathTimer, Enemy, Jumper, Motion,
    Obstacle, Projectile, RangedPhase, RangedState,
};
pub use events::{Behavior, SimEvent};
pub use geometry::{Aabb, Rect, box_vertices, polygons_intersect};
pub use mesh::Mesh;
pub use physics::{Collision, Physics};
pub use registry::{ComponentStore, Entity, Registry};
pub use steering::choose_direction;
pub use terrain::{FlatTerrain, SlopedTerrain, Terrain};
pub use tick::{Simulation, TickReport};
