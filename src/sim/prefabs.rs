//! Stock entity builders
//!
//! Each function spawns one fully formed entity with the default stats for
//! its kind. Where and when to spawn is the caller's concern.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use super::components::{Archetype, Enemy, Jumper, Motion, Obstacle};
use super::mesh::Mesh;
use super::registry::{Entity, Registry};
use crate::error::MeshError;

pub const PLAYER_HITBOX: Vec3 = Vec3::new(30.0, 30.0, 60.0);

pub const BARBARIAN_HITBOX: Vec3 = Vec3::new(40.0, 40.0, 60.0);
pub const BARBARIAN_SPEED: f32 = 100.0;

pub const BOAR_HITBOX: Vec3 = Vec3::new(50.0, 35.0, 40.0);
pub const BOAR_SPEED: f32 = 120.0;

pub const ARCHER_HITBOX: Vec3 = Vec3::new(30.0, 30.0, 60.0);
pub const ARCHER_SPEED: f32 = 80.0;

/// Obstacle height used for scenery
pub const SCENERY_HEIGHT: f32 = 120.0;

/// Spawn the player and claim the player slot
pub fn spawn_player(registry: &mut Registry, position: Vec2) -> Entity {
    let player = registry.spawn();
    registry
        .motions
        .insert(player, Motion::new(position.extend(0.0), PLAYER_HITBOX).solid());
    registry.jumpers.insert(player, Jumper::default());
    registry.set_player(Some(player));
    player
}

fn spawn_enemy(
    registry: &mut Registry,
    position: Vec2,
    hitbox: Vec3,
    enemy: Enemy,
    archetype: Archetype,
) -> Entity {
    let entity = registry.spawn();
    registry
        .motions
        .insert(entity, Motion::new(position.extend(0.0), hitbox).solid());
    registry.enemies.insert(entity, enemy);
    registry.archetypes.insert(entity, archetype);
    entity
}

/// Melee chaser
pub fn spawn_barbarian(registry: &mut Registry, position: Vec2) -> Entity {
    spawn_enemy(
        registry,
        position,
        BARBARIAN_HITBOX,
        Enemy::new(3, 1, 1000.0, BARBARIAN_SPEED),
        Archetype::chaser(),
    )
}

/// Charge-and-retreat
pub fn spawn_boar(registry: &mut Registry, position: Vec2) -> Entity {
    spawn_enemy(
        registry,
        position,
        BOAR_HITBOX,
        Enemy::new(4, 2, 1000.0, BOAR_SPEED),
        Archetype::charger(),
    )
}

/// Ranged kiter
pub fn spawn_archer(registry: &mut Registry, position: Vec2) -> Entity {
    spawn_enemy(
        registry,
        position,
        ARCHER_HITBOX,
        Enemy::new(2, 1, 1000.0, ARCHER_SPEED),
        Archetype::ranged(),
    )
}

/// Box-shaped scenery
pub fn spawn_rock(registry: &mut Registry, position: Vec2, size: Vec2) -> Entity {
    let rock = registry.spawn();
    registry.motions.insert(
        rock,
        Motion::new(position.extend(0.0), size.extend(SCENERY_HEIGHT)).solid(),
    );
    registry.obstacles.insert(rock, Obstacle);
    rock
}

/// Mesh-shaped scenery. `size` is both the visual footprint and the broad-phase box.
pub fn spawn_tree(registry: &mut Registry, position: Vec2, size: Vec2, mesh: Arc<Mesh>) -> Entity {
    let tree = spawn_rock(registry, position, size);
    registry.meshes.insert(tree, mesh);
    tree
}

/// Collision outline of a tree: the trunk at the base of the sprite
pub fn trunk_mesh() -> Result<Arc<Mesh>, MeshError> {
    Mesh::shared(
        vec![
            Vec2::new(-0.1, -0.5),
            Vec2::new(0.1, -0.5),
            Vec2::new(0.1, -0.2),
            Vec2::new(-0.1, -0.2),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefabs_are_complete() {
        let mut reg = Registry::new();
        let player = spawn_player(&mut reg, Vec2::new(100.0, 100.0));
        let boar = spawn_boar(&mut reg, Vec2::new(300.0, 100.0));
        let tree = spawn_tree(
            &mut reg,
            Vec2::new(500.0, 300.0),
            Vec2::new(80.0, 120.0),
            trunk_mesh().unwrap(),
        );

        assert_eq!(reg.player(), Some(player));
        assert!(reg.jumpers.contains(player));
        assert_eq!(reg.archetypes[boar], Archetype::charger());
        assert_eq!(reg.enemies[boar].speed, BOAR_SPEED);
        assert!(reg.is_obstacle(tree));
        assert_eq!(reg.meshes[tree].triangle_count(), 2);
        assert_eq!(reg.motions[tree].scale, Vec2::new(80.0, 120.0));
    }
}
