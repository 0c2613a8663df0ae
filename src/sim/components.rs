//! Component types attached to entities
//!
//! Position z is elevation. Boxes are centered on `position` and extend
//! `hitbox / 2` along each axis.

use glam::{Vec2, Vec3};

use super::events::Behavior;
use super::geometry::{Aabb, Rect};
use super::registry::Entity;

/// Kinematic state of anything that moves or collides
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub position: Vec3,
    /// Visual footprint (used for the world-edge clamp and mesh transform)
    pub scale: Vec2,
    /// Collision box (width, depth, height), never negative
    pub hitbox: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// Takes part in push-out / recoil
    pub solid: bool,
    pub facing: Option<Vec2>,
}

impl Motion {
    pub fn new(position: Vec3, hitbox: Vec3) -> Self {
        debug_assert!(hitbox.cmpge(Vec3::ZERO).all(), "negative hitbox {hitbox}");
        Self {
            position,
            scale: hitbox.truncate(),
            hitbox,
            velocity: Vec3::ZERO,
            solid: false,
            facing: None,
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    /// Horizontal position
    #[inline]
    pub fn ground_position(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Set the horizontal velocity, leaving vertical motion alone
    #[inline]
    pub fn set_ground_velocity(&mut self, velocity: Vec2) {
        self.velocity.x = velocity.x;
        self.velocity.y = velocity.y;
    }

    #[inline]
    pub fn ground_velocity(&self) -> Vec2 {
        self.velocity.truncate()
    }

    /// 3D collision box
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.hitbox * 0.5)
    }

    /// 2D collision footprint on the world plane
    #[inline]
    pub fn footprint(&self) -> Rect {
        Rect::new(self.position.truncate(), self.hitbox.truncate() * 0.5)
    }
}

/// A hostile entity
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub health: u32,
    /// Damage dealt on contact
    pub damage: u32,
    /// Minimum time between contact hits
    pub cooldown_ms: f32,
    /// Movement speed (units/s)
    pub speed: f32,
}

impl Enemy {
    pub fn new(health: u32, damage: u32, cooldown_ms: f32, speed: f32) -> Self {
        Self {
            health,
            damage,
            cooldown_ms,
            speed,
        }
    }

    /// Subtract health, returning true if this hit killed the enemy
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        was_alive && self.health == 0
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// Static scenery. Pushes others out, never recoils.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Obstacle;

/// Present while an entity plays its death state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathTimer {
    pub remaining_ms: f32,
    /// Set once the timer has been reported as run out
    pub expired: bool,
}

impl DeathTimer {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            remaining_ms: duration_ms,
            expired: false,
        }
    }
}

/// Scripted straight-line move that overrides horizontal integration
#[derive(Debug, Clone, PartialEq)]
pub struct Dash {
    pub active: bool,
    pub start: Vec2,
    pub target: Vec2,
    pub elapsed_ms: f32,
    pub duration_ms: f32,
}

impl Dash {
    pub fn start(from: Vec2, to: Vec2, duration_ms: f32) -> Self {
        Self {
            active: true,
            start: from,
            target: to,
            elapsed_ms: 0.0,
            duration_ms,
        }
    }

    /// Advance the dash and return the new horizontal position
    ///
    /// Snaps exactly onto the target and deactivates once complete.
    pub fn advance(&mut self, elapsed_ms: f32) -> Vec2 {
        self.elapsed_ms += elapsed_ms;
        if self.duration_ms <= 0.0 || self.elapsed_ms >= self.duration_ms {
            self.active = false;
            return self.target;
        }
        let t = self.elapsed_ms / self.duration_ms;
        self.start.lerp(self.target, t)
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }
}

/// Something that can leave the ground and come back down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Jumper {
    pub airborne: bool,
}

impl Jumper {
    /// Kick off a jump with the given upward speed
    pub fn launch(&mut self, motion: &mut Motion, speed: f32) {
        motion.velocity.z = speed;
        self.airborne = true;
    }
}

/// A thrown or fired object. Damages only while airborne, once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projectile {
    pub damaging: bool,
    pub source: Option<Entity>,
}

impl Projectile {
    pub fn new(source: Option<Entity>) -> Self {
        Self {
            damaging: true,
            source,
        }
    }

    /// Use up the projectile's single damage pass
    pub fn spend(&mut self) {
        self.damaging = false;
    }
}

/// Repath countdown shared by every walking archetype
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChaserState {
    pub repath_ms: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChargerPhase {
    #[default]
    Chasing,
    /// Winding up in place
    Preparing,
    /// Locked heading at charge speed
    Charging,
    /// Recovering, immobile
    Cooldown,
}

/// Boar state machine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChargerState {
    pub phase: ChargerPhase,
    /// Time left in the current timed phase
    pub timer_ms: f32,
    pub charge_dir: Vec2,
    /// Render-only shake offset while preparing
    pub jitter: Vec2,
    pub chase: ChaserState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangedPhase {
    /// Too far away, roaming toward the player
    #[default]
    Disengaged,
    /// Between the two radii, walking in
    Closing,
    /// Standing still and drawing
    Aiming,
}

/// Archer state machine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangedState {
    pub phase: RangedPhase,
    pub draw_ms: f32,
    pub chase: ChaserState,
}

/// Which behaviour drives an enemy, carrying that behaviour's private state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Archetype {
    /// Melee ground unit (barbarian)
    Chaser(ChaserState),
    /// Charge and retreat (boar)
    Charger(ChargerState),
    /// Ranged kiting (archer)
    Ranged(RangedState),
}

impl Archetype {
    pub fn chaser() -> Self {
        Self::Chaser(ChaserState::default())
    }

    pub fn charger() -> Self {
        Self::Charger(ChargerState::default())
    }

    pub fn ranged() -> Self {
        Self::Ranged(RangedState::default())
    }

    /// Externally visible logical state
    pub fn behavior(&self) -> Behavior {
        match self {
            Archetype::Chaser(_) => Behavior::Chasing,
            Archetype::Charger(state) => match state.phase {
                ChargerPhase::Chasing => Behavior::Chasing,
                ChargerPhase::Preparing => Behavior::Preparing,
                ChargerPhase::Charging => Behavior::Charging,
                ChargerPhase::Cooldown => Behavior::Cooldown,
            },
            Archetype::Ranged(state) => match state.phase {
                RangedPhase::Disengaged => Behavior::Disengaged,
                RangedPhase::Closing => Behavior::Closing,
                RangedPhase::Aiming => Behavior::Aiming,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_interpolates_then_snaps() {
        let mut dash = Dash::start(Vec2::ZERO, Vec2::new(100.0, 0.0), 100.0);
        let mid = dash.advance(50.0);
        assert!((mid.x - 50.0).abs() < 1e-4);
        assert!(dash.active);

        let end = dash.advance(70.0);
        assert_eq!(end, Vec2::new(100.0, 0.0));
        assert!(!dash.active);
    }

    #[test]
    fn test_enemy_damage_reports_kill_once() {
        let mut enemy = Enemy::new(3, 1, 500.0, 100.0);
        assert!(!enemy.apply_damage(2));
        assert!(enemy.apply_damage(5));
        assert!(!enemy.apply_damage(1));
        assert!(enemy.is_dead());
    }

    #[test]
    fn test_archetype_behavior_mapping() {
        let mut state = ChargerState::default();
        state.phase = ChargerPhase::Charging;
        assert_eq!(Archetype::Charger(state).behavior(), Behavior::Charging);
        assert_eq!(Archetype::ranged().behavior(), Behavior::Disengaged);
    }
}
