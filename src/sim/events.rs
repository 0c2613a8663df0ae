//! Notifications for animation and audio collaborators
//!
//! The core never calls rendering or sound APIs. It queues these on the
//! registry and the frame loop drains them after each tick.

use super::registry::Entity;

/// Logical state an enemy is in, as seen from outside the AI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    Chasing,
    Preparing,
    Charging,
    Cooldown,
    Closing,
    Aiming,
    Disengaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// An enemy's behaviour state machine changed state
    BehaviorChanged { entity: Entity, behavior: Behavior },
    /// A jumper came back down
    Landed { entity: Entity },
    /// A projectile hit the ground and can no longer damage
    ProjectileGrounded { entity: Entity },
    /// A dash was stopped by an obstacle
    DashCancelled { entity: Entity },
    /// Entity entered its dead state
    Died { entity: Entity },
    /// A ranged enemy released a projectile
    ArrowFired { archer: Entity, arrow: Entity },
}
