//! Data-driven game balance
//!
//! Every number the physics and AI layers read at runtime lives here so a
//! designer can tweak a JSON file instead of recompiling. Missing fields fall
//! back to the shipped defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// World and collision response parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// World width (x extent)
    pub width: f32,
    /// World height (y extent)
    pub height: f32,
    /// Downward acceleration on airborne entities (units/s²)
    pub gravity: f32,
    /// Fraction of the overlap each side moves in a non-obstacle collision
    pub recoil_strength: f32,
    /// Footprint scale applied when testing against a mesh
    pub mesh_footprint_shrink: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            gravity: 1000.0,
            recoil_strength: 0.25,
            mesh_footprint_shrink: 0.5,
        }
    }
}

/// Obstacle avoidance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringTuning {
    /// Number of candidate headings in the fan (full circle)
    pub candidate_count: u32,
    /// Longest corridor checked in front of a mover
    pub search_radius: f32,
    /// Below this clear distance a heading is a dead end
    pub min_clear_distance: f32,
}

impl Default for SteeringTuning {
    fn default() -> Self {
        Self {
            candidate_count: 60,
            search_radius: 200.0,
            min_clear_distance: 20.0,
        }
    }
}

/// Melee chaser parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaserTuning {
    pub repath_min_ms: f32,
    pub repath_max_ms: f32,
}

impl Default for ChaserTuning {
    fn default() -> Self {
        Self {
            repath_min_ms: 100.0,
            repath_max_ms: 500.0,
        }
    }
}

/// Charge-and-retreat parameters (boar)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargerTuning {
    /// Player closer than this starts the windup
    pub aggro_radius: f32,
    /// Player further than this drops the boar back to chasing
    pub disengage_radius: f32,
    pub windup_ms: f32,
    pub charge_speed: f32,
    pub charge_ms: f32,
    pub cooldown_ms: f32,
    /// Max visual shake offset while winding up
    pub jitter: f32,
}

impl Default for ChargerTuning {
    fn default() -> Self {
        Self {
            aggro_radius: 250.0,
            disengage_radius: 450.0,
            windup_ms: 800.0,
            charge_speed: 600.0,
            charge_ms: 600.0,
            cooldown_ms: 1200.0,
            jitter: 2.0,
        }
    }
}

/// Ranged kiting parameters (archer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedTuning {
    pub engage_radius: f32,
    pub disengage_radius: f32,
    /// Time spent drawing before an arrow is released
    pub draw_ms: f32,
    /// Arrow release height above the archer's position
    pub launch_height: f32,
    /// Gravity used by the launch solve (should match world gravity)
    pub arrow_gravity: f32,
    pub max_arrow_speed: f32,
    /// Multiplicative spread applied to every released arrow (±)
    pub speed_jitter: f32,
    pub arrow_hitbox: Vec3,
}

impl Default for RangedTuning {
    fn default() -> Self {
        Self {
            engage_radius: 600.0,
            disengage_radius: 800.0,
            draw_ms: 1500.0,
            launch_height: 20.0,
            arrow_gravity: 1000.0,
            max_arrow_speed: 1500.0,
            speed_jitter: 0.025,
            arrow_hitbox: Vec3::new(10.0, 10.0, 5.0),
        }
    }
}

/// All balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub steering: SteeringTuning,
    pub chaser: ChaserTuning,
    pub charger: ChargerTuning,
    pub ranged: RangedTuning,
    /// Fixed duration of a dash (ms)
    pub dash_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world: WorldTuning::default(),
            steering: SteeringTuning::default(),
            chaser: ChaserTuning::default(),
            charger: ChargerTuning::default(),
            ranged: RangedTuning::default(),
            dash_ms: 150.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (no validation)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&contents)?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return invalid("world dimensions must be positive");
        }
        if !(0.0..=1.0).contains(&self.world.recoil_strength) {
            return invalid("recoil_strength must be within [0, 1]");
        }
        if self.steering.candidate_count == 0 {
            return invalid("candidate_count must be at least 1");
        }
        if self.chaser.repath_min_ms > self.chaser.repath_max_ms {
            return invalid("repath_min_ms exceeds repath_max_ms");
        }
        if self.charger.disengage_radius <= self.charger.aggro_radius {
            return invalid("charger disengage_radius must exceed aggro_radius");
        }
        if self.ranged.disengage_radius <= self.ranged.engage_radius {
            return invalid("ranged disengage_radius must exceed engage_radius");
        }
        if self.ranged.arrow_gravity <= 0.0 {
            return invalid("arrow_gravity must be positive");
        }
        if self.charger.jitter < 0.0 || self.ranged.speed_jitter < 0.0 {
            return invalid("jitter amounts must not be negative");
        }
        Ok(())
    }
}
