//! Grovekeep - top-down 2.5D survival game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision engine, enemy AI, tick loop)
//! - `tuning`: Data-driven game balance
//! - `error`: Errors from loading data

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{MeshError, TuningError};
pub use tuning::Tuning;

/// Frame loop constants
pub mod consts {
    /// Nominal frame length (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// How long a killed entity plays its death state before it can be removed
    pub const DEATH_MS: f32 = 1000.0;
}
