//! Snow Block - push, grow and shatter a wireframe snow cube
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (pose integrator, scene state machine, rules)
//! - `renderer`: Projection of polyhedra onto a 2D drawing surface
//! - `levels`: Level catalogue dispatched through `LevelBehavior`
//! - `tuning`: Data-driven physics and threshold configuration
//! - `settings`: Player preferences persisted in LocalStorage

pub mod levels;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use levels::{Level, LevelBehavior};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step (one tick per 60 Hz animation frame)
    pub const FRAME_DT: f64 = 1.0 / 60.0;
    /// Maximum ticks per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Shard count bounds accepted by the shatter rule
    pub const MIN_SHARDS: usize = 8;
    pub const MAX_SHARDS: usize = 30;

    /// Device tilt readings beyond this magnitude (degrees) are sensor garbage
    pub const TILT_SENSOR_LIMIT: f64 = 180.0;

    /// Title screen letter orientation and layout
    pub const TITLE_WORDS: [&str; 2] = ["SNOW", "BLOCK"];
    pub const TITLE_ROTATION_X: f64 = 0.2;
    pub const TITLE_MAX_SCALE: f64 = 80.0;
    pub const TITLE_SPACING: f64 = 2.5;

    /// Starting yaw of a freshly spawned cube
    pub const START_ROTATION_Y: f64 = 0.4;
    /// Start height above the floor, in multiples of the start size
    pub const START_HEIGHT_FACTOR: f64 = 1.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Viewport (canvas) dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
