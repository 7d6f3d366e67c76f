//! Data-driven game balance
//!
//! Every coefficient and threshold the simulation reads lives here. Missing
//! JSON fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SHARDS, MIN_SHARDS};

/// How the cube grows while it is being pushed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrowthModel {
    /// `size = start · (1 + distance / (2 · canvas_height) · rate)`
    Continuous { rate: f64 },
    /// `size *= factor` once per completed push of at least `min_push` pixels
    Discrete { factor: f64, min_push: f64 },
}

/// What makes the cube collapse under its own weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShatterRule {
    /// Size reached `canvas_width / max_size_factor`
    MaxSize,
    /// Size reached `multiple · start_size`
    BaseMultiple { multiple: f64 },
    /// The player completed this many pushes
    PushCount { pushes: u32 },
}

/// How shard velocities are distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterScheme {
    /// Evenly spaced directions `2π·i/K`, random speed
    Radial,
    /// Random direction and speed per shard
    Random,
}

/// Per-frame integrator coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    /// Linear velocity multiplier per frame, in (0, 1]
    pub drag: f64,
    /// Angular velocity multiplier per frame, in (0, 1]
    pub rotational_damping: f64,
    /// Restitution applied on wall contact (negative)
    pub bounce: f64,
}

/// Physics and threshold configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Integrator ===
    pub drag: f64,
    pub rotational_damping: f64,
    pub bounce: f64,
    /// Velocity added per pixel of drag (before dividing by mass)
    pub push_multiplier: f64,
    /// Spin added per pixel of drag (before dividing by mass)
    pub spin_per_pixel: f64,

    // === Size and mass ===
    pub start_size: f64,
    pub max_size_factor: f64,
    pub mass_exponent: f64,
    pub growth: GrowthModel,

    // === Shatter ===
    pub shatter_rule: ShatterRule,
    pub shard_count: usize,
    pub shard_scatter: ScatterScheme,
    pub shard_size_ratio: f64,
    pub shard_speed_min: f64,
    pub shard_speed_max: f64,
    pub shard_spin: f64,
    /// Life lost per frame (life starts at 1.0)
    pub shard_decay: f64,

    // === Win ===
    pub win_zone_height: f64,
    pub win_size_tolerance: f64,

    // === Tilt ===
    pub tilt_threshold_deg: f64,
    pub tilt_upward_force: f64,
    /// Downward acceleration while the won cube is smashed out of the sky
    pub smash_gravity: f64,

    // === Scene sequencing ===
    pub decor_count: usize,
    pub decor_speed_min: f64,
    pub decor_speed_max: f64,
    pub decor_size_min: f64,
    pub decor_size_max: f64,
    pub decor_spin: f64,
    pub title_spin: f64,
    pub collapse_restart_ticks: u64,
    pub swipe_restart_distance: f64,
    pub message_ticks: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drag: 0.92,
            rotational_damping: 0.97,
            bounce: -0.5,
            push_multiplier: 0.3,
            spin_per_pixel: 0.001,

            start_size: 50.0,
            max_size_factor: 4.0,
            mass_exponent: 3.0,
            growth: GrowthModel::Continuous { rate: 1.5 },

            shatter_rule: ShatterRule::MaxSize,
            shard_count: 8,
            shard_scatter: ScatterScheme::Radial,
            shard_size_ratio: 0.25,
            shard_speed_min: 5.0,
            shard_speed_max: 10.0,
            shard_spin: 0.1,
            shard_decay: 1.0 / 120.0,

            win_zone_height: 50.0,
            win_size_tolerance: 5.0,

            tilt_threshold_deg: 150.0,
            tilt_upward_force: 0.1,
            smash_gravity: 0.5,

            decor_count: 200,
            decor_speed_min: 5.0,
            decor_speed_max: 15.0,
            decor_size_min: 10.0,
            decor_size_max: 30.0,
            decor_spin: 0.025,
            title_spin: 0.0005,
            collapse_restart_ticks: 120,
            swipe_restart_distance: 150.0,
            message_ticks: 120,
        }
    }
}

impl Tuning {
    /// Parse tuning JSON; out-of-range values are clamped
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp every field into the range the simulation relies on
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        self.drag = clamp_unit(self.drag, defaults.drag);
        self.rotational_damping = clamp_unit(self.rotational_damping, defaults.rotational_damping);
        if !self.bounce.is_finite() || self.bounce > 0.0 {
            log::warn!("bounce {} must be <= 0, using {}", self.bounce, defaults.bounce);
            self.bounce = defaults.bounce;
        }
        self.bounce = self.bounce.max(-1.0);

        self.start_size = positive_or(self.start_size, defaults.start_size);
        self.max_size_factor = positive_or(self.max_size_factor, defaults.max_size_factor);
        self.mass_exponent = positive_or(self.mass_exponent, defaults.mass_exponent);
        self.growth = match self.growth {
            GrowthModel::Continuous { rate } => GrowthModel::Continuous {
                rate: rate.max(0.0),
            },
            GrowthModel::Discrete { factor, min_push } => GrowthModel::Discrete {
                factor: factor.max(1.0),
                min_push: min_push.max(0.0),
            },
        };

        self.shard_count = self.shard_count.clamp(MIN_SHARDS, MAX_SHARDS);
        self.shard_size_ratio = self.shard_size_ratio.clamp(0.01, 0.99);
        if self.shard_speed_min > self.shard_speed_max {
            std::mem::swap(&mut self.shard_speed_min, &mut self.shard_speed_max);
        }
        self.shard_decay = positive_or(self.shard_decay, defaults.shard_decay);

        self.win_size_tolerance = self.win_size_tolerance.max(0.0);
        self.tilt_threshold_deg = self.tilt_threshold_deg.clamp(0.0, 180.0);

        if self.decor_speed_min > self.decor_speed_max {
            std::mem::swap(&mut self.decor_speed_min, &mut self.decor_speed_max);
        }
        // Decorative cubes must make progress or the transition never ends
        self.decor_speed_min = self.decor_speed_min.max(0.5);
        self.decor_speed_max = self.decor_speed_max.max(self.decor_speed_min);
        if self.decor_size_min > self.decor_size_max {
            std::mem::swap(&mut self.decor_size_min, &mut self.decor_size_max);
        }
        self.decor_size_min = positive_or(self.decor_size_min, defaults.decor_size_min);
        self.decor_size_max = self.decor_size_max.max(self.decor_size_min);

        self
    }

    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            drag: self.drag,
            rotational_damping: self.rotational_damping,
            bounce: self.bounce,
        }
    }
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        value
    } else {
        log::warn!("coefficient {value} outside (0, 1], using {fallback}");
        fallback
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
