//! Growth, mass, win and shatter rules
//!
//! Pure functions over sizes and poses so the puzzle's difficulty curve can be
//! tested without a frame loop.

use glam::DVec2;
use rand::Rng;

use super::state::{RigidObject, TargetZone};
use crate::polar_to_cartesian;
use crate::tuning::{ScatterScheme, ShatterRule, Tuning};

/// `(size / base_size)^exponent`
#[inline]
pub fn mass_for_size(size: f64, base_size: f64, exponent: f64) -> f64 {
    if base_size <= 0.0 {
        return 1.0;
    }
    (size / base_size).powf(exponent)
}

/// Largest size a cube may reach on a canvas of this width
#[inline]
pub fn max_size(canvas_width: f64, max_size_factor: f64) -> f64 {
    canvas_width / max_size_factor.max(f64::EPSILON)
}

/// Continuous growth: `base · (1 + distance / (2 · canvas_height) · rate)`, capped
pub fn size_for_distance(
    base_size: f64,
    distance: f64,
    canvas_height: f64,
    rate: f64,
    max: f64,
) -> f64 {
    let growth = 1.0 + (distance.max(0.0) / (canvas_height.max(1.0) * 2.0)) * rate;
    (base_size * growth).min(max)
}

/// Discrete growth: one multiplicative step, capped
#[inline]
pub fn grow_discrete(size: f64, factor: f64, max: f64) -> f64 {
    (size * factor.max(1.0)).min(max)
}

/// Inside the target's tolerance box and back at (nearly) the original size
pub fn is_win(
    pos: DVec2,
    size: f64,
    zone: &TargetZone,
    base_size: f64,
    size_tolerance: f64,
) -> bool {
    let offset = (pos - zone.pos).abs();
    offset.x <= zone.tolerance.x
        && offset.y <= zone.tolerance.y
        && (size - base_size).abs() <= size_tolerance
}

/// Whether the cube has grown (or been pushed) past its limit
pub fn should_shatter(object: &RigidObject, rule: ShatterRule, max: f64, push_count: u32) -> bool {
    match rule {
        ShatterRule::MaxSize => object.size >= max,
        ShatterRule::BaseMultiple { multiple } => object.size >= object.base_size * multiple,
        ShatterRule::PushCount { pushes } => push_count >= pushes,
    }
}

/// Split `parent` into `tuning.shard_count` decaying shards
///
/// Shards inherit position and orientation, shrink by `shard_size_ratio`, and
/// get their own velocity and spin. Ids are left at 0 for the caller to assign.
pub fn shatter<R: Rng>(parent: &RigidObject, tuning: &Tuning, rng: &mut R) -> Vec<RigidObject> {
    let count = tuning.shard_count;
    let shard_size = parent.size * tuning.shard_size_ratio;

    (0..count)
        .map(|i| {
            let angle = match tuning.shard_scatter {
                ScatterScheme::Radial => std::f64::consts::TAU * i as f64 / count as f64,
                ScatterScheme::Random => rng.random_range(0.0..std::f64::consts::TAU),
            };
            let speed = random_in(rng, tuning.shard_speed_min, tuning.shard_speed_max);
            let spin = DVec2::new(
                random_in(rng, -tuning.shard_spin, tuning.shard_spin),
                random_in(rng, -tuning.shard_spin, tuning.shard_spin),
            );

            let mut shard = RigidObject::new(0, parent.pos, shard_size)
                .with_orientation(parent.orientation);
            shard.vel = polar_to_cartesian(speed, angle);
            shard.spin = spin;
            shard.life = Some(1.0);
            shard.alpha = Some(1.0);
            shard
        })
        .collect()
}

/// Uniform sample in `[lo, hi)`, or `lo` when the range is empty
pub(crate) fn random_in<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
