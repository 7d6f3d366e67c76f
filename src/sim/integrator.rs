//! Pose integrator
//!
//! One call advances one object by one fixed frame: external force, linear
//! drag, position, orientation, rotational damping, then boundary collision.
//! There is no delta-time compensation; coefficients are per frame.

use glam::DVec2;

use super::collision::{Rect, WallContacts, resolve_platform, resolve_walls};
use super::state::RigidObject;
use crate::tuning::PhysicsParams;

/// Advance velocity, position and orientation without any collision
///
/// `force` is an acceleration added to velocity before drag (gravity points
/// down, `(0, +g)`; the tilt force points up, `(0, -f)`).
pub fn advance(object: &mut RigidObject, force: DVec2, params: &PhysicsParams) {
    object.vel += force;
    object.vel *= params.drag;
    object.pos += object.vel;
    object.orientation.apply_spin(object.spin);
    object.spin *= params.rotational_damping;
}

/// Resolve canvas walls and then each platform
pub fn collide(
    object: &mut RigidObject,
    bounds: &Rect,
    platforms: &[Rect],
    bounce: f64,
) -> WallContacts {
    let half = object.half_size();
    let contacts = resolve_walls(&mut object.pos, &mut object.vel, half, bounds, bounce);
    for platform in platforms {
        resolve_platform(&mut object.pos, &mut object.vel, half, platform, bounce);
    }
    contacts
}

/// Full integrator step: advance, then collide
pub fn step(
    object: &mut RigidObject,
    force: DVec2,
    params: &PhysicsParams,
    bounds: &Rect,
    platforms: &[Rect],
) -> WallContacts {
    advance(object, force, params);
    collide(object, bounds, platforms, params.bounce)
}

/// Apply a drag gesture delta as a push
///
/// Velocity gains `delta · push_multiplier / mass`; spin gains
/// `(dy, -dx) · spin_per_pixel / mass`. Heavier cubes respond less.
pub fn apply_push(
    object: &mut RigidObject,
    delta: DVec2,
    push_multiplier: f64,
    spin_per_pixel: f64,
    mass: f64,
) {
    if !delta.is_finite() || mass <= 0.0 || !mass.is_finite() {
        return;
    }
    object.vel += delta * push_multiplier / mass;
    object.spin.x += delta.y * spin_per_pixel / mass;
    object.spin.y -= delta.x * spin_per_pixel / mass;
}

/// Decay shard life (and the alpha that follows it)
pub fn decay(object: &mut RigidObject, rate: f64) {
    if let Some(life) = object.life.as_mut() {
        *life -= rate;
        object.alpha = Some(life.max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::orientation::Orientation;
    use crate::sim::rules::{mass_for_size, size_for_distance};
    use crate::tuning::Tuning;

    fn canvas() -> Rect {
        Rect::from_xywh(0.0, 0.0, 1200.0, 800.0)
    }

    #[test]
    fn test_bounce_at_floor_scales_velocity() {
        let params = PhysicsParams {
            drag: 1.0,
            rotational_damping: 1.0,
            bounce: -0.5,
        };
        let mut cube = RigidObject::new(1, DVec2::new(600.0, 775.0), 50.0);
        cube.vel.y = 10.0;

        let contacts = step(&mut cube, DVec2::ZERO, &params, &canvas(), &[]);
        assert!(contacts.bottom);
        assert_eq!(cube.vel.y, -5.0);
        assert!(cube.pos.y <= 775.0);

        // Next frame it moves strictly inside
        let contacts = step(&mut cube, DVec2::ZERO, &params, &canvas(), &[]);
        assert!(!contacts.any());
        assert!(cube.pos.y < 775.0);
    }

    #[test]
    fn test_drag_and_damping_applied() {
        let params = Tuning::default().physics();
        let mut cube = RigidObject::new(1, DVec2::new(600.0, 400.0), 50.0);
        cube.vel = DVec2::new(10.0, 0.0);
        cube.spin = DVec2::new(0.1, 0.0);
        advance(&mut cube, DVec2::ZERO, &params);
        assert!((cube.vel.x - 9.2).abs() < 1e-12);
        assert!((cube.pos.x - 609.2).abs() < 1e-12);
        assert!((cube.spin.x - 0.097).abs() < 1e-12);
        let Orientation::Euler { rx, .. } = cube.orientation else {
            panic!("unexpected orientation");
        };
        assert!((rx - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_upward_force_lifts_cube() {
        let params = Tuning::default().physics();
        let mut cube = RigidObject::new(1, DVec2::new(600.0, 400.0), 50.0);
        for _ in 0..60 {
            step(&mut cube, DVec2::new(0.0, -0.1), &params, &canvas(), &[]);
        }
        assert!(cube.pos.y < 400.0);
        assert!(cube.vel.y < 0.0);
    }

    #[test]
    fn test_zero_or_bad_push_is_noop() {
        let mut cube = RigidObject::new(1, DVec2::ZERO, 50.0);
        apply_push(&mut cube, DVec2::new(f64::NAN, 1.0), 0.3, 0.001, 1.0);
        apply_push(&mut cube, DVec2::new(1.0, 1.0), 0.3, 0.001, 0.0);
        assert_eq!(cube.vel, DVec2::ZERO);
        assert_eq!(cube.spin, DVec2::ZERO);
    }

    #[test]
    fn test_push_spin_signs() {
        let mut cube = RigidObject::new(1, DVec2::ZERO, 50.0);
        apply_push(&mut cube, DVec2::new(100.0, -50.0), 0.3, 0.001, 2.0);
        assert!((cube.vel - DVec2::new(15.0, -7.5)).length() < 1e-9);
        assert!((cube.spin.x - (-0.025)).abs() < 1e-12);
        assert!((cube.spin.y - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_decay_fades_alpha() {
        let mut shard = RigidObject::new(1, DVec2::ZERO, 10.0);
        shard.life = Some(0.02);
        decay(&mut shard, 0.01);
        assert!((shard.opacity() - 0.01).abs() < 1e-12);
        decay(&mut shard, 0.01);
        decay(&mut shard, 0.01);
        assert!(shard.is_dead());
        assert_eq!(shard.opacity(), 0.0);
    }

    #[test]
    fn test_drag_gesture_end_to_end() {
        let tuning = Tuning::default();
        let params = tuning.physics();
        let (w, h) = (1200.0, 800.0);
        let mut cube = RigidObject::new(1, DVec2::new(w / 2.0, h - 75.0), tuning.start_size);

        let delta = DVec2::new(0.0, -500.0);
        let size = size_for_distance(tuning.start_size, delta.length(), h, 1.5, w / 4.0);
        cube.set_size(size);
        assert!(cube.size > tuning.start_size);

        let mass = mass_for_size(cube.size, cube.base_size, tuning.mass_exponent);
        apply_push(&mut cube, delta, tuning.push_multiplier, tuning.spin_per_pixel, mass);
        assert!(cube.vel.y < 0.0);

        for _ in 0..200 {
            step(&mut cube, DVec2::ZERO, &params, &canvas(), &[]);
        }
        assert!(cube.vel.y.abs() < 0.01);
        assert!(cube.pos.y < h - 75.0);
    }
}
