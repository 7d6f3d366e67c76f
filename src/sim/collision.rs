//! Boundary and platform collision for axis-aligned cubes
//!
//! A cube is treated as a square of half-extent `size / 2` centred on its
//! position. Walls and platforms are axis-aligned rectangles; every edge is
//! tested independently so corner hits resolve both axes in the same frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(DVec2::new(x, y), DVec2::new(x + w, y + h))
    }

    /// Overlap with a square of the given half-extent centred at `pos`
    pub fn overlaps_square(&self, pos: DVec2, half: f64) -> bool {
        pos.x + half > self.min.x
            && pos.x - half < self.max.x
            && pos.y + half > self.min.y
            && pos.y - half < self.max.y
    }
}

/// Which walls were touched during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContacts {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallContacts {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Clamp a square inside `bounds`, scaling the violating velocity component by
/// `bounce` (negative restitution, e.g. -0.5). All four edges are checked.
pub fn resolve_walls(
    pos: &mut DVec2,
    vel: &mut DVec2,
    half: f64,
    bounds: &Rect,
    bounce: f64,
) -> WallContacts {
    let mut contacts = WallContacts::default();

    if pos.y > bounds.max.y - half {
        pos.y = bounds.max.y - half;
        vel.y *= bounce;
        contacts.bottom = true;
    }
    if pos.y < bounds.min.y + half {
        pos.y = bounds.min.y + half;
        vel.y *= bounce;
        contacts.top = true;
    }
    if pos.x < bounds.min.x + half {
        pos.x = bounds.min.x + half;
        vel.x *= bounce;
        contacts.left = true;
    }
    if pos.x > bounds.max.x - half {
        pos.x = bounds.max.x - half;
        vel.x *= bounce;
        contacts.right = true;
    }

    contacts
}

/// Push a square out of a solid platform along the axis of least penetration
///
/// Velocity is only reflected when it points into the platform, so a cube
/// resting on a ledge does not jitter.
pub fn resolve_platform(
    pos: &mut DVec2,
    vel: &mut DVec2,
    half: f64,
    platform: &Rect,
    bounce: f64,
) -> bool {
    if !platform.overlaps_square(*pos, half) {
        return false;
    }

    let push_left = pos.x + half - platform.min.x;
    let push_right = platform.max.x - (pos.x - half);
    let push_up = pos.y + half - platform.min.y;
    let push_down = platform.max.y - (pos.y - half);

    let min_x = push_left.min(push_right);
    let min_y = push_up.min(push_down);

    if min_x < min_y {
        if push_left < push_right {
            pos.x -= push_left;
            if vel.x > 0.0 {
                vel.x *= bounce;
            }
        } else {
            pos.x += push_right;
            if vel.x < 0.0 {
                vel.x *= bounce;
            }
        }
    } else if push_up < push_down {
        pos.y -= push_up;
        if vel.y > 0.0 {
            vel.y *= bounce;
        }
    } else {
        pos.y += push_down;
        if vel.y < 0.0 {
            vel.y *= bounce;
        }
    }

    true
}
