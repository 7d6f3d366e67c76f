//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in `GameState`, owned by a single
//! controller and passed by reference into the integrator and renderer.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::orientation::Orientation;
use super::scene::{Scene, SceneClock, Timeline};
use crate::Viewport;
use crate::levels::Level;
use crate::tuning::Tuning;

/// A cube (or shard) pushed around the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct RigidObject {
    pub id: u32,
    /// Centre in screen space
    pub pos: DVec2,
    /// Velocity in pixels per frame
    pub vel: DVec2,
    /// Edge length, always > 0
    pub size: f64,
    /// Size at which mass is 1
    pub base_size: f64,
    pub orientation: Orientation,
    /// Angular velocity (x: about X axis, y: about Y axis), radians per frame
    pub spin: DVec2,
    /// Fade-out opacity (None = fully opaque, never fades)
    pub alpha: Option<f64>,
    /// Remaining life for decaying shards
    pub life: Option<f64>,
}

impl RigidObject {
    pub fn new(id: u32, pos: DVec2, size: f64) -> Self {
        let size = size.max(f64::EPSILON);
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            size,
            base_size: size,
            orientation: Orientation::default(),
            spin: DVec2::ZERO,
            alpha: None,
            life: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[inline]
    pub fn half_size(&self) -> f64 {
        self.size / 2.0
    }

    /// Derived mass `(size / base_size)^exponent`
    pub fn mass(&self, exponent: f64) -> f64 {
        super::rules::mass_for_size(self.size, self.base_size, exponent)
    }

    /// Set a new size (kept strictly positive)
    pub fn set_size(&mut self, size: f64) {
        self.size = size.max(f64::EPSILON);
    }

    /// Stop all linear and angular motion
    pub fn freeze(&mut self) {
        self.vel = DVec2::ZERO;
        self.spin = DVec2::ZERO;
    }

    /// Opacity used for drawing
    pub fn opacity(&self) -> f64 {
        self.alpha.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Faded out or decayed
    pub fn is_dead(&self) -> bool {
        self.alpha.is_some_and(|a| a <= 0.0) || self.life.is_some_and(|l| l <= 0.0)
    }
}

/// A decorative cube raining through the transition screens
#[derive(Debug, Clone, PartialEq)]
pub struct DecorCube {
    pub pos: DVec2,
    pub size: f64,
    pub orientation: Orientation,
    pub spin: DVec2,
    /// Fall speed in pixels per frame
    pub speed: f64,
}

impl DecorCube {
    /// Fully below the bottom edge
    pub fn exited(&self, viewport: &Viewport) -> bool {
        self.pos.y - self.size / 2.0 >= viewport.height
    }
}

/// Target the cube must reach, with a tolerance box around its position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetZone {
    pub pos: DVec2,
    /// Half-extents of the acceptance box
    pub tolerance: DVec2,
}

impl TargetZone {
    /// Band along the top of the canvas, as deep as `zone_height`
    pub fn top_band(viewport: &Viewport, zone_height: f64, start_size: f64) -> Self {
        let half_band = zone_height / 2.0;
        Self {
            pos: DVec2::new(viewport.width / 2.0, start_size / 2.0 + half_band),
            tolerance: DVec2::new(viewport.width / 2.0, half_band),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos - self.tolerance, self.pos + self.tolerance)
    }
}

/// Transient instruction text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    /// Tick after which the message disappears
    pub expires_at: u64,
}

/// Title screen letter spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleState {
    pub rotation_x: f64,
    pub rotation_y: f64,
}

impl Default for TitleState {
    fn default() -> Self {
        Self {
            rotation_x: crate::consts::TITLE_ROTATION_X,
            rotation_y: 0.0,
        }
    }
}

/// Pointer state sampled between frames
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub dragging: bool,
    pub last: DVec2,
    /// Distance covered by the current drag
    pub drag_distance: f64,
    /// Where a restart swipe began (collapsing scene only)
    pub swipe_start: Option<DVec2>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Frame counter
    pub time_ticks: u64,
    pub clock: SceneClock,
    pub timeline: Timeline,
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub level: Level,
    /// Live cubes; exactly one while the puzzle is being played
    pub objects: Vec<RigidObject>,
    pub decor: Vec<DecorCube>,
    pub title: TitleState,
    pub pointer: PointerState,
    pub total_distance_pushed: f64,
    pub push_count: u32,
    /// Input-driven force opposing gravity (device flipped over)
    pub upward_force: f64,
    /// A flip while won knocks the cube loose; disarmed until the device is
    /// back under the tilt threshold
    pub tilt_armed: bool,
    pub target: TargetZone,
    pub platforms: Vec<Rect>,
    pub message: Option<Message>,
    /// Set once a level hint has been shown this attempt
    pub hint_shown: bool,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning, level: Level) -> Self {
        let target = TargetZone::top_band(&viewport, tuning.win_zone_height, tuning.start_size);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            clock: SceneClock::new(Scene::Title),
            timeline: Timeline::default(),
            viewport,
            tuning,
            level,
            objects: Vec::new(),
            decor: Vec::new(),
            title: TitleState::default(),
            pointer: PointerState::default(),
            total_distance_pushed: 0.0,
            push_count: 0,
            upward_force: 0.0,
            tilt_armed: false,
            target,
            platforms: Vec::new(),
            message: None,
            hint_shown: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn scene(&self) -> Scene {
        self.clock.scene
    }

    /// The pushable cube, present only while exactly one object is live
    pub fn primary(&self) -> Option<&RigidObject> {
        match self.objects.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn primary_mut(&mut self) -> Option<&mut RigidObject> {
        match self.objects.as_mut_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Size cap for the current viewport
    pub fn max_size(&self) -> f64 {
        super::rules::max_size(self.viewport.width, self.tuning.max_size_factor)
    }

    /// Canvas rectangle objects bounce inside
    pub fn bounds(&self) -> Rect {
        Rect::from_xywh(0.0, 0.0, self.viewport.width, self.viewport.height)
    }

    /// Canonical start position of a fresh cube
    pub fn start_position(&self) -> DVec2 {
        crate::levels::start_position(&self.viewport, &self.tuning)
    }

    /// Show instruction text for `duration` ticks
    pub fn show_message(&mut self, text: impl Into<String>, duration: u64) {
        self.message = Some(Message {
            text: text.into(),
            expires_at: self.time_ticks + duration,
        });
    }

    /// Drop the message once its time is up
    pub fn expire_message(&mut self) {
        if self
            .message
            .as_ref()
            .is_some_and(|m| self.time_ticks >= m.expires_at)
        {
            self.message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(1, Viewport::new(1200.0, 800.0), Tuning::default(), Level::Open)
    }

    #[test]
    fn test_new_state_starts_on_title() {
        let state = state();
        assert_eq!(state.scene(), Scene::Title);
        assert!(state.objects.is_empty());
        assert_eq!(state.max_size(), 300.0);
    }

    #[test]
    fn test_primary_requires_exactly_one_object() {
        let mut state = state();
        assert!(state.primary().is_none());
        let id = state.next_entity_id();
        state.objects.push(RigidObject::new(id, DVec2::ZERO, 50.0));
        assert_eq!(state.primary().map(|o| o.id), Some(id));
        let id = state.next_entity_id();
        state.objects.push(RigidObject::new(id, DVec2::ZERO, 10.0));
        assert!(state.primary().is_none());
    }

    #[test]
    fn test_start_position_above_floor() {
        let state = state();
        assert_eq!(state.start_position(), DVec2::new(600.0, 725.0));
    }

    #[test]
    fn test_message_expires() {
        let mut state = state();
        state.show_message("hello", 3);
        state.time_ticks = 2;
        state.expire_message();
        assert!(state.message.is_some());
        state.time_ticks = 3;
        state.expire_message();
        assert!(state.message.is_none());
    }

    #[test]
    fn test_dead_when_life_or_alpha_spent() {
        let mut obj = RigidObject::new(1, DVec2::ZERO, 10.0);
        assert!(!obj.is_dead());
        obj.life = Some(0.0);
        assert!(obj.is_dead());
        obj.life = None;
        obj.alpha = Some(-0.1);
        assert!(obj.is_dead());
        assert_eq!(obj.opacity(), 0.0);
    }

    #[test]
    fn test_top_band_target() {
        let vp = Viewport::new(1200.0, 800.0);
        let zone = TargetZone::top_band(&vp, 50.0, 50.0);
        assert_eq!(zone.pos, DVec2::new(600.0, 50.0));
        assert_eq!(zone.tolerance, DVec2::new(600.0, 25.0));
    }
}
