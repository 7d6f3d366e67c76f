//! Frame-driven simulation
//!
//! All gameplay logic lives here:
//! - Fixed per-frame step, no delta-time compensation
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod integrator;
pub mod orientation;
pub mod rules;
pub mod scene;
pub mod state;
pub mod tick;

pub use collision::{Rect, WallContacts};
pub use orientation::Orientation;
pub use scene::{Scene, SceneClock, TimedAction, Timeline};
pub use state::{DecorCube, GameState, Message, RigidObject, TargetZone};
pub use tick::{TickInput, enter_scene, resize, tick};
