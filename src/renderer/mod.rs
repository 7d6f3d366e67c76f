//! Canvas rendering
//!
//! Polyhedra are rotated and projected on the CPU and emitted as 2D path
//! commands to a `Surface`.

#[cfg(target_arch = "wasm32")]
mod canvas;
pub mod draw;
pub mod mesh;
pub mod projector;
pub mod surface;

pub use draw::{RenderStyle, Renderer};
pub use projector::Projection;
pub use surface::{Color, DrawCommand, RecordingSurface, Surface};
