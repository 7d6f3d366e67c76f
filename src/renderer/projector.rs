//! Rotate and project polyhedron vertices into screen space
//!
//! Projection is pure with respect to pose, mesh and parameters. Results are
//! written into a caller-owned buffer that is resized to exactly the mesh's
//! vertex count, so steady-state frames do not allocate.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::mesh::Polyhedron;
use crate::sim::orientation::Orientation;
use crate::sim::state::{DecorCube, RigidObject};

/// Vertices at or behind this perspective depth are not drawn
const MIN_DEPTH: f64 = 1e-3;

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// Drop z for position, keep it for depth ordering
    #[default]
    Orthographic,
    /// `scale = fov / (viewer_distance + z)`
    Perspective { fov: f64, viewer_distance: f64 },
}

/// A projected vertex: screen position plus depth
///
/// `visible` is false for vertices at or behind the perspective viewer; their
/// screen position is pinned to the object centre and must not be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectedVertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visible: bool,
}

impl ProjectedVertex {
    fn behind_viewer(pos: DVec2, z: f64) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z,
            visible: false,
        }
    }
}

/// Everything the projector needs to know about an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub pos: DVec2,
    pub size: f64,
    pub orientation: Orientation,
    pub alpha: f64,
}

impl From<&RigidObject> for Pose {
    fn from(object: &RigidObject) -> Self {
        Self {
            pos: object.pos,
            size: object.size,
            orientation: object.orientation,
            alpha: object.opacity(),
        }
    }
}

impl From<&DecorCube> for Pose {
    fn from(cube: &DecorCube) -> Self {
        Self {
            pos: cube.pos,
            size: cube.size,
            orientation: cube.orientation,
            alpha: 1.0,
        }
    }
}

/// Project every vertex of `mesh` for `pose` into `out`
pub fn project_into(
    pose: &Pose,
    mesh: &Polyhedron,
    projection: Projection,
    out: &mut Vec<ProjectedVertex>,
) {
    out.resize(mesh.vertex_count(), ProjectedVertex::default());

    let rotation = pose.orientation.to_mat3();
    let half = pose.size / 2.0;

    for (slot, vertex) in out.iter_mut().zip(mesh.vertices) {
        let p: DVec3 = rotation * *vertex * half;
        let scale = match projection {
            Projection::Orthographic => 1.0,
            Projection::Perspective {
                fov,
                viewer_distance,
            } => {
                let depth = viewer_distance + p.z;
                if depth <= MIN_DEPTH {
                    *slot = ProjectedVertex::behind_viewer(pose.pos, p.z);
                    continue;
                }
                fov / depth
            }
        };
        *slot = ProjectedVertex {
            x: pose.pos.x + p.x * scale,
            y: pose.pos.y + p.y * scale,
            z: p.z,
            visible: true,
        };
    }
}

/// Order faces far to near by average projected z (painter's algorithm)
///
/// `order` is a reusable scratch buffer of `(average_z, face_index)`.
pub fn depth_sort_faces(
    projected: &[ProjectedVertex],
    faces: &[&[usize]],
    order: &mut Vec<(f64, usize)>,
) {
    order.clear();
    order.extend(faces.iter().enumerate().map(|(i, face)| {
        let sum: f64 = face.iter().map(|&v| projected[v].z).sum();
        (sum / face.len().max(1) as f64, i)
    }));
    order.sort_by(|a, b| a.0.total_cmp(&b.0));
}
