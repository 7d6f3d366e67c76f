//! Object orientation as an Euler pair or a 3x3 rotation matrix
//!
//! One rotation order is used by physics and rendering alike: rotate about X
//! first, then about Y (`v' = Ry(ry) · Rx(rx) · v`). Spin increments compose
//! the same way and are left-multiplied into a matrix orientation.

use glam::{DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::normalize_angle;

/// Orientation of a rigid object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Orientation {
    /// Pitch (`rx`) and yaw (`ry`) in radians, kept in [-π, π)
    Euler { rx: f64, ry: f64 },
    /// Accumulated rotation matrix, re-orthonormalized after every update
    Matrix(DMat3),
}

impl Default for Orientation {
    fn default() -> Self {
        Self::Euler { rx: 0.0, ry: 0.0 }
    }
}

impl Orientation {
    pub fn euler(rx: f64, ry: f64) -> Self {
        Self::Euler {
            rx: normalize_angle(rx),
            ry: normalize_angle(ry),
        }
    }

    /// Matrix orientation equivalent to the given Euler pair
    pub fn matrix_from_euler(rx: f64, ry: f64) -> Self {
        Self::Matrix(rotation_xy(rx, ry))
    }

    /// The full rotation as a matrix (columns are the rotated basis vectors)
    pub fn to_mat3(&self) -> DMat3 {
        match *self {
            Self::Euler { rx, ry } => rotation_xy(rx, ry),
            Self::Matrix(m) => m,
        }
    }

    /// Rotate a single model-space point
    #[inline]
    pub fn rotate(&self, v: DVec3) -> DVec3 {
        self.to_mat3() * v
    }

    /// Accumulate one frame of angular velocity (`spin.x` about X, `spin.y` about Y)
    pub fn apply_spin(&mut self, spin: DVec2) {
        match self {
            Self::Euler { rx, ry } => {
                *rx = normalize_angle(*rx + spin.x);
                *ry = normalize_angle(*ry + spin.y);
            }
            Self::Matrix(m) => {
                *m = orthonormalize(rotation_xy(spin.x, spin.y) * *m);
            }
        }
    }
}

/// `Ry(ry) · Rx(rx)`: rotate about X, then about Y
#[inline]
pub fn rotation_xy(rx: f64, ry: f64) -> DMat3 {
    DMat3::from_rotation_y(ry) * DMat3::from_rotation_x(rx)
}

/// Gram-Schmidt re-orthonormalization of a drifting rotation matrix
///
/// The third column is rebuilt as `x × y`, so the result is always
/// right-handed (determinant +1). A degenerate input collapses to identity.
pub fn orthonormalize(m: DMat3) -> DMat3 {
    let Some(x) = m.x_axis.try_normalize() else {
        return DMat3::IDENTITY;
    };
    let Some(y) = (m.y_axis - x * x.dot(m.y_axis)).try_normalize() else {
        return DMat3::IDENTITY;
    };
    DMat3::from_cols(x, y, x.cross(y))
}

/// Largest absolute entry of `Mᵀ·M − I` (0 for a perfect rotation)
pub fn orthogonality_error(m: &DMat3) -> f64 {
    let gram = m.transpose() * *m - DMat3::IDENTITY;
    gram.to_cols_array()
        .iter()
        .fold(0.0_f64, |acc, e| acc.max(e.abs()))
}
