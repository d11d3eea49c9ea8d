//! Math type re-exports and conversions between archive and renderer numerics.
//!
//! Archives store matrices row-major in double precision (row-vector
//! convention); the scene engine and renderers work with column-major
//! single-precision glam types.

pub use glam::{DMat4, DVec3, Mat3, Mat4, Vec2, Vec3, Vec4};

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Chrono type - time value (seconds).
pub type Chrono = f64;

/// Build a column-major [`Mat4`] from a row-major 4x4 array.
///
/// Row-vector matrices (translation in the last row) become column-vector
/// matrices (translation in the last column) by reading rows as columns.
pub fn mat4_from_row_major(m: &[f64; 16]) -> Mat4 {
    let v: [f32; 16] = std::array::from_fn(|i| m[i] as f32);
    Mat4::from_cols_array(&v)
}

/// Matrix used to carry normals through `m` (inverse transpose of the 3x3 part).
///
/// Degenerate matrices fall back to the plain 3x3 part.
pub fn normal_matrix(m: &Mat4) -> Mat3 {
    let m3 = Mat3::from_mat4(*m);
    if m3.determinant().abs() <= f32::EPSILON {
        m3
    } else {
        m3.inverse().transpose()
    }
}

/// Convert an archive `[x, y, z]` triple into a renderer vector.
#[inline]
pub fn vec3_from_array(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

/// Convert an archive `[u, v]` pair into a renderer vector.
#[inline]
pub fn vec2_from_array(v: [f32; 2]) -> Vec2 {
    Vec2::from_array(v)
}

/// 3D bounding box with single precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounding box of a point list; empty for an empty list.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.expand_by_point(*p);
        }
        b
    }

    /// Check if this box is empty (has no volume).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand this box to include another box.
    #[inline]
    pub fn expand_by_box(&mut self, other: &Self) {
        if !other.is_empty() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    /// Get the center of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (extents) of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for BBox3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}
