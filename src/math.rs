//! Vector and 2x2 matrix primitives
//!
//! `glam::Vec2` already provides component-wise add/sub, scalar scaling,
//! `length` and `dot`. This module adds the pieces with conventions of their
//! own: the zero-length precondition on normalization, the rotation and
//! scaling constructors, and row-major entry access for `Mat2` (which glam
//! stores column-major).

pub use glam::{Mat2, Vec2};

/// Unit vector in the direction of `v`.
///
/// `v` must be non-zero. Callers in the physics engine only normalize
/// displacements already proven non-degenerate.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    debug_assert!(len > 0.0, "normalize called on a zero-length vector");
    v * (1.0 / len)
}

/// Counter-clockwise rotation `[[cos, -sin], [sin, cos]]`
#[inline]
pub fn rotation(angle: f32) -> Mat2 {
    Mat2::from_angle(angle)
}

/// Uniform scaling `s * I`
#[inline]
pub fn scaling(s: f32) -> Mat2 {
    Mat2::from_diagonal(Vec2::splat(s))
}

/// Matrix entries in row-major order `[m00, m01, m10, m11]`
#[inline]
pub fn to_row_major(m: Mat2) -> [f32; 4] {
    m.transpose().to_cols_array()
}

/// Build a matrix from row-major entries `[m00, m01, m10, m11]`
#[inline]
pub fn from_row_major(e: [f32; 4]) -> Mat2 {
    Mat2::from_cols_array(&e).transpose()
}
