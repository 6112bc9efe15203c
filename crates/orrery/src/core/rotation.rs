//! Elementary rotations about the coordinate axes.

use glam::{DMat3, DVec3};

/// Coordinate axis selector for [`rotation_matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Right-handed rotation by `angle` radians about `axis`.
pub fn rotation_matrix(angle: f64, axis: Axis) -> DMat3 {
    let (s, c) = angle.sin_cos();
    // glam matrices are column-major: each DVec3 below is a column.
    match axis {
        Axis::X => DMat3::from_cols(
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, c, s),
            DVec3::new(0.0, -s, c),
        ),
        Axis::Y => DMat3::from_cols(
            DVec3::new(c, 0.0, -s),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(s, 0.0, c),
        ),
        Axis::Z => DMat3::from_cols(
            DVec3::new(c, s, 0.0),
            DVec3::new(-s, c, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ),
    }
}
