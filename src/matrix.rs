//! 2D affine matrix math.
//!
//! A [`TransformMatrix`] is the 6-tuple `(a, b, c, d, tx, ty)` of the
//! homogeneous matrix
//!
//! ```text
//! | a  c  tx |
//! | b  d  ty |
//! | 0  0  1  |
//! ```
//!
//! mapping `(x, y)` to `(a·x + c·y + tx, b·x + d·y + ty)`. Device space is
//! y-down, so a positive rotation turns clockwise on screen. All angles cross
//! this API in degrees; radians only appear inside trig calls.

#[cfg(test)]
#[path = "matrix_test.rs"]
mod matrix_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MATRIX_EQ_EPSILON, SINGULAR_DET_EPSILON};
use crate::coords::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        identity()
    }
}

impl TransformMatrix {
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.determinant().abs() < SINGULAR_DET_EPSILON
    }
}

/// Translation, rotation and scale recovered from a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decomposed {
    pub translation: Point,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
    pub scale: Point,
}

#[must_use]
pub const fn identity() -> TransformMatrix {
    TransformMatrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
}

#[must_use]
pub const fn translate(tx: f64, ty: f64) -> TransformMatrix {
    TransformMatrix::new(1.0, 0.0, 0.0, 1.0, tx, ty)
}

/// Clockwise rotation (y-down) by `angle_deg` about the origin.
#[must_use]
pub fn rotate(angle_deg: f64) -> TransformMatrix {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    TransformMatrix::new(cos, sin, -sin, cos, 0.0, 0.0)
}

#[must_use]
pub const fn scale(sx: f64, sy: f64) -> TransformMatrix {
    TransformMatrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
}

#[must_use]
pub const fn scale_uniform(s: f64) -> TransformMatrix {
    scale(s, s)
}

/// `m1 · m2`: the result applies `m2` first, then `m1`.
#[must_use]
pub fn multiply(m1: &TransformMatrix, m2: &TransformMatrix) -> TransformMatrix {
    TransformMatrix {
        a: m1.a * m2.a + m1.c * m2.b,
        b: m1.b * m2.a + m1.d * m2.b,
        c: m1.a * m2.c + m1.c * m2.d,
        d: m1.b * m2.c + m1.d * m2.d,
        tx: m1.a * m2.tx + m1.c * m2.ty + m1.tx,
        ty: m1.b * m2.tx + m1.d * m2.ty + m1.ty,
    }
}

/// Inverse of `m`, or identity when `m` is singular.
#[must_use]
pub fn invert(m: &TransformMatrix) -> TransformMatrix {
    let det = m.determinant();
    if det.abs() < SINGULAR_DET_EPSILON || !det.is_finite() {
        tracing::debug!(det, "singular matrix inversion; falling back to identity");
        return identity();
    }
    let inv = 1.0 / det;
    TransformMatrix {
        a: m.d * inv,
        b: -m.b * inv,
        c: -m.c * inv,
        d: m.a * inv,
        tx: (m.c * m.ty - m.d * m.tx) * inv,
        ty: (m.b * m.tx - m.a * m.ty) * inv,
    }
}

#[must_use]
pub fn apply_to_point(m: &TransformMatrix, x: f64, y: f64) -> Point {
    Point::new(m.a * x + m.c * y + m.tx, m.b * x + m.d * y + m.ty)
}

#[must_use]
pub fn apply_inverse_to_point(m: &TransformMatrix, x: f64, y: f64) -> Point {
    apply_to_point(&invert(m), x, y)
}

/// Chain matrices in application order: `matrices[0]` is applied first.
#[must_use]
pub fn compose(matrices: &[TransformMatrix]) -> TransformMatrix {
    matrices
        .iter()
        .fold(identity(), |acc, m| multiply(m, &acc))
}

/// Build `translate · rotate · scale`, the inverse of [`decompose`].
#[must_use]
pub fn from_components(translation: Point, rotation_deg: f64, scale_xy: Point) -> TransformMatrix {
    compose(&[
        scale(scale_xy.x, scale_xy.y),
        rotate(rotation_deg),
        translate(translation.x, translation.y),
    ])
}

/// Split a matrix into translation, rotation and per-axis scale.
///
/// Assumes no skew; a matrix built by [`from_components`] with positive
/// scale round-trips within floating tolerance.
#[must_use]
pub fn decompose(m: &TransformMatrix) -> Decomposed {
    let sx = m.a.hypot(m.b);
    let sy = m.c.hypot(m.d);
    let rotation = m.b.atan2(m.a).to_degrees().rem_euclid(360.0);
    Decomposed {
        translation: Point::new(m.tx, m.ty),
        // rem_euclid can land on 360.0 for tiny negative inputs.
        rotation: if rotation >= 360.0 { 0.0 } else { rotation },
        scale: Point::new(sx, sy),
    }
}

#[must_use]
pub fn matrices_equal(m1: &TransformMatrix, m2: &TransformMatrix) -> bool {
    matrices_equal_within(m1, m2, MATRIX_EQ_EPSILON)
}

#[must_use]
pub fn matrices_equal_within(m1: &TransformMatrix, m2: &TransformMatrix, epsilon: f64) -> bool {
    (m1.a - m2.a).abs() < epsilon
        && (m1.b - m2.b).abs() < epsilon
        && (m1.c - m2.c).abs() < epsilon
        && (m1.d - m2.d).abs() < epsilon
        && (m1.tx - m2.tx).abs() < epsilon
        && (m1.ty - m2.ty).abs() < epsilon
}

/// Rotate the vector `(dx, dy)` by `angle_deg` about the origin.
#[must_use]
pub fn rotate_vector(dx: f64, dy: f64, angle_deg: f64) -> Point {
    apply_to_point(&rotate(angle_deg), dx, dy)
}
