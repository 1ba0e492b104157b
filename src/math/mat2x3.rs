//! 2x3 affine transformation matrix.
//!
//! # Convention
//! - Points are **column vectors** on the right: `Mat2x3 * p`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * p` applies B first, then A

use std::ops::Mul;

use super::vec2::Vec2;

/// 2x3 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2x3 {
    data: [[f32; 3]; 2],
}

impl Mat2x3 {
    pub fn new(data: [[f32; 3]; 2]) -> Self {
        Mat2x3 { data }
    }

    pub fn identity() -> Self {
        Mat2x3::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    /// Creates a translation matrix.
    pub fn translation(x: f32, y: f32) -> Self {
        Mat2x3::new([[1.0, 0.0, x], [0.0, 1.0, y]])
    }

    /// Creates a scale matrix. A negative component mirrors along that axis.
    pub fn scaling(x: f32, y: f32) -> Self {
        Mat2x3::new([[x, 0.0, 0.0], [0.0, y, 0.0]])
    }

    /// Creates a rotation matrix (angle in radians).
    pub fn rotation(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat2x3::new([[c, -s, 0.0], [s, c, 0.0]])
    }

    /// Determinant of the upper 2x2 (rotation/scale) part.
    ///
    /// Negative when the transform reflects, which flips the winding of
    /// any ring it is applied to.
    pub fn determinant_upper_2x2(&self) -> f32 {
        self.data[0][0] * self.data[1][1] - self.data[0][1] * self.data[1][0]
    }

    /// Transforms a point (translation applied).
    pub fn transform_position(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.data[0][0] * p.x + self.data[0][1] * p.y + self.data[0][2],
            self.data[1][0] * p.x + self.data[1][1] * p.y + self.data[1][2],
        )
    }
}

impl Default for Mat2x3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Matrix composition: `self * rhs` applies `rhs` first.
impl Mul<Mat2x3> for Mat2x3 {
    type Output = Mat2x3;

    fn mul(self, rhs: Mat2x3) -> Self::Output {
        let a = &self.data;
        let b = &rhs.data;
        Mat2x3::new([
            [
                a[0][0] * b[0][0] + a[0][1] * b[1][0],
                a[0][0] * b[0][1] + a[0][1] * b[1][1],
                a[0][0] * b[0][2] + a[0][1] * b[1][2] + a[0][2],
            ],
            [
                a[1][0] * b[0][0] + a[1][1] * b[1][0],
                a[1][0] * b[0][1] + a[1][1] * b[1][1],
                a[1][0] * b[0][2] + a[1][1] * b[1][2] + a[1][2],
            ],
        ])
    }
}

impl Mul<Vec2> for Mat2x3 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Self::Output {
        self.transform_position(rhs)
    }
}
