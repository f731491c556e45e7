//! 4x4 homogeneous transformation matrix.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - Rotations are right-handed (counter-clockwise looking down the axis)
//!
//! The in-place builders ([`Mat4::translate`], [`Mat4::scale`], ...) pre-multiply,
//! so each call appends a transform that is applied *after* everything already
//! in the matrix:
//!
//! ```ignore
//! let mut m = Mat4::identity();
//! m.scale(2.0, 2.0, 2.0).translate(1.0, 0.0, 0.0); // m == T * S
//! ```

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// All sixteen entries set to zero.
    pub fn zero() -> Self {
        Mat4::new([[0.0; 4]; 4])
    }

    // ============ Constructors ============

    /// Creates a translation matrix.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation that takes the orthonormal basis `(u, v, w)` onto the x, y and
    /// z axes. The basis vectors become the matrix rows.
    pub fn basis_rotation(u: Vec3, v: Vec3, w: Vec3) -> Self {
        Mat4::new([
            [u.x, u.y, u.z, 0.0],
            [v.x, v.y, v.z, 0.0],
            [w.x, w.y, w.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 2D shear: `x' = x + shx * y`, `y' = y + shy * x`.
    pub fn shearing_2d(shx: f32, shy: f32) -> Self {
        Mat4::new([
            [1.0, shx, 0.0, 0.0],
            [shy, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Shear along z: `x' = x + shx * z`, `y' = y + shy * z`.
    pub fn shearing_z(shx: f32, shy: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, shx, 0.0],
            [0.0, 1.0, shy, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Perspective projection with the center of projection at the origin and
    /// the view plane at `z = d`. Leaves `w = z / d`.
    pub fn perspective_projection(d: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0 / d, 0.0],
        ])
    }

    // ============ In-place Composition ============

    /// Append `m`: the stored matrix becomes `m * self`.
    pub fn pre_multiply(&mut self, m: Mat4) -> &mut Self {
        *self = m * *self;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.pre_multiply(Mat4::translation(x, y, z))
    }

    pub fn translate_2d(&mut self, x: f32, y: f32) -> &mut Self {
        self.translate(x, y, 0.0)
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.pre_multiply(Mat4::scaling(x, y, z))
    }

    pub fn scale_2d(&mut self, x: f32, y: f32) -> &mut Self {
        self.scale(x, y, 1.0)
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.pre_multiply(Mat4::rotation_x(angle))
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.pre_multiply(Mat4::rotation_y(angle))
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.pre_multiply(Mat4::rotation_z(angle))
    }

    pub fn rotate_xyz(&mut self, u: Vec3, v: Vec3, w: Vec3) -> &mut Self {
        self.pre_multiply(Mat4::basis_rotation(u, v, w))
    }

    pub fn shear_2d(&mut self, shx: f32, shy: f32) -> &mut Self {
        self.pre_multiply(Mat4::shearing_2d(shx, shy))
    }

    pub fn shear_z(&mut self, shx: f32, shy: f32) -> &mut Self {
        self.pre_multiply(Mat4::shearing_z(shx, shy))
    }

    pub fn perspective(&mut self, d: f32) -> &mut Self {
        self.pre_multiply(Mat4::perspective_projection(d))
    }

    // ============ Queries ============

    pub fn transpose(&self) -> Self {
        let mut result = [[0.0f32; 4]; 4];
        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4::new(result)
    }

    /// Computes the inverse of the matrix, if it exists.
    /// Returns `None` if the matrix is singular: its determinant is negligible
    /// next to the product of its row lengths, so the test does not depend on
    /// the overall scale.
    pub fn inverse(&self) -> Option<Mat4> {
        let m = &self.data;

        // 2x2 minors of the bottom two rows, reused by the first two cofactor rows
        let s0 = m[2][0] * m[3][1] - m[2][1] * m[3][0];
        let s1 = m[2][0] * m[3][2] - m[2][2] * m[3][0];
        let s2 = m[2][0] * m[3][3] - m[2][3] * m[3][0];
        let s3 = m[2][1] * m[3][2] - m[2][2] * m[3][1];
        let s4 = m[2][1] * m[3][3] - m[2][3] * m[3][1];
        let s5 = m[2][2] * m[3][3] - m[2][3] * m[3][2];

        // and of the top two rows
        let t0 = m[0][0] * m[1][1] - m[0][1] * m[1][0];
        let t1 = m[0][0] * m[1][2] - m[0][2] * m[1][0];
        let t2 = m[0][0] * m[1][3] - m[0][3] * m[1][0];
        let t3 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let t4 = m[0][1] * m[1][3] - m[0][3] * m[1][1];
        let t5 = m[0][2] * m[1][3] - m[0][3] * m[1][2];

        let det = t0 * s5 - t1 * s4 + t2 * s3 + t3 * s2 - t4 * s1 + t5 * s0;
        // Hadamard bound: |det| <= product of row lengths
        let bound: f32 = m
            .iter()
            .map(|row| row.iter().map(|v| v * v).sum::<f32>().sqrt())
            .product();
        if bound == 0.0 || !det.is_finite() || det.abs() <= f32::EPSILON * bound {
            return None;
        }
        let inv_det = 1.0 / det;

        Some(Mat4::new([
            [
                (m[1][1] * s5 - m[1][2] * s4 + m[1][3] * s3) * inv_det,
                (-m[0][1] * s5 + m[0][2] * s4 - m[0][3] * s3) * inv_det,
                (m[3][1] * t5 - m[3][2] * t4 + m[3][3] * t3) * inv_det,
                (-m[2][1] * t5 + m[2][2] * t4 - m[2][3] * t3) * inv_det,
            ],
            [
                (-m[1][0] * s5 + m[1][2] * s2 - m[1][3] * s1) * inv_det,
                (m[0][0] * s5 - m[0][2] * s2 + m[0][3] * s1) * inv_det,
                (-m[3][0] * t5 + m[3][2] * t2 - m[3][3] * t1) * inv_det,
                (m[2][0] * t5 - m[2][2] * t2 + m[2][3] * t1) * inv_det,
            ],
            [
                (m[1][0] * s4 - m[1][1] * s2 + m[1][3] * s0) * inv_det,
                (-m[0][0] * s4 + m[0][1] * s2 - m[0][3] * s0) * inv_det,
                (m[3][0] * t4 - m[3][1] * t2 + m[3][3] * t0) * inv_det,
                (-m[2][0] * t4 + m[2][1] * t2 - m[2][3] * t0) * inv_det,
            ],
            [
                (-m[1][0] * s3 + m[1][1] * s1 - m[1][2] * s0) * inv_det,
                (m[0][0] * s3 - m[0][1] * s1 + m[0][2] * s0) * inv_det,
                (-m[3][0] * t3 + m[3][1] * t1 - m[3][2] * t0) * inv_det,
                (m[2][0] * t3 - m[2][1] * t1 + m[2][2] * t0) * inv_det,
            ],
        ]))
    }

    /// Generate the normal matrix for lighting calculations.
    ///
    /// This is the inverse transpose of the upper 3x3 block (translation and
    /// projection rows are dropped), which keeps normals perpendicular to
    /// surfaces under non-uniform scaling. A singular block falls back to the
    /// block itself.
    pub fn normal_matrix(&self) -> Mat4 {
        let mut linear = *self;
        for i in 0..3 {
            linear.data[i][3] = 0.0;
            linear.data[3][i] = 0.0;
        }
        linear.data[3][3] = 1.0;

        linear
            .inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear)
    }

    /// Transform a direction (w = 0); translation does not apply.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).to_vec3()
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let d = &self.data;
        Vec4::new(
            d[0][0] * v.x + d[0][1] * v.y + d[0][2] * v.z + d[0][3] * v.w,
            d[1][0] * v.x + d[1][1] * v.y + d[1][2] * v.z + d[1][3] * v.w,
            d[2][0] * v.x + d[2][1] * v.y + d[2][2] * v.z + d[2][3] * v.w,
            d[3][0] * v.x + d[3][1] * v.y + d[3][2] * v.z + d[3][3] * v.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for row in 0..4 {
            for col in 0..4 {
                assert_relative_eq!(a.get(row, col), b.get(row, col), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_builders_pre_multiply() {
        let mut m = Mat4::identity();
        m.translate(1.0, 2.0, 3.0).scale(2.0, 3.0, 4.0);
        let expected = Mat4::scaling(2.0, 3.0, 4.0) * Mat4::translation(1.0, 2.0, 3.0);
        assert_mat_eq(m, expected);

        // translate first, then scale the translated point
        let p = m * Vec4::point(1.0, 1.0, 1.0);
        assert_eq!(p, Vec4::point(4.0, 9.0, 16.0));
    }

    #[test]
    fn test_vectors_ignore_translation() {
        let m = Mat4::translation(5.0, 5.0, 5.0);
        let v = Vec4::direction(1.0, 2.0, 3.0);
        assert_eq!(m * v, v);
    }

    #[test]
    fn test_rotation_z_is_counter_clockwise() {
        let p = Mat4::rotation_z(FRAC_PI_2) * Vec4::point(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_x_and_y() {
        let p = Mat4::rotation_x(FRAC_PI_2) * Vec4::point(0.0, 1.0, 0.0);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);
        let p = Mat4::rotation_y(FRAC_PI_2) * Vec4::point(0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_basis_rotation_maps_basis_to_axes() {
        let u = Vec3::new(0.0, 1.0, 0.0);
        let v = Vec3::new(0.0, 0.0, 1.0);
        let w = Vec3::new(1.0, 0.0, 0.0);
        let m = Mat4::basis_rotation(u, v, w);
        assert_eq!(m * Vec4::from_vec3(u, 0.0), Vec4::direction(1.0, 0.0, 0.0));
        assert_eq!(m * Vec4::from_vec3(w, 0.0), Vec4::direction(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_shear() {
        let p = Mat4::shearing_2d(0.5, 0.0) * Vec4::point(1.0, 2.0, 0.0);
        assert_eq!(p, Vec4::point(2.0, 2.0, 0.0));
        let p = Mat4::shearing_z(1.0, 2.0) * Vec4::point(0.0, 0.0, 3.0);
        assert_eq!(p, Vec4::point(3.0, 6.0, 3.0));
    }

    #[test]
    fn test_perspective_projection() {
        let p = (Mat4::perspective_projection(2.0) * Vec4::point(4.0, 2.0, 4.0)).homogenize();
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn test_inverse() {
        let mut m = Mat4::identity();
        m.scale(2.0, 3.0, 4.0).rotate_y(0.7).translate(1.0, -2.0, 5.0);
        let inv = m.inverse().unwrap();
        assert_mat_eq(m * inv, Mat4::identity());
        assert_mat_eq(inv * m, Mat4::identity());
    }

    #[test]
    fn test_inverse_singular() {
        assert!(Mat4::zero().inverse().is_none());
        assert!(Mat4::scaling(1.0, 0.0, 1.0).inverse().is_none());
        // two equal rows
        let mut m = Mat4::rotation_z(0.3);
        m.data[1] = m.data[0];
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_inverse_of_small_uniform_scale() {
        let m = Mat4::scaling(0.004, 0.004, 0.004);
        let inv = m.inverse().unwrap();
        assert_relative_eq!(inv.get(0, 0), 250.0, epsilon = 1e-2);
        assert_mat_eq(m * inv, Mat4::identity());

        let mut skew = Mat4::identity();
        skew.scale(0.004, 0.002, 0.004).rotate_z(0.5);
        let n = skew.normal_matrix().transform_vector(Vec3::new(1.0, 1.0, 0.0));
        let tangent = skew.transform_vector(Vec3::new(1.0, -1.0, 0.0));
        assert_relative_eq!(n.normalize().dot(tangent.normalize()), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transpose() {
        let m = Mat4::translation(1.0, 2.0, 3.0).transpose();
        assert_eq!(m.get(3, 0), 1.0);
        assert_eq!(m.get(3, 2), 3.0);
        assert_eq!(m.get(0, 3), 0.0);
    }

    #[test]
    fn test_normal_matrix_non_uniform_scale() {
        // A 45 degree plane x + y = 0 with normal (1, 1, 0)/sqrt2,
        // stretched by 2 along x.
        let mut m = Mat4::identity();
        m.scale(2.0, 1.0, 1.0).translate(10.0, 0.0, 0.0);
        let n = m.normal_matrix().transform_vector(Vec3::new(1.0, 1.0, 0.0)).normalize();
        let tangent = m.transform_vector(Vec3::new(1.0, -1.0, 0.0));
        assert_relative_eq!(n.dot(tangent), 0.0, epsilon = 1e-6);
    }
}
