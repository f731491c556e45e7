//! Cubic Bézier curves and bicubic Bézier surfaces.
//!
//! Both are tessellated by repeated de Casteljau subdivision at the midpoint:
//! a curve splits into two halves, a surface into four quadrants. Each split
//! doubles (or quadruples) the primitive count, so `depth` controls the
//! tessellation density directly.
//!
//! ```text
//!   p0 ---- p1 ---- p2 ---- p3        control polygon
//!      q1      m       r2             midpoints of the control polygon
//!          q2      r1                 midpoints of those
//!              q3                     point on the curve at t = 1/2
//!
//!   left  = [p0, q1, q2, q3]
//!   right = [q3, r1, r2, p3]
//! ```

use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::primitives::{Line, Polygon};

/// Cubic Bézier curve defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    pub control_points: [Vec4; 4],
    pub z_buffer: bool,
}

impl Default for BezierCurve {
    /// A straight curve from the origin to `(1, 0, 0)`.
    fn default() -> Self {
        Self::new(std::array::from_fn(|i| {
            Vec4::point(i as f32 / 3.0, 0.0, 0.0)
        }))
    }
}

impl BezierCurve {
    pub fn new(control_points: [Vec4; 4]) -> Self {
        Self {
            control_points,
            z_buffer: true,
        }
    }

    /// Split at `t = 1/2` into two curves that together trace the original.
    pub fn subdivide(&self) -> (BezierCurve, BezierCurve) {
        let [left, right] = split(self.control_points);
        (
            BezierCurve {
                control_points: left,
                z_buffer: self.z_buffer,
            },
            BezierCurve {
                control_points: right,
                z_buffer: self.z_buffer,
            },
        )
    }

    /// Evaluate the curve at `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Vec4 {
        de_casteljau(self.control_points, t)
    }

    /// Approximate the curve with `3 * 2^depth` line segments.
    ///
    /// At depth 0 the curve is drawn as its control polygon.
    pub fn flatten(&self, depth: u32) -> Vec<Line> {
        let mut lines = Vec::with_capacity(3 << depth.min(16));
        self.flatten_into(depth, &mut lines);
        lines
    }

    fn flatten_into(&self, depth: u32, lines: &mut Vec<Line>) {
        if depth == 0 {
            for pair in self.control_points.windows(2) {
                lines.push(Line {
                    a: pair[0],
                    b: pair[1],
                    z_buffer: self.z_buffer,
                });
            }
            return;
        }
        let (left, right) = self.subdivide();
        left.flatten_into(depth - 1, lines);
        right.flatten_into(depth - 1, lines);
    }
}

/// Bicubic Bézier patch defined by a 4x4 grid of control points.
///
/// Points are stored row-major: `control_points[4 * row + col]`. The `u`
/// parameter runs along a row (across columns), `v` down the rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSurface {
    pub control_points: [Vec4; 16],
    pub z_buffer: bool,
}

impl Default for BezierSurface {
    /// A flat unit patch in the xz plane.
    fn default() -> Self {
        Self::new(std::array::from_fn(|i| {
            Vec4::point((i % 4) as f32 / 3.0, 0.0, (i / 4) as f32 / 3.0)
        }))
    }
}

impl BezierSurface {
    pub fn new(control_points: [Vec4; 16]) -> Self {
        Self {
            control_points,
            z_buffer: true,
        }
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> Vec4 {
        self.control_points[4 * row + col]
    }

    fn row(&self, row: usize) -> [Vec4; 4] {
        std::array::from_fn(|col| self.at(row, col))
    }

    /// Split at `u = v = 1/2`.
    ///
    /// Returns `[top_left, top_right, bottom_left, bottom_right]`, where left
    /// is the low-`u` half and top the low-`v` half.
    pub fn subdivide(&self) -> [BezierSurface; 4] {
        // rows split in u
        let halves: [[[Vec4; 4]; 2]; 4] = std::array::from_fn(|row| split(self.row(row)));

        // then every column of each half split in v
        let quadrant = |half: usize, lower: usize| {
            let columns: [[[Vec4; 4]; 2]; 4] = std::array::from_fn(|col| {
                split(std::array::from_fn(|row| halves[row][half][col]))
            });
            BezierSurface {
                control_points: std::array::from_fn(|i| columns[i % 4][lower][i / 4]),
                z_buffer: self.z_buffer,
            }
        };

        [quadrant(0, 0), quadrant(1, 0), quadrant(0, 1), quadrant(1, 1)]
    }

    /// Evaluate the surface at `(u, v)` in `[0, 1]^2`.
    pub fn point_at(&self, u: f32, v: f32) -> Vec4 {
        let column = std::array::from_fn(|row| de_casteljau(self.row(row), u));
        de_casteljau(column, v)
    }

    /// Tessellate into `9 * 4^depth` quads with per-vertex normals.
    pub fn flatten_solid(&self, depth: u32) -> Vec<Polygon> {
        let mut polygons = Vec::new();
        self.solid_into(depth, &mut polygons);
        polygons
    }

    /// Tessellate into `24 * 4^depth` lines tracing the control grid rows
    /// and columns of each leaf patch.
    pub fn flatten_wireframe(&self, depth: u32) -> Vec<Line> {
        let mut lines = Vec::new();
        self.wireframe_into(depth, &mut lines);
        lines
    }

    fn solid_into(&self, depth: u32, polygons: &mut Vec<Polygon>) {
        if depth > 0 {
            for quadrant in self.subdivide() {
                quadrant.solid_into(depth - 1, polygons);
            }
            return;
        }

        for row in 0..3 {
            for col in 0..3 {
                let corners = [(row, col), (row, col + 1), (row + 1, col + 1), (row + 1, col)];
                let mut quad =
                    Polygon::new(corners.iter().map(|&(r, c)| self.at(r, c)).collect());
                quad.z_buffer = self.z_buffer;

                let face = quad.face_normal();
                let normals = corners
                    .iter()
                    .map(|&(r, c)| {
                        let n = self.grid_normal(r, c);
                        if n == Vec3::ZERO {
                            face
                        } else {
                            n
                        }
                    })
                    .collect();
                // four corners, four normals
                if quad.set_normals(normals).is_ok() {
                    polygons.push(quad);
                }
            }
        }
    }

    /// Normal at a control-grid point from central differences of its
    /// neighbours (one-sided at the border). Zero where the grid collapses.
    fn grid_normal(&self, row: usize, col: usize) -> Vec3 {
        let du = self.at(row, (col + 1).min(3)) - self.at(row, col.saturating_sub(1));
        let dv = self.at((row + 1).min(3), col) - self.at(row.saturating_sub(1), col);
        du.to_vec3().cross(dv.to_vec3()).normalize()
    }

    fn wireframe_into(&self, depth: u32, lines: &mut Vec<Line>) {
        if depth > 0 {
            for quadrant in self.subdivide() {
                quadrant.wireframe_into(depth - 1, lines);
            }
            return;
        }

        let segment = |a: Vec4, b: Vec4| Line {
            a,
            b,
            z_buffer: self.z_buffer,
        };
        for i in 0..4 {
            for j in 0..3 {
                lines.push(segment(self.at(i, j), self.at(i, j + 1)));
                lines.push(segment(self.at(j, i), self.at(j + 1, i)));
            }
        }
    }
}

/// Midpoint de Casteljau split of one cubic segment.
fn split(p: [Vec4; 4]) -> [[Vec4; 4]; 2] {
    let q1 = p[0].midpoint(p[1]);
    let middle = p[1].midpoint(p[2]);
    let r2 = p[2].midpoint(p[3]);
    let q2 = q1.midpoint(middle);
    let r1 = middle.midpoint(r2);
    let q3 = q2.midpoint(r1);
    [[p[0], q1, q2, q3], [q3, r1, r2, p[3]]]
}

fn de_casteljau(mut p: [Vec4; 4], t: f32) -> Vec4 {
    for level in 1..4 {
        for i in 0..4 - level {
            p[i] = p[i].lerp(p[i + 1], t);
        }
    }
    p[0]
}
