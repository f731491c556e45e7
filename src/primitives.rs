//! Geometric primitives stored in modules and handed to the rasterizer.

use crate::colors::Color;
use crate::error::RenderError;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

/// A line segment between two homogeneous points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: Vec4,
    pub b: Vec4,
    /// Whether drawing this line reads and writes the depth buffer.
    pub z_buffer: bool,
}

impl Line {
    pub fn new(a: Vec4, b: Vec4) -> Self {
        Self {
            a,
            b,
            z_buffer: true,
        }
    }

    pub fn transform(&self, m: &Mat4) -> Self {
        Self {
            a: *m * self.a,
            b: *m * self.b,
            z_buffer: self.z_buffer,
        }
    }

    pub fn homogenize(&mut self) {
        self.a = self.a.homogenize();
        self.b = self.b.homogenize();
    }
}

/// An open chain of connected line segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<Vec4>,
    pub z_buffer: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<Vec4>) -> Self {
        Self {
            vertices,
            z_buffer: true,
        }
    }

    pub fn transform(&self, m: &Mat4) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| *m * v).collect(),
            z_buffer: self.z_buffer,
        }
    }

    pub fn homogenize(&mut self) {
        for v in &mut self.vertices {
            *v = v.homogenize();
        }
    }

    /// Consecutive segments; a polyline with fewer than two vertices has none.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.vertices.windows(2).map(move |pair| Line {
            a: pair[0],
            b: pair[1],
            z_buffer: self.z_buffer,
        })
    }
}

/// A closed, planar polygon with optional per-vertex attributes.
///
/// Color and normal lists, when present, always have one entry per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec4>,
    colors: Option<Vec<Color>>,
    normals: Option<Vec<Vec3>>,
    /// One-sided polygons are not lit from behind.
    pub one_sided: bool,
    pub z_buffer: bool,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec4>) -> Self {
        Self {
            vertices,
            colors: None,
            normals: None,
            one_sided: true,
            z_buffer: true,
        }
    }

    /// Build from points given as `[x, y, z]`.
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        Self::new(
            points
                .iter()
                .map(|&[x, y, z]| Vec4::point(x, y, z))
                .collect(),
        )
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self, RenderError> {
        self.set_colors(colors)?;
        Ok(self)
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self, RenderError> {
        self.set_normals(normals)?;
        Ok(self)
    }

    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<(), RenderError> {
        self.check_len(colors.len())?;
        self.colors = Some(colors);
        Ok(())
    }

    pub fn set_normals(&mut self, normals: Vec<Vec3>) -> Result<(), RenderError> {
        self.check_len(normals.len())?;
        self.normals = Some(normals);
        Ok(())
    }

    fn check_len(&self, actual: usize) -> Result<(), RenderError> {
        if actual != self.vertices.len() {
            return Err(RenderError::AttributeMismatch {
                expected: self.vertices.len(),
                actual,
            });
        }
        Ok(())
    }

    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Transform vertices by `m` and normals by its normal matrix.
    pub fn transform(&self, m: &Mat4) -> Self {
        let normal_matrix = m.normal_matrix();
        Self {
            vertices: self.vertices.iter().map(|&v| *m * v).collect(),
            colors: self.colors.clone(),
            normals: self.normals.as_ref().map(|normals| {
                normals
                    .iter()
                    .map(|&n| normal_matrix.transform_vector(n).normalize())
                    .collect()
            }),
            one_sided: self.one_sided,
            z_buffer: self.z_buffer,
        }
    }

    /// Map vertices through a viewing matrix and homogenize them.
    ///
    /// Normals and colors are carried over untouched: they stay in the space
    /// they were in, which for the executor is world space.
    pub fn project(&self, vtm: &Mat4) -> Self {
        let mut projected = Self {
            vertices: self.vertices.iter().map(|&v| *vtm * v).collect(),
            ..self.clone()
        };
        projected.homogenize();
        projected
    }

    pub fn homogenize(&mut self) {
        for v in &mut self.vertices {
            *v = v.homogenize();
        }
    }

    /// Average of the vertices.
    pub fn centroid(&self) -> Vec4 {
        if self.vertices.is_empty() {
            return Vec4::ZERO;
        }
        let sum = self.vertices.iter().fold(Vec4::ZERO, |acc, &v| acc + v);
        sum / self.vertices.len() as f32
    }

    /// Normal of the polygon's plane by Newell's method, counter-clockwise
    /// winding facing the viewer. Zero for degenerate polygons.
    pub fn face_normal(&self) -> Vec3 {
        let mut n = Vec3::ZERO;
        for (i, a) in self.vertices.iter().enumerate() {
            let b = self.vertices[(i + 1) % self.vertices.len()];
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        n.normalize()
    }

    /// Mean of the vertex normals, or the face normal when there are none.
    pub fn average_normal(&self) -> Vec3 {
        match &self.normals {
            Some(normals) if !normals.is_empty() => normals
                .iter()
                .fold(Vec3::ZERO, |acc, &n| acc + n)
                .normalize(),
            _ => self.face_normal(),
        }
    }

    /// Closing ring of edges, used for outline drawing.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Line {
            a: self.vertices[i],
            b: self.vertices[(i + 1) % n],
            z_buffer: self.z_buffer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Polygon {
        Polygon::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
    }

    #[test]
    fn test_attribute_length_is_checked() {
        let mut polygon = unit_square();
        let err = polygon.set_colors(vec![Color::RED; 3]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::AttributeMismatch {
                expected: 4,
                actual: 3
            }
        ));
        assert!(polygon.colors().is_none());

        polygon.set_normals(vec![Vec3::Z; 4]).unwrap();
        assert_eq!(polygon.normals().unwrap().len(), 4);
    }

    #[test]
    fn test_face_normal_ccw() {
        assert_eq!(unit_square().face_normal(), Vec3::Z);
    }

    #[test]
    fn test_centroid() {
        let c = unit_square().centroid();
        assert_relative_eq!(c.x, 0.5);
        assert_relative_eq!(c.y, 0.5);
        assert_relative_eq!(c.w, 1.0);
    }

    #[test]
    fn test_transform_moves_vertices_and_turns_normals() {
        let polygon = unit_square().with_normals(vec![Vec3::Z; 4]).unwrap();
        let mut m = Mat4::identity();
        m.rotate_x(std::f32::consts::FRAC_PI_2).translate(0.0, 0.0, 5.0);

        let moved = polygon.transform(&m);
        assert_relative_eq!(moved.vertices()[2].y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(moved.vertices()[2].z, 6.0, epsilon = 1e-6);

        let n = moved.normals().unwrap()[0];
        assert_relative_eq!(n.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(n.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_edges_close_the_ring() {
        let edges: Vec<Line> = unit_square().edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].b, Vec4::point(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_polyline_segments() {
        let line = Polyline::new(vec![Vec4::point(0.0, 0.0, 0.0); 3]);
        assert_eq!(line.segments().count(), 2);
        assert_eq!(Polyline::new(vec![]).segments().count(), 0);
    }
}
