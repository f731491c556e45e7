//! Ready-made geometry appended to modules.

use std::f32::consts::TAU;

use super::Module;
use crate::bezier::{BezierCurve, BezierSurface};
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::primitives::{Line, Polygon};

/// Cube faces, wound counter-clockwise seen from outside, with their normals.
const CUBE_FACES: [([[f32; 3]; 4], [f32; 3]); 6] = [
    (
        [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
        [0.0, 0.0, -1.0],
    ),
    (
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
        [0.0, 0.0, 1.0],
    ),
    (
        [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
        [0.0, 1.0, 0.0],
    ),
    (
        [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
        [0.0, -1.0, 0.0],
    ),
    (
        [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
        [-1.0, 0.0, 0.0],
    ),
    (
        [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
        [1.0, 0.0, 0.0],
    ),
];

/// The 12 cube edges as pairs of corner indices into `cube_corner`.
#[rustfmt::skip]
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 3), (3, 2), (2, 0),
    (4, 5), (5, 7), (7, 6), (6, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Corner `i` of the cube: bit 0 selects x, bit 1 y, bit 2 z.
fn cube_corner(i: usize) -> Vec4 {
    let coord = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
    Vec4::point(coord(1), coord(2), coord(4))
}

impl Module {
    /// Append the cube `[-1, 1]^3`: six quads with face normals when
    /// `solid`, otherwise its twelve edges.
    pub fn cube(&mut self, solid: bool) -> &mut Self {
        if solid {
            for (corners, [nx, ny, nz]) in CUBE_FACES {
                let normal = Vec3::new(nx, ny, nz);
                let face = Polygon::from_points(&corners);
                // four corners, four normals
                if let Ok(face) = face.with_normals(vec![normal; 4]) {
                    self.polygon(face);
                }
            }
        } else {
            for (a, b) in CUBE_EDGES {
                self.line(Line::new(cube_corner(a), cube_corner(b)));
            }
        }
        self
    }

    /// Append a unit-radius cylinder around the y axis, from `y = 0` to
    /// `y = 1`.
    ///
    /// Solid cylinders get a top and a bottom triangle fan plus one side
    /// quad per side, with outward normals; wireframes get both rims and
    /// one vertical line per side. Fewer than 3 sides draws nothing.
    pub fn cylinder(&mut self, sides: u32, solid: bool) -> &mut Self {
        if sides < 3 {
            log::debug!("cylinder needs at least 3 sides, got {}", sides);
            return self;
        }

        let rim = |i: u32| {
            let angle = (i % sides) as f32 * TAU / sides as f32;
            (angle.cos(), angle.sin())
        };
        for i in 0..sides {
            let (x1, z1) = rim(i);
            let (x2, z2) = rim(i + 1);

            if solid {
                let top = Polygon::from_points(&[[0.0, 1.0, 0.0], [x2, 1.0, z2], [x1, 1.0, z1]]);
                let bottom =
                    Polygon::from_points(&[[0.0, 0.0, 0.0], [x1, 0.0, z1], [x2, 0.0, z2]]);
                let side = Polygon::from_points(&[
                    [x1, 0.0, z1],
                    [x1, 1.0, z1],
                    [x2, 1.0, z2],
                    [x2, 0.0, z2],
                ]);
                let n1 = Vec3::new(x1, 0.0, z1);
                let n2 = Vec3::new(x2, 0.0, z2);

                let faces = [
                    top.with_normals(vec![Vec3::Y; 3]),
                    bottom.with_normals(vec![-Vec3::Y; 3]),
                    side.with_normals(vec![n1, n1, n2, n2]),
                ];
                for face in faces.into_iter().flatten() {
                    self.polygon(face);
                }
            } else {
                self.line(Line::new(
                    Vec4::point(x1, 1.0, z1),
                    Vec4::point(x2, 1.0, z2),
                ));
                self.line(Line::new(
                    Vec4::point(x1, 0.0, z1),
                    Vec4::point(x2, 0.0, z2),
                ));
                self.line(Line::new(
                    Vec4::point(x1, 0.0, z1),
                    Vec4::point(x1, 1.0, z1),
                ));
            }
        }
        self
    }

    /// Append a Bézier curve flattened into `3 * 2^depth` line segments.
    pub fn bezier_curve(&mut self, curve: &BezierCurve, depth: u32) -> &mut Self {
        for line in curve.flatten(depth) {
            self.line(line);
        }
        self
    }

    /// Append a Bézier surface, as shaded quads when `solid` and as a
    /// line mesh otherwise.
    pub fn bezier_surface(
        &mut self,
        surface: &BezierSurface,
        depth: u32,
        solid: bool,
    ) -> &mut Self {
        if solid {
            for quad in surface.flatten_solid(depth) {
                self.polygon(quad);
            }
        } else {
            for line in surface.flatten_wireframe(depth) {
                self.line(line);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Element;
    use approx::assert_relative_eq;

    fn polygons(module: &Module) -> Vec<&Polygon> {
        module
            .elements()
            .iter()
            .filter_map(|e| match e {
                Element::Polygon(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_solid_cube_faces_point_outward() {
        let mut module = Module::new();
        module.cube(true);
        let faces = polygons(&module);
        assert_eq!(faces.len(), 6);

        for face in faces {
            let normals = face.normals().unwrap();
            assert_eq!(normals.len(), 4);
            // winding agrees with the stored normal
            let n = face.face_normal();
            assert_relative_eq!(n.dot(normals[0]), 1.0, epsilon = 1e-6);
            // centroid sits on the outward side
            let c = face.centroid().to_vec3();
            assert_relative_eq!(c.dot(normals[0]), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_wire_cube_edges_span_the_cube() {
        let mut module = Module::new();
        module.cube(false);
        assert_eq!(module.len(), 12);
        for element in module.elements() {
            let Element::Line(line) = element else {
                panic!("expected only lines");
            };
            assert_relative_eq!((line.b - line.a).to_vec3().magnitude(), 2.0);
        }
    }

    #[test]
    fn test_cylinder_counts() {
        let mut solid = Module::new();
        solid.cylinder(8, true);
        assert_eq!(polygons(&solid).len(), 24);

        let mut wire = Module::new();
        wire.cylinder(8, false);
        assert_eq!(wire.len(), 24);
    }

    #[test]
    fn test_cylinder_too_few_sides_is_noop() {
        let mut module = Module::new();
        module.cylinder(2, true);
        assert!(module.is_empty());
    }

    #[test]
    fn test_cylinder_rim_closes() {
        let mut module = Module::new();
        module.cylinder(6, false);
        let Element::Line(first) = &module.elements()[0] else {
            panic!("expected a line");
        };
        let Element::Line(last_top) = &module.elements()[15] else {
            panic!("expected a line");
        };
        assert_relative_eq!(last_top.b.x, first.a.x, epsilon = 1e-5);
        assert_relative_eq!(last_top.b.z, first.a.z, epsilon = 1e-5);
    }

    #[test]
    fn test_bezier_shapes() {
        let mut module = Module::new();
        module.bezier_curve(&BezierCurve::default(), 2);
        assert_eq!(module.len(), 12);

        module.clear();
        module.bezier_surface(&BezierSurface::default(), 1, true);
        assert_eq!(polygons(&module).len(), 36);

        module.clear();
        module.bezier_surface(&BezierSurface::default(), 0, false);
        assert_eq!(module.len(), 24);
    }
}
