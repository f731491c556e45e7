//! Module executor: walks a scene graph and draws it into an image.
//!
//! Each module keeps a running local transform. Matrix elements pre-multiply
//! onto it and [`Element::Identity`] resets it. Geometry goes through
//!
//! ```text
//! object --LTM--> module --GTM--> world --VTM--> screen --homogenize--> raster
//! ```
//!
//! where the GTM is whatever the enclosing modules had accumulated when this
//! module was placed. Lighting happens in world space, before the view
//! transform.

use super::{Element, Module};
use crate::colors::Color;
use crate::draw_state::{DrawState, ShadingMode};
use crate::light::{Lighting, SurfacePoint};
use crate::math::mat4::Mat4;
use crate::primitives::Polygon;
use crate::render::{
    ConstantShader, DepthCueShader, GouraudShader, Image, Rasterizer, RasterizerDispatcher,
};

/// Everything that stays fixed for one render pass.
struct Pass<'a> {
    view: &'a Mat4,
    lighting: Option<&'a Lighting>,
    rasterizer: RasterizerDispatcher,
}

/// Draw `module` into `image`.
///
/// `view` maps world space to screen space (see [`crate::view`]), `global`
/// places the module in the world. Color and surface elements update `state`
/// in place; sub-modules work on their own copy, so their changes never
/// reach the caller or later siblings. Flat and Gouraud shading need a
/// `lighting` environment and fall back to constant shading without one.
pub fn render(
    module: &Module,
    view: &Mat4,
    global: &Mat4,
    state: &mut DrawState,
    lighting: Option<&Lighting>,
    image: &mut Image,
) {
    let pass = Pass {
        view,
        lighting,
        rasterizer: RasterizerDispatcher::new(state.rasterizer),
    };
    pass.draw_module(module, global, state, image, 0);
}

impl Pass<'_> {
    fn draw_module(
        &self,
        module: &Module,
        global: &Mat4,
        state: &mut DrawState,
        image: &mut Image,
        level: usize,
    ) {
        log::debug!(
            "drawing module with {} elements at level {}",
            module.len(),
            level
        );
        let mut local = Mat4::identity();

        for element in module.elements() {
            log::trace!("{:?}", element);
            match element {
                Element::Matrix(m) => {
                    local.pre_multiply(*m);
                }
                Element::Identity => local = Mat4::identity(),
                Element::Color(c) => state.color = *c,
                Element::BodyColor(c) => state.body = *c,
                Element::SurfaceColor(c) => state.surface = *c,
                Element::SurfaceCoeff(s) => state.shininess = *s,
                Element::Point(p) => {
                    let vtm = *self.view * *global * local;
                    image.draw_point((vtm * *p).homogenize(), state.color, state.z_buffer);
                }
                Element::Line(line) => {
                    let vtm = *self.view * *global * local;
                    let mut line = line.transform(&vtm);
                    line.homogenize();
                    image.draw_line(&line, state.color, line.z_buffer && state.z_buffer);
                }
                Element::Polyline(polyline) => {
                    let vtm = *self.view * *global * local;
                    let mut polyline = polyline.transform(&vtm);
                    polyline.homogenize();
                    for segment in polyline.segments() {
                        image.draw_line(
                            &segment,
                            state.color,
                            segment.z_buffer && state.z_buffer,
                        );
                    }
                }
                Element::Polygon(polygon) => {
                    let world = polygon.transform(&(*global * local));
                    self.draw_polygon(&world, state, image);
                }
                Element::Module(child) => {
                    let mut child_state = *state;
                    let child_global = *global * local;
                    self.draw_module(child, &child_global, &mut child_state, image, level + 1);
                }
            }
        }
    }

    /// Shade and rasterize a polygon given in world space.
    fn draw_polygon(&self, world: &Polygon, state: &DrawState, image: &mut Image) {
        let mut screen = world.project(self.view);
        screen.z_buffer = world.z_buffer && state.z_buffer;

        let shading = match (state.shading, self.lighting) {
            (ShadingMode::Flat | ShadingMode::Gouraud, None) => ShadingMode::Constant,
            (shading, _) => shading,
        };

        match (shading, self.lighting) {
            (ShadingMode::Frame, _) => {
                for edge in screen.edges() {
                    image.draw_line(&edge, state.color, edge.z_buffer);
                }
            }
            (ShadingMode::Depth, _) => {
                let shader = DepthCueShader::new(state.color);
                self.rasterizer.fill_polygon(&screen, image, &shader);
            }
            (ShadingMode::Flat, Some(lighting)) => {
                let position = world.centroid().to_vec3();
                let color = lighting.shade(&SurfacePoint {
                    normal: world.average_normal(),
                    view: state.viewer - position,
                    position,
                    body: state.body,
                    surface: state.surface,
                    shininess: state.shininess,
                    one_sided: world.one_sided,
                });
                self.rasterizer
                    .fill_polygon(&screen, image, &ConstantShader::new(color));
            }
            (ShadingMode::Gouraud, Some(lighting)) => {
                let colors = vertex_colors(world, state, lighting);
                if let Err(err) = screen.set_colors(colors) {
                    log::warn!("skipping polygon: {}", err);
                    return;
                }
                self.rasterizer.fill_polygon(&screen, image, &GouraudShader);
            }
            _ => {
                let shader = ConstantShader::new(state.color);
                self.rasterizer.fill_polygon(&screen, image, &shader);
            }
        }
    }
}

/// Light every vertex of a world-space polygon. Vertices without a normal use
/// the face normal.
fn vertex_colors(world: &Polygon, state: &DrawState, lighting: &Lighting) -> Vec<Color> {
    let face = world.face_normal();
    world
        .vertices()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let position = v.to_vec3();
            let normal = world.normals().map_or(face, |normals| normals[i]);
            lighting.shade(&SurfacePoint {
                normal,
                view: state.viewer - position,
                position,
                body: state.body,
                surface: state.surface,
                shininess: state.shininess,
                one_sided: world.one_sided,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::Light;
    use crate::math::vec3::Vec3;
    use crate::math::vec4::Vec4;
    use crate::primitives::Line;
    use crate::render::RasterizerType;
    use crate::view::View3D;
    use approx::assert_relative_eq;

    fn square(x0: f32, y0: f32, size: f32) -> Polygon {
        Polygon::from_points(&[
            [x0, y0, 0.0],
            [x0 + size, y0, 0.0],
            [x0 + size, y0 + size, 0.0],
            [x0, y0 + size, 0.0],
        ])
    }

    fn square_at_depth(x0: f32, y0: f32, size: f32, z: f32) -> Polygon {
        Polygon::from_points(&[
            [x0, y0, z],
            [x0 + size, y0, z],
            [x0 + size, y0 + size, z],
            [x0, y0 + size, z],
        ])
    }

    /// Render in screen coordinates: identity view and global transform.
    fn draw(
        module: &Module,
        state: &mut DrawState,
        lighting: Option<&Lighting>,
        image: &mut Image,
    ) {
        let identity = Mat4::identity();
        render(module, &identity, &identity, state, lighting, image);
    }

    #[test]
    fn test_submodule_state_does_not_leak() {
        let mut child = Module::new();
        child.color(Color::GREEN).polygon(square(0.0, 0.0, 4.0));

        let mut parent = Module::new();
        parent
            .color(Color::RED)
            .module(child.into_shared())
            .polygon(square(5.0, 0.0, 4.0));

        let mut image = Image::new(10, 4);
        let mut state = DrawState::new();
        draw(&parent, &mut state, None, &mut image);

        assert_eq!(image.pixel(2, 2), Some(Color::GREEN));
        assert_eq!(image.pixel(7, 2), Some(Color::RED));
        // the caller's state follows the top-level module only
        assert_eq!(state.color, Color::RED);
    }

    #[test]
    fn test_identity_resets_local_transform() {
        let mut module = Module::new();
        module
            .translate(10.0, 0.0, 0.0)
            .point(Vec4::point(1.5, 1.5, 0.0))
            .identity()
            .point(Vec4::point(1.5, 2.5, 0.0));

        let mut image = Image::new(20, 5);
        draw(&module, &mut DrawState::new(), None, &mut image);
        assert_eq!(image.pixel(11, 1), Some(Color::WHITE));
        assert_eq!(image.pixel(1, 2), Some(Color::WHITE));
        assert_eq!(image.pixel(11, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_translate_then_scale_applies_scale_last() {
        let mut module = Module::new();
        module
            .translate(1.0, 0.0, 0.0)
            .scale(2.0, 2.0, 1.0)
            .point(Vec4::point(1.25, 0.25, 0.0));

        let mut image = Image::new(8, 2);
        draw(&module, &mut DrawState::new(), None, &mut image);
        // (1.25 + 1) * 2 = 4.5
        assert_eq!(image.pixel(4, 0), Some(Color::WHITE));
        assert_eq!(image.pixel(3, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_shared_submodule_is_placed_twice() {
        let mut child = Module::new();
        child.polygon(square(0.0, 0.0, 2.0));
        let child = child.into_shared();

        let mut parent = Module::new();
        parent
            .translate(5.0, 0.0, 0.0)
            .module(child.clone())
            .translate(5.0, 0.0, 0.0)
            .module(child);

        let mut image = Image::new(14, 2);
        draw(&parent, &mut DrawState::new(), None, &mut image);
        assert_eq!(image.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(image.pixel(6, 1), Some(Color::WHITE));
        assert_eq!(image.pixel(11, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_global_transform_places_module() {
        let mut module = Module::new();
        module.point(Vec4::point(0.5, 0.5, 0.0));

        let mut image = Image::new(5, 1);
        let global = Mat4::translation(3.0, 0.0, 0.0);
        render(
            &module,
            &Mat4::identity(),
            &global,
            &mut DrawState::new(),
            None,
            &mut image,
        );
        assert_eq!(image.pixel(3, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_frame_shading_draws_outline() {
        let mut module = Module::new();
        module.polygon(square(2.0, 2.0, 6.0));

        let mut image = Image::new(10, 10);
        let mut state = DrawState::new();
        state.set_shading(ShadingMode::Frame);
        draw(&module, &mut state, None, &mut image);

        assert_eq!(image.pixel(5, 2), Some(Color::WHITE));
        assert_eq!(image.pixel(8, 5), Some(Color::WHITE));
        assert_eq!(image.pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_outline_over_its_own_face() {
        let face = square_at_depth(2.0, 2.0, 6.0, 0.5);
        let mut module = Module::new();
        module.color(Color::RED).polygon(face);

        let mut image = Image::new(10, 10);
        draw(&module, &mut DrawState::new(), None, &mut image);
        let mut state = DrawState::new();
        state.set_shading(ShadingMode::Frame);
        draw(&module, &mut state, None, &mut image);

        // the outline edges land on filled pixels at the same depth
        assert_eq!(image.pixel(5, 2), Some(Color::WHITE));
        assert_eq!(image.pixel(2, 5), Some(Color::WHITE));
        assert_eq!(image.pixel(5, 5), Some(Color::RED));
    }

    #[test]
    fn test_line_far_off_screen() {
        let mut module = Module::new();
        module.line(Line::new(
            Vec4::point(5.0, 5.0, 0.0),
            Vec4::point(3.0e9, 5.0, 0.0),
        ));

        let mut image = Image::new(10, 10);
        draw(&module, &mut DrawState::new(), None, &mut image);
        assert_eq!(image.pixel(5, 5), Some(Color::WHITE));
        assert_eq!(image.pixel(9, 5), Some(Color::WHITE));
        assert_eq!(image.pixel(4, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_depth_cue_ignores_z_buffer_switch() {
        let quad = square_at_depth(0.0, 0.0, 4.0, 0.75);
        let mut module = Module::new();
        module.polygon(quad);

        for z_buffer in [true, false] {
            let mut image = Image::new(4, 4);
            let mut state = DrawState::new();
            state.set_shading(ShadingMode::Depth).set_z_buffer(z_buffer);
            draw(&module, &mut state, None, &mut image);
            assert_relative_eq!(image.pixel(2, 2).unwrap().r, 0.25, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_flat_shading_lights_the_face() {
        let mut module = Module::new();
        module
            .body_color(Color::RED)
            .surface_color(Color::BLACK)
            .polygon(square(0.0, 0.0, 4.0));

        let mut lighting = Lighting::new();
        lighting
            .add(Light::Directional {
                color: Color::WHITE,
                direction: Vec3::Z,
            })
            .unwrap();

        let mut image = Image::new(4, 4);
        let mut state = DrawState::new();
        state.set_shading(ShadingMode::Flat);
        draw(&module, &mut state, Some(&lighting), &mut image);
        assert_eq!(image.pixel(2, 2), Some(Color::RED));
    }

    #[test]
    fn test_lit_modes_fall_back_without_lighting() {
        let mut module = Module::new();
        module.color(Color::BLUE).polygon(square(0.0, 0.0, 4.0));

        let mut image = Image::new(4, 4);
        let mut state = DrawState::new();
        state.set_shading(ShadingMode::Gouraud);
        draw(&module, &mut state, None, &mut image);
        assert_eq!(image.pixel(1, 1), Some(Color::BLUE));
    }

    #[test]
    fn test_gouraud_interpolates_vertex_lighting() {
        let quad = square(0.0, 0.0, 10.0)
            .with_normals(vec![Vec3::Z, Vec3::X, Vec3::X, Vec3::Z])
            .unwrap();
        let mut module = Module::new();
        module.surface_color(Color::BLACK).polygon(quad);

        let mut lighting = Lighting::new();
        lighting
            .add(Light::Directional {
                color: Color::WHITE,
                direction: Vec3::Z,
            })
            .unwrap();

        let mut image = Image::new(10, 10);
        let mut state = DrawState::new();
        state.set_shading(ShadingMode::Gouraud);
        draw(&module, &mut state, Some(&lighting), &mut image);

        assert_relative_eq!(image.pixel(0, 5).unwrap().r, 0.95, epsilon = 1e-4);
        assert_relative_eq!(image.pixel(9, 5).unwrap().r, 0.05, epsilon = 1e-4);
    }

    #[test]
    fn test_supersampled_rasterizer_is_selectable() {
        let mut module = Module::new();
        module.polygon(Polygon::from_points(&[
            [2.5, 0.0, 0.0],
            [8.0, 0.0, 0.0],
            [8.0, 4.0, 0.0],
            [2.5, 4.0, 0.0],
        ]));

        let mut image = Image::new(10, 4);
        let mut state = DrawState::new();
        state.set_rasterizer(RasterizerType::Supersampled);
        draw(&module, &mut state, None, &mut image);
        assert_relative_eq!(image.coverage(2, 2).unwrap(), 0.5);
    }

    const FACE_COLORS: [Color; 6] = [
        Color::RED,
        Color::GREEN,
        Color::BLUE,
        Color::new(1.0, 1.0, 0.0),
        Color::new(0.0, 1.0, 1.0),
        Color::new(1.0, 0.0, 1.0),
    ];

    #[test]
    fn test_cube_shows_three_faces() {
        let mut cube = Module::new();
        cube.cube(true);
        // faces in order -z, +z, +y, -y, -x, +x, each with its own color
        let mut scene = Module::new();
        for (face, color) in cube.elements().iter().zip(FACE_COLORS) {
            scene.color(color).push(face.clone());
        }

        let view = View3D {
            screen_width: 200,
            screen_height: 200,
            ..View3D::default()
        }
        .looking_at(Vec3::new(5.0, 5.0, 10.0), Vec3::ZERO);
        let vtm = view.matrix();

        let mut image = Image::new(200, 200);
        render(
            &scene,
            &vtm,
            &Mat4::identity(),
            &mut DrawState::new(),
            None,
            &mut image,
        );

        let count = |color: Color| image.pixels().iter().filter(|&&p| p == color).count();
        // +z, +y and +x face the camera
        let mut visible = 0;
        for i in [1, 2, 5] {
            let pixels = count(FACE_COLORS[i]);
            assert!(pixels > 300, "face {} covers {} pixels", i, pixels);
            visible += pixels;
        }
        // hidden faces lose everywhere except for near-ties on shared edges
        let hidden: usize = [0, 3, 4].iter().map(|&i| count(FACE_COLORS[i])).sum();
        assert!(hidden * 100 < visible, "{} hidden-face pixels", hidden);

        // silhouette bounds match the projected corners
        let (mut x_min, mut x_max) = (f32::MAX, f32::MIN);
        let (mut y_min, mut y_max) = (f32::MAX, f32::MIN);
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    let p = (vtm * Vec4::point(x, y, z)).homogenize();
                    x_min = x_min.min(p.x);
                    x_max = x_max.max(p.x);
                    y_min = y_min.min(p.y);
                    y_max = y_max.max(p.y);
                }
            }
        }
        let (mut cols, mut rows) = (Vec::new(), Vec::new());
        for y in 0..200 {
            for x in 0..200 {
                if image.pixel(x, y) != Some(Color::BLACK) {
                    cols.push(x as f32);
                    rows.push(y as f32);
                }
            }
        }
        let lo = |v: &[f32]| v.iter().copied().fold(f32::MAX, f32::min);
        let hi = |v: &[f32]| v.iter().copied().fold(f32::MIN, f32::max);
        assert!((lo(&cols) - x_min).abs() <= 2.0);
        assert!((hi(&cols) + 1.0 - x_max).abs() <= 2.0);
        assert!((lo(&rows) - y_min).abs() <= 2.0);
        assert!((hi(&rows) + 1.0 - y_max).abs() <= 2.0);
    }
}
