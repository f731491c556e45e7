//! Renders a lit cube sitting on a curved Bézier patch and writes it to PNG.
//!
//! ```text
//! cargo run --example cube [config.toml] [output.png]
//! ```
//!
//! Without a config file the camera looks at the origin from (5, 5, 10) with
//! Gouraud shading.

use std::error::Error;

use scanmod::prelude::*;

fn default_config() -> RenderConfig {
    let mut config = RenderConfig {
        width: 640,
        height: 480,
        background: Color::gray(0.1),
        shading: ShadingMode::Gouraud,
        ..RenderConfig::default()
    };
    config.view = config
        .view
        .looking_at(Vec3::new(5.0, 5.0, 10.0), Vec3::ZERO);
    config.view.window_height = 0.75;
    config
}

fn scene() -> Module {
    let mut cube = Module::new();
    cube.body_color(Color::new(0.8, 0.2, 0.2))
        .surface_color(Color::gray(0.6))
        .surface_coeff(32.0)
        .cube(true);

    let mut patch = BezierSurface::default();
    for (i, p) in patch.control_points.iter_mut().enumerate() {
        let (col, row) = ((i % 4) as f32 - 1.5, (i / 4) as f32 - 1.5);
        p.y = -0.4 * (col * col + row * row) / 4.5;
    }
    let mut ground = Module::new();
    ground
        .body_color(Color::new(0.3, 0.6, 0.3))
        .surface_color(Color::gray(0.1))
        .bezier_surface(&patch, 3, true);

    let mut scene = Module::new();
    scene
        .translate(-0.5, -0.05, -0.5)
        .scale(8.0, 4.0, 8.0)
        .translate(0.0, -1.0, 0.0)
        .module(ground.into_shared())
        .identity()
        .rotate_y(0.4)
        .module(cube.into_shared());
    scene
}

fn lighting() -> Result<Lighting, scanmod::RenderError> {
    let mut lighting = Lighting::new();
    lighting
        .add(Light::Ambient {
            color: Color::gray(0.15),
        })?
        .add(Light::Point {
            color: Color::gray(0.7),
            position: Vec3::new(4.0, 6.0, 5.0),
        })?
        .add(Light::Spot {
            color: Color::new(0.4, 0.4, 0.6),
            position: Vec3::new(-4.0, 5.0, 2.0),
            direction: Vec3::new(4.0, -5.0, -2.0),
            cutoff: 0.9,
            sharpness: 8.0,
        })?;
    Ok(lighting)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RenderConfig::load(path)?,
        None => default_config(),
    };
    let output = args.next().unwrap_or_else(|| "cube.png".to_string());

    let lighting = lighting()?;
    let mut image = config.image();
    render(
        &scene(),
        &config.view_matrix(),
        &Mat4::identity(),
        &mut config.draw_state(),
        Some(&lighting),
        &mut image,
    );

    image.save(&output)?;
    log::info!("wrote {}x{} image to {}", image.width(), image.height(), output);
    Ok(())
}
