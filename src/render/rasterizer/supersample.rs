//! Anti-aliased polygon fill by coverage super-sampling.
//!
//! Every pixel in the polygon's bounding box is probed on a regular
//! [`SAMPLES`]x[`SAMPLES`] grid with an even-odd inside test. The fraction of
//! samples inside becomes the pixel's coverage, which blends the shaded color
//! over what is already there and is stored in the image's alpha plane.
//!
//! The shader runs once per polygon with the mean vertex depth and color, so
//! this path suits constant and depth-cued fills; it neither reads nor
//! writes the depth buffer.

use super::{Fragment, FragmentShader, Rasterizer};
use crate::colors::Color;
use crate::math::vec4::Vec4;
use crate::primitives::Polygon;
use crate::render::image::Image;

/// Samples per pixel along each axis.
pub const SAMPLES: usize = 4;

pub struct SupersampleRasterizer;

impl Default for SupersampleRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SupersampleRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Even-odd test: does a horizontal ray from (x, y) cross the outline an
    /// odd number of times?
    fn inside(vertices: &[Vec4], x: f32, y: f32) -> bool {
        let mut inside = false;
        let mut j = vertices.len() - 1;
        for (i, a) in vertices.iter().enumerate() {
            let b = vertices[j];
            if (a.y > y) != (b.y > y) {
                let x_cross = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
                if x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Fraction of the pixel at (col, row) covered by the polygon.
    fn coverage(vertices: &[Vec4], col: i32, row: i32) -> f32 {
        let step = 1.0 / SAMPLES as f32;
        let mut hits = 0;
        for sy in 0..SAMPLES {
            for sx in 0..SAMPLES {
                let x = col as f32 + (sx as f32 + 0.5) * step;
                let y = row as f32 + (sy as f32 + 0.5) * step;
                if Self::inside(vertices, x, y) {
                    hits += 1;
                }
            }
        }
        hits as f32 / (SAMPLES * SAMPLES) as f32
    }
}

impl Rasterizer for SupersampleRasterizer {
    fn fill_polygon<S: FragmentShader>(&self, polygon: &Polygon, image: &mut Image, shader: &S) {
        if polygon.len() < 3 {
            log::debug!(
                "skipping degenerate polygon with {} vertices",
                polygon.len()
            );
            return;
        }
        let vertices = polygon.vertices();

        let (mut x_min, mut x_max) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f32::INFINITY, f32::NEG_INFINITY);
        for v in vertices {
            x_min = x_min.min(v.x);
            x_max = x_max.max(v.x);
            y_min = y_min.min(v.y);
            y_max = y_max.max(v.y);
        }
        let col_start = (x_min.floor() as i32).max(0);
        let col_end = (x_max.ceil() as i32).min(image.width() as i32);
        let row_start = (y_min.floor() as i32).max(0);
        let row_end = (y_max.ceil() as i32).min(image.height() as i32);

        let count = polygon.len() as f32;
        let z = vertices.iter().map(|v| v.z).sum::<f32>() / count;
        let color = match polygon.colors() {
            Some(colors) => {
                colors.iter().fold(Color::BLACK, |acc, &c| acc + c) * (1.0 / count)
            }
            None => Color::WHITE,
        };
        let shaded = shader.shade(&Fragment {
            z: z.max(0.0),
            color,
        });

        for row in row_start..row_end {
            for col in col_start..col_end {
                let coverage = Self::coverage(vertices, col, row);
                if coverage > 0.0 {
                    image.blend_pixel(col, row, shaded, coverage);
                }
            }
        }
    }
}
