//! Line and point drawing on an [`Image`].

use super::image::Image;
use crate::colors::Color;
use crate::math::vec4::Vec4;
use crate::primitives::Line;

/// Smallest z for which 1/z is trusted as a depth value.
const MIN_DEPTH: f32 = 1e-6;

/// Relative 1/z boost for depth-tested lines. Larger than the depth buffer's
/// own tolerance so coplanar outlines win over filled faces.
const WIREFRAME_DEPTH_BIAS: f32 = 1e-4;

impl Image {
    /// Draw a point at a homogenized screen-space position.
    pub fn draw_point(&mut self, p: Vec4, color: Color, depth_test: bool) {
        let x = p.x.floor() as i32;
        let y = p.y.floor() as i32;
        if depth_test && p.z > MIN_DEPTH {
            self.set_pixel_with_depth(x, y, 1.0 / p.z, color);
        } else {
            self.set_pixel(x, y, color);
        }
    }

    /// Draw a homogenized screen-space line.
    ///
    /// Depth is tested only when `depth_test` is set and both endpoints lie in
    /// front of the center of projection; 2D scenes (z = 0) draw plainly.
    /// Depth-tested lines are pulled slightly toward the viewer so an outline
    /// stays visible on top of its own filled face.
    ///
    /// The segment is clipped to the image first, so far off-screen endpoints
    /// cost nothing.
    pub fn draw_line(&mut self, line: &Line, color: Color, depth_test: bool) {
        let depth = if depth_test && line.a.z > MIN_DEPTH && line.b.z > MIN_DEPTH {
            Some((
                (1.0 / line.a.z) * (1.0 + WIREFRAME_DEPTH_BIAS),
                (1.0 / line.b.z) * (1.0 + WIREFRAME_DEPTH_BIAS),
            ))
        } else {
            None
        };

        // f64 keeps the clipped ends exact for far off-screen endpoints
        let (x0, y0) = (f64::from(line.a.x), f64::from(line.a.y));
        let (x1, y1) = (f64::from(line.b.x), f64::from(line.b.y));
        let Some((t0, t1)) = self.clip_segment(x0, y0, x1, y1) else {
            return;
        };
        let at = |t: f64| (x0 + t * (x1 - x0), y0 + t * (y1 - y0));
        let (ax, ay) = at(t0);
        let (bx, by) = at(t1);
        // 1/z is linear in screen space
        let depth = depth.map(|(a, b)| {
            let (t0, t1) = (t0 as f32, t1 as f32);
            (a + t0 * (b - a), a + t1 * (b - a))
        });

        self.draw_line_bresenham(
            ax.floor() as i32,
            ay.floor() as i32,
            bx.floor() as i32,
            by.floor() as i32,
            depth,
            color,
        );
    }

    /// Liang-Barsky clip of a segment against `[0, width] x [0, height]`.
    ///
    /// Returns the parameter range `(t0, t1)` that lies inside, or `None`
    /// when the segment misses the image or has a non-finite endpoint.
    fn clip_segment(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Option<(f64, f64)> {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (dx, dy) = (x1 - x0, y1 - y0);
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));

        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [(-dx, x0), (dx, w - x0), (-dy, y0), (dy, h - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Draws a line between two pixels using Bresenham's line algorithm.
    ///
    /// Bresenham's algorithm efficiently determines which pixels to illuminate
    /// by using only integer arithmetic. It tracks an "error" term that
    /// represents the distance between the ideal line and the current pixel:
    /// for each step along the major axis it decides whether to also step
    /// along the minor axis.
    ///
    /// With `depth = Some((1/z0, 1/z1))` the reciprocal depth is interpolated
    /// linearly along the line and every pixel is depth tested.
    pub fn draw_line_bresenham(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        depth: Option<(f32, f32)>,
        color: Color,
    ) {
        let dx = (i64::from(x1) - i64::from(x0)).abs();
        let dy = (i64::from(y1) - i64::from(y0)).abs();
        let steps = dx.max(dy);

        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        // Positive error favors x movement, negative favors y
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;
        let mut step = 0;

        loop {
            match depth {
                Some((inv_z0, inv_z1)) => {
                    let t = if steps == 0 {
                        0.0
                    } else {
                        step as f32 / steps as f32
                    };
                    let inv_z = inv_z0 + t * (inv_z1 - inv_z0);
                    self.set_pixel_with_depth(x, y, inv_z, color);
                }
                None => self.set_pixel(x, y, color),
            }

            if x == x1 && y == y1 {
                break;
            }
            step += 1;

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            // both can fire: a diagonal step
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }
}
