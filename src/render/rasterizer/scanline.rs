//! Scanline polygon rasterization with an active edge list.
//!
//! This module fills arbitrary (convex or concave) polygons one horizontal
//! scanline at a time, interpolating reciprocal depth and vertex colors along
//! the way.
//!
//! # Algorithm Overview
//!
//! 1. **Build edges**: every polygon edge that crosses at least one pixel
//!    center becomes an edge record holding its current x intersection, 1/z and
//!    color, plus how much each changes per scanline
//! 2. **Sort** the edges by their first scanline
//! 3. **Scan** downward: edges join the active list when the scanline reaches
//!    them and leave it after their last scanline
//! 4. **Fill** between pairs of x-sorted active edges (even-odd rule)
//!
//! # Sampling Rule
//!
//! Pixel `(col, row)` covers `[col, col + 1) x [row, row + 1)` and is sampled
//! at its center. An edge from `y_top` to `y_bottom` is active on every row
//! whose center `row + 0.5` lies in `[y_top, y_bottom)`; a span from `x_left`
//! to `x_right` owns the columns whose centers lie in `[x_left, x_right)`.
//! Polygons sharing an edge therefore never both draw a pixel, and an
//! axis-aligned square with integer corners fills exactly its area.
//!
//! ```text
//!   y_top = 29.8 ─────────────      first row: ceil(29.8 - 0.5) = 30
//!   row 30 center (30.5)  ●         active
//!   ...
//!   row 49 center (49.5)  ●         last row: ceil(50.0 - 0.5) - 1 = 49
//!   y_bottom = 50.0 ──────────
//! ```
//!
//! # Clipping
//!
//! Edges wholly above or below the image are dropped, edges starting above
//! row 0 are advanced to row 0 along their own slope, and spans are clamped
//! to the image columns. Nothing else is clipped.
//!
//! # Depth
//!
//! Screen-space interpolation of z is wrong under perspective, but 1/z is
//! linear in screen space, so edges and spans carry 1/z. The depth buffer
//! stores the same quantity. Polygons with a vertex at or behind the center
//! of projection (including flat 2D geometry at z = 0) are drawn without the
//! depth test. Turning the test off leaves 1/z interpolated for the shader.
//!
//! # References
//!
//! - Foley, van Dam et al., "Computer Graphics: Principles and Practice"

use super::{Fragment, FragmentShader, Rasterizer};
use crate::colors::Color;
use crate::primitives::Polygon;
use crate::render::image::Image;

/// Vertices with z at or below this carry no usable depth.
const MIN_DEPTH: f32 = 1e-6;

/// Scanline polygon rasterizer.
///
/// # Characteristics
///
/// - **Cache-friendly**: Processes pixels in row order
/// - **General**: Handles concave and self-intersecting polygons by parity
/// - **Sequential**: Best suited for single-threaded CPU rendering
pub struct ScanlineRasterizer;

impl Default for ScanlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen-space vertex attributes the rasterizer interpolates.
#[derive(Clone, Copy)]
struct Vertex {
    x: f32,
    y: f32,
    inv_z: f32,
    color: Color,
}

/// A polygon edge prepared for scan conversion.
#[derive(Clone, Copy, Debug)]
struct Edge {
    /// First scanline the edge is active on.
    y_start: i32,
    /// Last scanline the edge is active on (inclusive).
    y_end: i32,
    /// x at the lower end, used to stop rounding drift from overshooting.
    x_end: f32,
    /// Intersection with the current scanline's pixel center.
    x: f32,
    dx_per_scan: f32,
    inv_z: f32,
    dinv_z_per_scan: f32,
    color: Color,
    dcolor_per_scan: Color,
}

impl Edge {
    /// Build the edge between two vertices, or `None` if it crosses no pixel
    /// center inside the image or has a non-finite endpoint.
    fn new(a: Vertex, b: Vertex, rows: i32) -> Option<Self> {
        if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (top, bottom) = if a.y <= b.y { (a, b) } else { (b, a) };

        let first_row = (top.y - 0.5).ceil() as i32;
        let end_row = (bottom.y - 0.5).ceil() as i32;
        if end_row <= first_row || end_row <= 0 || first_row >= rows {
            return None;
        }

        let dy = bottom.y - top.y;
        let dx_per_scan = (bottom.x - top.x) / dy;
        let dinv_z_per_scan = (bottom.inv_z - top.inv_z) / dy;
        let dcolor_per_scan = (bottom.color - top.color) * (1.0 / dy);

        // Distance from the top vertex down to the first sampled center,
        // skipping rows above the image
        let y_start = first_row.max(0);
        let offset = y_start as f32 + 0.5 - top.y;

        Some(Self {
            y_start,
            y_end: (end_row - 1).min(rows - 1),
            x_end: bottom.x,
            x: top.x + dx_per_scan * offset,
            dx_per_scan,
            inv_z: top.inv_z + dinv_z_per_scan * offset,
            dinv_z_per_scan,
            color: top.color + dcolor_per_scan * offset,
            dcolor_per_scan,
        })
    }

    /// Move to the next scanline.
    #[inline]
    fn advance(&mut self) {
        self.x += self.dx_per_scan;
        if (self.dx_per_scan > 0.0 && self.x > self.x_end)
            || (self.dx_per_scan < 0.0 && self.x < self.x_end)
        {
            self.x = self.x_end;
        }
        self.inv_z += self.dinv_z_per_scan;
        self.color = self.color + self.dcolor_per_scan;
    }
}

impl ScanlineRasterizer {
    /// Creates a new scanline rasterizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Gather the polygon's vertices with their interpolated attributes.
    ///
    /// 1/z is carried whenever every vertex lies in front of the center of
    /// projection, so depth-cued shaders see real depth even with the depth
    /// test off. Also returns whether the depth test applies.
    fn vertices(polygon: &Polygon) -> (Vec<Vertex>, bool) {
        let has_depth = polygon.vertices().iter().all(|v| v.z > MIN_DEPTH);
        let depth_test = polygon.z_buffer && has_depth;
        let colors = polygon.colors();

        let vertices = polygon
            .vertices()
            .iter()
            .enumerate()
            .map(|(i, v)| Vertex {
                x: v.x,
                y: v.y,
                inv_z: if has_depth { 1.0 / v.z } else { 0.0 },
                color: colors.map_or(Color::WHITE, |c| c[i]),
            })
            .collect();
        (vertices, depth_test)
    }

    /// Build every edge of the closed vertex ring, sorted by first scanline.
    fn build_edges(vertices: &[Vertex], rows: i32) -> Vec<Edge> {
        let n = vertices.len();
        let mut edges: Vec<Edge> = (0..n)
            .filter_map(|i| Edge::new(vertices[i], vertices[(i + 1) % n], rows))
            .collect();
        // stable: ties keep polygon order
        edges.sort_by_key(|edge| edge.y_start);
        edges
    }

    /// Fill the pixels between two edges on one scanline.
    #[inline]
    fn fill_span<S: FragmentShader>(
        image: &mut Image,
        y: i32,
        left: &Edge,
        right: &Edge,
        depth_test: bool,
        shader: &S,
    ) {
        let x_start = (left.x - 0.5).ceil() as i32;
        let x_end = (right.x - 0.5).ceil() as i32;
        if x_end <= x_start {
            return;
        }

        let width = right.x - left.x;
        let (dinv_z, dcolor) = if width > f32::EPSILON {
            (
                (right.inv_z - left.inv_z) / width,
                (right.color - left.color) * (1.0 / width),
            )
        } else {
            (0.0, Color::BLACK)
        };

        for x in x_start.max(0)..x_end.min(image.width() as i32) {
            let t = x as f32 + 0.5 - left.x;
            let inv_z = left.inv_z + dinv_z * t;
            if depth_test && !image.passes_depth(x, y, inv_z) {
                continue;
            }

            let fragment = Fragment {
                z: if inv_z > 0.0 { 1.0 / inv_z } else { 0.0 },
                color: left.color + dcolor * t,
            };
            let color = shader.shade(&fragment);
            if depth_test {
                image.set_pixel_with_depth(x, y, inv_z, color);
            } else {
                image.set_pixel(x, y, color);
            }
        }
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn fill_polygon<S: FragmentShader>(&self, polygon: &Polygon, image: &mut Image, shader: &S) {
        if polygon.len() < 3 {
            log::debug!(
                "skipping degenerate polygon with {} vertices",
                polygon.len()
            );
            return;
        }

        let rows = image.height() as i32;
        let (vertices, depth_test) = Self::vertices(polygon);
        let edges = Self::build_edges(&vertices, rows);

        let mut pending = edges.into_iter().peekable();
        let Some(mut scan) = pending.peek().map(|edge| edge.y_start) else {
            return;
        };
        let mut active: Vec<Edge> = Vec::new();

        loop {
            while let Some(edge) = pending.next_if(|edge| edge.y_start <= scan) {
                active.push(edge);
            }

            if active.is_empty() {
                // gap between the parts of a disjoint polygon
                match pending.peek() {
                    Some(edge) => {
                        scan = edge.y_start;
                        continue;
                    }
                    None => break,
                }
            }

            active.sort_by(|a, b| a.x.total_cmp(&b.x));
            if active.len() % 2 != 0 {
                log::warn!(
                    "odd active edge count ({}) on scanline {}, skipping",
                    active.len(),
                    scan
                );
            } else {
                for pair in active.chunks_exact(2) {
                    Self::fill_span(image, scan, &pair[0], &pair[1], depth_test, shader);
                }
            }

            active.retain_mut(|edge| {
                if edge.y_end <= scan {
                    return false;
                }
                edge.advance();
                true
            });
            scan += 1;
        }
    }
}
