//! Polygon rasterization algorithms.
//!
//! This module provides multiple rasterizer implementations that can be
//! swapped at runtime for testing and benchmarking purposes.
//!
//! Available algorithms:
//! - [`ScanlineRasterizer`]: Active-edge-list scanline fill with a depth buffer
//! - [`SupersampleRasterizer`]: 4x4 coverage sampling per pixel, blended edges

mod scanline;
mod shader;
mod supersample;

pub use scanline::ScanlineRasterizer;
pub use shader::{ConstantShader, DepthCueShader, Fragment, FragmentShader, GouraudShader};
pub use supersample::SupersampleRasterizer;

use serde::{Deserialize, Serialize};

use super::image::Image;
use crate::primitives::Polygon;

/// Trait for polygon rasterization algorithms.
///
/// Implementors define how a screen-space polygon is filled into an image.
/// The polygon must already be homogenized: x and y in pixels, z the
/// canonical view-volume depth.
pub trait Rasterizer {
    /// Fill a polygon into the image.
    ///
    /// # Arguments
    /// * `polygon` - The polygon to rasterize (any vertex count >= 3, convex or not)
    /// * `image` - The image to draw into
    /// * `shader` - Computes the final color of each covered pixel
    fn fill_polygon<S: FragmentShader>(&self, polygon: &Polygon, image: &mut Image, shader: &S);
}

/// Available rasterization algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterizerType {
    /// Scanline rasterizer with depth buffering and attribute interpolation.
    #[default]
    Scanline,
    /// Anti-aliased fill that blends by pixel coverage.
    /// Does not read or write the depth buffer.
    Supersampled,
}

impl std::fmt::Display for RasterizerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterizerType::Scanline => write!(f, "Scanline"),
            RasterizerType::Supersampled => write!(f, "Supersampled"),
        }
    }
}

/// Dispatcher that holds both rasterizer implementations.
pub struct RasterizerDispatcher {
    scanline: ScanlineRasterizer,
    supersample: SupersampleRasterizer,
    active: RasterizerType,
}

impl RasterizerDispatcher {
    pub fn new(rasterizer_type: RasterizerType) -> Self {
        Self {
            scanline: ScanlineRasterizer::new(),
            supersample: SupersampleRasterizer::new(),
            active: rasterizer_type,
        }
    }

    pub fn set_type(&mut self, rasterizer_type: RasterizerType) {
        self.active = rasterizer_type;
    }

    pub fn active_type(&self) -> RasterizerType {
        self.active
    }
}

impl Rasterizer for RasterizerDispatcher {
    #[inline]
    fn fill_polygon<S: FragmentShader>(&self, polygon: &Polygon, image: &mut Image, shader: &S) {
        match self.active {
            RasterizerType::Scanline => self.scanline.fill_polygon(polygon, image, shader),
            RasterizerType::Supersampled => self.supersample.fill_polygon(polygon, image, shader),
        }
    }
}
