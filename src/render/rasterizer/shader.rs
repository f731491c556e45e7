//! Fragment shaders for polygon rasterization.
//!
//! The rasterizer and the shading computation are kept apart, the way GPUs
//! separate the fixed-function rasterizer from programmable fragment shaders.
//!
//! # Architecture
//!
//! The rasterizer handles:
//! - Edge setup and scanline traversal
//! - Coverage (which pixels a polygon owns)
//! - Interpolation of depth and per-vertex color
//! - The depth test
//!
//! The shader handles:
//! - Turning the interpolated attributes into the final pixel color

use crate::colors::Color;

/// Interpolated attributes at one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Canonical view-volume depth in `[0, 1]`; 0 when the polygon carries
    /// no usable depth (2D geometry).
    pub z: f32,
    /// Interpolated per-vertex color, white when the polygon has none.
    pub color: Color,
}

/// Trait for per-pixel shading computations.
///
/// The rasterizer calls `shade()` for each pixel that survives the depth test.
pub trait FragmentShader {
    fn shade(&self, fragment: &Fragment) -> Color;
}

/// Constant shader - the same color for every pixel.
///
/// Used for unlit fills and for flat lighting, where the polygon's single lit
/// color is computed once before rasterization.
pub struct ConstantShader {
    color: Color,
}

impl ConstantShader {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl FragmentShader for ConstantShader {
    #[inline]
    fn shade(&self, _fragment: &Fragment) -> Color {
        self.color
    }
}

/// Depth-cue shader - fades the color toward black with distance.
pub struct DepthCueShader {
    color: Color,
}

impl DepthCueShader {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl FragmentShader for DepthCueShader {
    #[inline]
    fn shade(&self, fragment: &Fragment) -> Color {
        self.color * (1.0 - fragment.z.clamp(0.0, 1.0))
    }
}

/// Gouraud shader - passes through the interpolated vertex colors.
///
/// Used for smooth shading where colors are lit per vertex and then
/// interpolated across the polygon by the rasterizer.
pub struct GouraudShader;

impl FragmentShader for GouraudShader {
    #[inline]
    fn shade(&self, fragment: &Fragment) -> Color {
        fragment.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_depth_cue() {
        let shader = DepthCueShader::new(Color::WHITE);
        let near = shader.shade(&Fragment {
            z: 0.25,
            color: Color::WHITE,
        });
        assert_relative_eq!(near.r, 0.75);
        let flat = shader.shade(&Fragment {
            z: 0.0,
            color: Color::WHITE,
        });
        assert_eq!(flat, Color::WHITE);
    }

    #[test]
    fn test_constant_ignores_fragment() {
        let shader = ConstantShader::new(Color::RED);
        let c = shader.shade(&Fragment {
            z: 0.9,
            color: Color::BLUE,
        });
        assert_eq!(c, Color::RED);
    }
}
