//! Per-draw rendering parameters inherited through the scene graph.

use serde::{Deserialize, Serialize};

use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::render::RasterizerType;

/// How polygons are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Outline only, drawn with lines in the current color.
    Frame,
    /// Solid fill in the current color.
    #[default]
    Constant,
    /// Current color darkened with distance: `color * (1 - z)`.
    Depth,
    /// One lit color per polygon, evaluated at its centroid.
    Flat,
    /// Lighting evaluated at every vertex and interpolated across the polygon.
    Gouraud,
}

impl std::fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShadingMode::Frame => write!(f, "Frame"),
            ShadingMode::Constant => write!(f, "Constant"),
            ShadingMode::Depth => write!(f, "Depth"),
            ShadingMode::Flat => write!(f, "Flat"),
            ShadingMode::Gouraud => write!(f, "Gouraud"),
        }
    }
}

/// Drawing parameters.
///
/// The module executor copies the state when it enters a sub-module, so
/// changes made inside a child never leak back into the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    /// Color for lines, points and unlit fills.
    pub color: Color,
    /// Diffuse reflection color used by lighting.
    pub body: Color,
    /// Specular reflection color used by lighting.
    pub surface: Color,
    /// Specular exponent.
    pub shininess: f32,
    pub shading: ShadingMode,
    /// Global depth-test switch, combined with each primitive's own flag.
    pub z_buffer: bool,
    /// Viewer position in world space, used for specular highlights.
    pub viewer: Vec3,
    pub rasterizer: RasterizerType,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            body: Color::WHITE,
            surface: Color::WHITE,
            shininess: 10.0,
            shading: ShadingMode::default(),
            z_buffer: true,
            viewer: Vec3::ZERO,
            rasterizer: RasterizerType::default(),
        }
    }
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    pub fn set_body(&mut self, color: Color) -> &mut Self {
        self.body = color;
        self
    }

    pub fn set_surface(&mut self, color: Color) -> &mut Self {
        self.surface = color;
        self
    }

    pub fn set_shininess(&mut self, shininess: f32) -> &mut Self {
        self.shininess = shininess;
        self
    }

    pub fn set_shading(&mut self, shading: ShadingMode) -> &mut Self {
        self.shading = shading;
        self
    }

    pub fn set_z_buffer(&mut self, enabled: bool) -> &mut Self {
        self.z_buffer = enabled;
        self
    }

    pub fn set_viewer(&mut self, viewer: Vec3) -> &mut Self {
        self.viewer = viewer;
        self
    }

    pub fn set_rasterizer(&mut self, rasterizer: RasterizerType) -> &mut Self {
        self.rasterizer = rasterizer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let state = DrawState::default();
        assert_eq!(state.color, Color::WHITE);
        assert_eq!(state.shading, ShadingMode::Constant);
        assert!(state.z_buffer);
        assert_eq!(state.rasterizer, RasterizerType::Scanline);
    }

    #[test]
    fn test_fluent_api() {
        let mut state = DrawState::new();
        state
            .set_color(Color::RED)
            .set_shading(ShadingMode::Gouraud)
            .set_shininess(32.0);
        assert_eq!(state.color, Color::RED);
        assert_eq!(state.shading, ShadingMode::Gouraud);
        assert_eq!(state.shininess, 32.0);
    }
}
