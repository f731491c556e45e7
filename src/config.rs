//! Render settings loaded from TOML.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```toml
//! width = 320
//! height = 240
//! shading = "gouraud"
//!
//! [view]
//! vrp = { x = 5.0, y = 5.0, z = 10.0 }
//! vpn = { x = -5.0, y = -5.0, z = -10.0 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::colors::Color;
use crate::draw_state::{DrawState, ShadingMode};
use crate::math::mat4::Mat4;
use crate::render::{Image, RasterizerType};
use crate::view::View3D;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Image size, clear color, shading defaults and camera for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub shading: ShadingMode,
    pub rasterizer: RasterizerType,
    /// Camera. Its screen size is taken from `width` and `height`.
    pub view: View3D,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            background: Color::BLACK,
            shading: ShadingMode::default(),
            rasterizer: RasterizerType::default(),
            view: View3D::default(),
        }
    }
}

impl RenderConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("loaded render config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Reject settings that would produce an empty image or a degenerate
    /// camera.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let view = &self.view;

        if self.width == 0 || self.height == 0 {
            return invalid(format!("image size {}x{} is empty", self.width, self.height));
        }
        if view.distance <= 0.0 {
            return invalid(format!("view distance must be positive, got {}", view.distance));
        }
        if view.window_width <= 0.0 || view.window_height <= 0.0 {
            return invalid(format!(
                "view window {}x{} must be positive",
                view.window_width, view.window_height
            ));
        }
        if view.z_far <= 0.0 {
            return invalid(format!("back plane must be positive, got {}", view.z_far));
        }
        if view.vpn.magnitude() <= f32::EPSILON {
            return invalid("view plane normal is zero".to_string());
        }
        if view.vup.cross(view.vpn).magnitude() <= f32::EPSILON {
            return invalid("view up is parallel to the view plane normal".to_string());
        }
        Ok(())
    }

    /// The configured camera, sized to the image.
    pub fn view(&self) -> View3D {
        View3D {
            screen_width: self.width,
            screen_height: self.height,
            ..self.view
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view().matrix()
    }

    /// A blank image cleared to the background color.
    pub fn image(&self) -> Image {
        let mut image = Image::new(self.width, self.height);
        image.fill(self.background);
        image
    }

    /// Default draw state with this config's shading, rasterizer and the
    /// camera's eye as the viewer.
    pub fn draw_state(&self) -> DrawState {
        let mut state = DrawState::new();
        state
            .set_shading(self.shading)
            .set_rasterizer(self.rasterizer)
            .set_viewer(self.view.center_of_projection());
        state
    }
}
