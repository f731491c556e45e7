//! A CPU scanline renderer driven by a hierarchical scene graph.
//!
//! Scenes are [`Module`]s: ordered lists of geometry, transforms, color
//! changes and references to other modules. [`render()`] walks a module,
//! transforms its geometry through a [`View3D`] or [`View2D`] matrix, lights
//! polygons with a [`Lighting`] environment and fills them into an [`Image`]
//! with a depth buffer. Bézier curves and surfaces are tessellated by
//! subdivision before drawing.
//!
//! # Quick Start
//!
//! ```ignore
//! use scanmod::prelude::*;
//!
//! let config = RenderConfig::default();
//! let mut scene = Module::new();
//! scene.color(Color::RED).cube(true);
//!
//! let mut image = config.image();
//! render(
//!     &scene,
//!     &config.view_matrix(),
//!     &Mat4::identity(),
//!     &mut config.draw_state(),
//!     None,
//!     &mut image,
//! );
//! image.save("cube.png")?;
//! ```

pub mod bezier;
pub mod colors;
pub mod config;
pub mod draw_state;
pub mod error;
pub mod light;
pub mod math;
pub mod primitives;
pub mod render;
pub mod scene;
pub mod view;

// Re-export commonly needed types at crate root for convenience
pub use bezier::{BezierCurve, BezierSurface};
pub use colors::Color;
pub use config::{ConfigError, RenderConfig};
pub use draw_state::{DrawState, ShadingMode};
pub use error::RenderError;
pub use light::{Light, Lighting, SurfacePoint, MAX_LIGHTS};
pub use primitives::{Line, Polygon, Polyline};
pub use render::{Image, RasterizerType};
pub use scene::{render, Element, Module};
pub use view::{View2D, View3D};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use scanmod::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::scene::{render, Element, Module};

    // Geometry
    pub use crate::bezier::{BezierCurve, BezierSurface};
    pub use crate::primitives::{Line, Polygon, Polyline};

    // Appearance
    pub use crate::colors::Color;
    pub use crate::draw_state::{DrawState, ShadingMode};
    pub use crate::light::{Light, Lighting};

    // Viewing
    pub use crate::config::RenderConfig;
    pub use crate::view::{View2D, View3D};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::{Image, RasterizerType};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        ConstantShader, DepthCueShader, GouraudShader, Image, Rasterizer, ScanlineRasterizer,
        SupersampleRasterizer,
    };
}
