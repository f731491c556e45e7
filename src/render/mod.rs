//! Pixel output: the image buffer, line drawing and polygon rasterization.

pub mod image;
mod line;
pub mod rasterizer;

pub use self::image::{Image, DEPTH_EPSILON, FAR_DEPTH};
pub use rasterizer::{
    ConstantShader, DepthCueShader, Fragment, FragmentShader, GouraudShader, Rasterizer,
    RasterizerDispatcher, RasterizerType, ScanlineRasterizer, SupersampleRasterizer,
};
