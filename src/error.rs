//! Error types shared across the pipeline.

use thiserror::Error;

/// Errors raised while building scenes or moving pixels in and out of the crate.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The lighting environment already holds its maximum number of lights.
    #[error("lighting is full: at most {max} lights are supported")]
    TooManyLights { max: usize },

    /// A per-vertex attribute list does not line up with the vertex list.
    #[error("attribute count mismatch: expected {expected}, got {actual}")]
    AttributeMismatch { expected: usize, actual: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),
}
