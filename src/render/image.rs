//! Owned pixel buffer with depth and coverage planes.
//!
//! Three parallel planes, indexed `row * width + col`:
//!
//! - **color**: linear RGB, unclamped until encoded
//! - **depth**: 1/z of the nearest fragment written so far. z is the
//!   canonical view-volume depth in `(0, 1]`, so 1/z is linear in screen
//!   space and larger values are closer to the camera. The buffer resets to
//!   [`FAR_DEPTH`], the back clip plane.
//! - **alpha**: coverage written by the super-sampling rasterizer, 1 elsewhere
//!
//! Row 0 is the top of the image.

use std::path::Path;

use crate::colors::Color;
use crate::error::RenderError;

/// Reset value of the depth buffer: 1/z at the back clip plane.
pub const FAR_DEPTH: f32 = 1.0;

/// Relative margin a fragment's 1/z must beat the stored value by.
///
/// Of two coplanar fragments the first one drawn wins, instead of the result
/// flickering with rounding noise.
pub const DEPTH_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    depth: Vec<f32>,
    alpha: Vec<f32>,
}

impl Image {
    /// Create a black image with a cleared depth buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; size],
            depth: vec![FAR_DEPTH; size],
            alpha: vec![1.0; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clear to black, full alpha and far depth.
    pub fn reset(&mut self) {
        self.fill(Color::BLACK);
        self.alpha.fill(1.0);
        self.clear_depth();
    }

    /// Set every pixel's color, leaving depth and alpha alone.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    #[inline]
    /// Reset the depth buffer to the back clip plane.
    pub fn clear_depth(&mut self) {
        self.depth.fill(FAR_DEPTH);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        let (width, height) = (self.width as usize, self.height as usize);
        (x < width && y < height).then(|| y * width + x)
    }

    /// Set a pixel without depth testing. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Whether a fragment with the given 1/z would be visible at (x, y).
    #[inline]
    pub fn passes_depth(&self, x: i32, y: i32, inv_depth: f32) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                let stored = self.depth[idx];
                inv_depth - stored > DEPTH_EPSILON * stored.abs()
            }
            None => false,
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if `inv_depth` (1/z) is closer than the stored
    /// value by more than [`DEPTH_EPSILON`]. Returns whether it was written.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, inv_depth: f32, color: Color) -> bool {
        if !self.passes_depth(x, y, inv_depth) {
            return false;
        }
        if let Some(idx) = self.index(x, y) {
            self.depth[idx] = inv_depth;
            self.pixels[idx] = color;
        }
        true
    }

    /// Mix `color` over the existing pixel by `coverage` and record the
    /// coverage in the alpha plane.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if let Some(idx) = self.index(x, y) {
            let coverage = coverage.clamp(0.0, 1.0);
            self.pixels[idx] = self.pixels[idx].lerp(color, coverage);
            self.alpha[idx] = coverage;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    /// Stored 1/z at (x, y).
    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth[idx])
    }

    pub fn coverage(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.alpha[idx])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Clamp and encode to an 8-bit RGB image.
    pub fn to_rgb8(&self) -> ::image::RgbImage {
        ::image::RgbImage::from_fn(self.width, self.height, |x, y| {
            ::image::Rgb(self.pixels[y as usize * self.width as usize + x as usize].to_rgb8())
        })
    }

    /// Write to disk; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        self.to_rgb8().save(path)?;
        Ok(())
    }

    /// Load an image file (PNG, PPM, JPG, ...) as the color plane.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let img = ::image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();

        let mut image = Self::new(width, height);
        for (dst, src) in image.pixels.iter_mut().zip(img.pixels()) {
            *dst = Color::from_rgb8(src.0);
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_cleared() {
        let image = Image::new(4, 3);
        assert_eq!(image.pixel(3, 2), Some(Color::BLACK));
        assert_eq!(image.depth(0, 0), Some(FAR_DEPTH));
        assert_eq!(image.coverage(1, 1), Some(1.0));
        assert_eq!(image.pixel(4, 0), None);
        assert_eq!(image.pixel(0, -1), None);
    }

    #[test]
    fn test_wide_and_tall_images_index_every_pixel() {
        for (w, h) in [(70_000, 2), (2, 70_000)] {
            let mut image = Image::new(w, h);
            assert_eq!(image.pixels().len(), 140_000);
            let (x, y) = (w as i32 - 1, h as i32 - 1);
            image.set_pixel(x, y, Color::RED);
            assert_eq!(image.pixel(x, y), Some(Color::RED));
            assert_eq!(image.pixel(x + 1, y), None);
            assert_eq!(image.pixel(-1, 0), None);
        }
    }

    #[test]
    fn test_depth_test_prefers_closer() {
        let mut image = Image::new(2, 2);
        assert!(image.set_pixel_with_depth(0, 0, 2.0, Color::RED));
        assert!(!image.set_pixel_with_depth(0, 0, 1.5, Color::GREEN));
        assert!(image.set_pixel_with_depth(0, 0, 4.0, Color::BLUE));
        assert_eq!(image.pixel(0, 0), Some(Color::BLUE));
        assert_eq!(image.depth(0, 0), Some(4.0));
    }

    #[test]
    fn test_coplanar_first_wins() {
        let mut image = Image::new(1, 1);
        assert!(image.set_pixel_with_depth(0, 0, 2.0, Color::RED));
        assert!(!image.set_pixel_with_depth(0, 0, 2.0 + 1e-6, Color::GREEN));
        assert_eq!(image.pixel(0, 0), Some(Color::RED));
    }

    #[test]
    fn test_behind_back_plane_is_rejected() {
        let mut image = Image::new(1, 1);
        assert!(!image.set_pixel_with_depth(0, 0, 0.5, Color::RED));
        assert_eq!(image.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_reset() {
        let mut image = Image::new(2, 1);
        image.set_pixel_with_depth(1, 0, 3.0, Color::WHITE);
        image.blend_pixel(0, 0, Color::WHITE, 0.25);
        image.reset();
        assert_eq!(image.pixel(1, 0), Some(Color::BLACK));
        assert_eq!(image.depth(1, 0), Some(FAR_DEPTH));
        assert_eq!(image.coverage(0, 0), Some(1.0));
    }

    #[test]
    fn test_blend() {
        let mut image = Image::new(1, 1);
        image.blend_pixel(0, 0, Color::WHITE, 0.25);
        assert_eq!(image.pixel(0, 0), Some(Color::gray(0.25)));
        assert_eq!(image.coverage(0, 0), Some(0.25));
    }

    #[test]
    fn test_to_rgb8() {
        let mut image = Image::new(2, 2);
        image.set_pixel(1, 0, Color::new(1.0, 0.5, 2.0));
        let rgb = image.to_rgb8();
        assert_eq!(rgb.dimensions(), (2, 2));
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 128, 255]);
        assert_eq!(rgb.get_pixel(0, 1).0, [0, 0, 0]);
    }
}
