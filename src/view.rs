//! View transformation matrices.
//!
//! Both views map world space into image space: x grows to the right in
//! columns, y grows downward in rows, and the view center lands on the middle
//! of the image.
//!
//! # 3D pipeline
//!
//! [`View3D::matrix`] chains the classic perspective viewing steps:
//!
//! 1. Translate the view reference point (VRP) to the origin
//! 2. Rotate the view frame `(u, vup', vpn)` onto the axes
//! 3. Move the center of projection (COP) to the origin
//! 4. Scale to the canonical view volume (back plane at `z = 1`)
//! 5. Project with the COP at the origin
//! 6. Scale and translate into image coordinates
//!
//! After [`Vec4::homogenize`](crate::math::vec4::Vec4::homogenize) the z
//! coordinate is the canonical-volume depth in `(0, 1]`, which is what the
//! depth buffer stores the reciprocal of.

use serde::{Deserialize, Serialize};

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Orthographic 2D view of the xy plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View2D {
    /// World point shown at the image center.
    pub center: (f32, f32),
    /// World width covered by the image.
    pub width: f32,
    /// Direction in the world that becomes the image's horizontal axis.
    pub x_axis: (f32, f32),
    pub screen_width: u32,
    pub screen_height: u32,
}

impl View2D {
    pub fn new(center: (f32, f32), width: f32, screen_width: u32, screen_height: u32) -> Self {
        Self {
            center,
            width,
            x_axis: (1.0, 0.0),
            screen_width,
            screen_height,
        }
    }

    pub fn with_x_axis(mut self, x: f32, y: f32) -> Self {
        self.x_axis = (x, y);
        self
    }

    /// Build the view transformation matrix.
    ///
    /// Pixels are square: the world height shown is
    /// `width * screen_height / screen_width`.
    pub fn matrix(&self) -> Mat4 {
        let pixels_per_unit = self.screen_width as f32 / self.width;
        let angle = self.x_axis.1.atan2(self.x_axis.0);

        let mut vtm = Mat4::identity();
        vtm.translate_2d(-self.center.0, -self.center.1)
            .rotate_z(-angle)
            .scale_2d(pixels_per_unit, -pixels_per_unit)
            .translate_2d(
                self.screen_width as f32 / 2.0,
                self.screen_height as f32 / 2.0,
            );
        vtm
    }
}

/// Perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View3D {
    /// View reference point: the center of the view window.
    pub vrp: Vec3,
    /// View plane normal: the direction the camera looks.
    pub vpn: Vec3,
    /// Approximate up direction; only its component orthogonal to `vpn` is used.
    pub vup: Vec3,
    /// Distance from the center of projection back to the VRP.
    pub distance: f32,
    /// Width of the view window in world units.
    pub window_width: f32,
    /// Height of the view window in world units.
    pub window_height: f32,
    /// Front clip plane distance from the VRP. Recorded but not used for
    /// clipping.
    pub z_near: f32,
    /// Back clip plane distance from the VRP; maps to depth 1.
    pub z_far: f32,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl Default for View3D {
    fn default() -> Self {
        Self {
            vrp: Vec3::new(0.0, 0.0, -5.0),
            vpn: Vec3::Z,
            vup: Vec3::Y,
            distance: 2.0,
            window_width: 1.0,
            window_height: 1.0,
            z_near: 0.0,
            z_far: 20.0,
            screen_width: 640,
            screen_height: 640,
        }
    }
}

impl View3D {
    /// Point the camera from `eye` at `target`, keeping the other settings.
    pub fn looking_at(mut self, eye: Vec3, target: Vec3) -> Self {
        self.vrp = eye;
        self.vpn = target - eye;
        self
    }

    /// Orthonormal view frame `(u, vup', vpn)`.
    ///
    /// `u = vup x vpn` points toward the left edge of the image.
    pub fn frame(&self) -> (Vec3, Vec3, Vec3) {
        let vpn = self.vpn.normalize();
        let u = self.vup.cross(vpn).normalize();
        let vup = vpn.cross(u).normalize();
        (u, vup, vpn)
    }

    /// World-space position of the eye, `distance` behind the VRP.
    pub fn center_of_projection(&self) -> Vec3 {
        self.vrp - self.vpn.normalize() * self.distance
    }

    /// Build the view transformation matrix.
    pub fn matrix(&self) -> Mat4 {
        let (u, vup, vpn) = self.frame();
        let d = self.distance;
        let b_prime = d + self.z_far;
        let d_prime = d / b_prime;

        let mut vtm = Mat4::identity();
        vtm.translate(-self.vrp.x, -self.vrp.y, -self.vrp.z)
            .rotate_xyz(u, vup, vpn)
            .translate(0.0, 0.0, d)
            .scale(
                2.0 * d / (self.window_width * b_prime),
                2.0 * d / (self.window_height * b_prime),
                1.0 / b_prime,
            )
            .perspective(d_prime)
            .scale(
                -(self.screen_width as f32) / (2.0 * d_prime),
                -(self.screen_height as f32) / (2.0 * d_prime),
                1.0,
            )
            .translate(
                self.screen_width as f32 / 2.0,
                self.screen_height as f32 / 2.0,
                0.0,
            );
        vtm
    }
}
