//! Lighting types and the shading evaluator.
//!
//! Reflection follows the Blinn-Phong model: every light adds a Lambertian
//! body term `Cb * (N·L)` and a specular surface term `Cs * (N·H)^s`, where
//! `H` is the half vector between the light and view directions. The sum is
//! clamped to `[0, 1]` per channel.

use crate::colors::Color;
use crate::error::RenderError;
use crate::math::vec3::Vec3;

/// Maximum number of lights in a [`Lighting`] environment.
pub const MAX_LIGHTS: usize = 64;

/// A single light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light that reaches every surface regardless of orientation.
    Ambient { color: Color },
    /// Light from infinitely far away. `direction` points toward the light.
    Directional { color: Color, direction: Vec3 },
    /// Light radiating from a point in world space.
    Point { color: Color, position: Vec3 },
    /// Point light restricted to a cone.
    ///
    /// `direction` is the way the spot shines, from the light toward what it
    /// lights: a spot at `(0, 5, 0)` aimed at the origin has direction
    /// `(0, -1, 0)`, and the opposite sign leaves the origin dark.
    ///
    /// `cutoff` is the cosine of the cone half-angle; surfaces outside the
    /// cone receive nothing. Inside, the light falls off as `cos^sharpness`
    /// of the angle to the axis.
    Spot {
        color: Color,
        position: Vec3,
        direction: Vec3,
        cutoff: f32,
        sharpness: f32,
    },
}

/// Everything the evaluator needs to know about the point being shaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Surface normal (need not be normalized).
    pub normal: Vec3,
    /// Vector from the surface toward the viewer (need not be normalized).
    pub view: Vec3,
    pub position: Vec3,
    /// Diffuse reflection color.
    pub body: Color,
    /// Specular reflection color.
    pub surface: Color,
    /// Specular exponent.
    pub shininess: f32,
    /// One-sided surfaces are dark from behind.
    pub one_sided: bool,
}

impl Light {
    fn contribution(&self, n: Vec3, v: Vec3, sample: &SurfacePoint) -> Color {
        match *self {
            Light::Ambient { color } => sample.body * color,
            Light::Directional { color, direction } => {
                let l = direction.normalize();
                let theta = n.dot(l);
                if theta <= 0.0 && sample.one_sided {
                    return Color::BLACK;
                }
                // two-sided surfaces lit from behind use the back normal
                let n = if theta < 0.0 { -n } else { n };
                reflect(n, l, v, theta.abs(), sample) * color
            }
            Light::Point { color, position } => match point_geometry(position, n, v, sample) {
                Some((n, l, theta)) => reflect(n, l, v, theta, sample) * color,
                None => Color::BLACK,
            },
            Light::Spot {
                color,
                position,
                direction,
                cutoff,
                sharpness,
            } => {
                let Some((n, l, theta)) = point_geometry(position, n, v, sample) else {
                    return Color::BLACK;
                };
                let spot_effect = (-l).dot(direction.normalize());
                if spot_effect < cutoff || spot_effect <= 0.0 {
                    return Color::BLACK;
                }
                reflect(n, l, v, theta, sample) * color * spot_effect.powf(sharpness)
            }
        }
    }
}

/// Light direction and facing normal for lights with a position.
///
/// Returns `None` when the light cannot reach the visible side of the surface:
/// a one-sided surface lit from behind, or viewer and light on opposite sides.
fn point_geometry(
    position: Vec3,
    n: Vec3,
    v: Vec3,
    sample: &SurfacePoint,
) -> Option<(Vec3, Vec3, f32)> {
    let l = (position - sample.position).normalize();
    let theta = n.dot(l);
    if theta < 0.0 && sample.one_sided {
        return None;
    }
    let sigma = n.dot(v);
    if (theta < 0.0 && sigma > 0.0) || (theta > 0.0 && sigma < 0.0) {
        return None;
    }
    if theta < 0.0 {
        Some((-n, l, -theta))
    } else {
        Some((n, l, theta))
    }
}

#[inline]
fn reflect(n: Vec3, l: Vec3, v: Vec3, theta: f32, sample: &SurfacePoint) -> Color {
    let h = (l + v).normalize();
    let beta = n.dot(h).max(0.0).powf(sample.shininess);
    sample.body * theta + sample.surface * beta
}

/// A bounded collection of lights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lighting {
    lights: Vec<Light>,
}

impl Lighting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a light.
    ///
    /// Fails with [`RenderError::TooManyLights`] once [`MAX_LIGHTS`] are held.
    pub fn add(&mut self, light: Light) -> Result<&mut Self, RenderError> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(RenderError::TooManyLights { max: MAX_LIGHTS });
        }
        self.lights.push(light);
        Ok(self)
    }

    /// Remove every light.
    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Compute the color of a surface point under every light.
    pub fn shade(&self, sample: &SurfacePoint) -> Color {
        let n = sample.normal.normalize();
        let v = sample.view.normalize();

        let mut total = Color::BLACK;
        for light in &self.lights {
            total += light.contribution(n, v, sample);
        }
        total.clamped()
    }
}
