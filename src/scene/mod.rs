//! Hierarchical scene description.
//!
//! A [`Module`] is an ordered list of [`Element`]s: geometry, transforms,
//! drawing-state changes and references to other modules. Modules are built
//! once and then handed to [`render`], which walks them depth-first.
//!
//! Sub-modules are shared through [`Rc`], so the same module can be placed
//! many times (under different transforms) without copying it. A module can
//! only reference modules that already exist when it is built, which keeps
//! the graph acyclic.

mod draw;
mod obj;
mod shapes;

pub use draw::render;

use std::rc::Rc;

use crate::colors::Color;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::primitives::{Line, Polygon, Polyline};

/// One entry of a module.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Point(Vec4),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    /// Pre-multiplied onto the module's local transform.
    Matrix(Mat4),
    /// Resets the local transform.
    Identity,
    Color(Color),
    BodyColor(Color),
    SurfaceColor(Color),
    /// Specular exponent.
    SurfaceCoeff(f32),
    Module(Rc<Module>),
}

/// An ordered, append-only list of scene elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    elements: Vec<Element>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Wrap in an [`Rc`] so the module can be placed inside others.
    pub fn into_shared(self) -> Rc<Module> {
        Rc::new(self)
    }

    pub fn push(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn point(&mut self, p: Vec4) -> &mut Self {
        self.push(Element::Point(p))
    }

    pub fn line(&mut self, line: Line) -> &mut Self {
        self.push(Element::Line(line))
    }

    pub fn polyline(&mut self, polyline: Polyline) -> &mut Self {
        self.push(Element::Polyline(polyline))
    }

    pub fn polygon(&mut self, polygon: Polygon) -> &mut Self {
        self.push(Element::Polygon(polygon))
    }

    pub fn matrix(&mut self, m: Mat4) -> &mut Self {
        self.push(Element::Matrix(m))
    }

    pub fn identity(&mut self) -> &mut Self {
        self.push(Element::Identity)
    }

    pub fn translate_2d(&mut self, tx: f32, ty: f32) -> &mut Self {
        self.matrix(Mat4::translation(tx, ty, 0.0))
    }

    pub fn scale_2d(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.matrix(Mat4::scaling(sx, sy, 1.0))
    }

    /// Rotation about the z axis by `angle` radians.
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.matrix(Mat4::rotation_z(angle))
    }

    pub fn shear_2d(&mut self, shx: f32, shy: f32) -> &mut Self {
        self.matrix(Mat4::shearing_2d(shx, shy))
    }

    pub fn translate(&mut self, tx: f32, ty: f32, tz: f32) -> &mut Self {
        self.matrix(Mat4::translation(tx, ty, tz))
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.matrix(Mat4::scaling(sx, sy, sz))
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.matrix(Mat4::rotation_x(angle))
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.matrix(Mat4::rotation_y(angle))
    }

    /// Rotation into the orthonormal basis `(u, v, w)`.
    pub fn rotate_xyz(&mut self, u: Vec3, v: Vec3, w: Vec3) -> &mut Self {
        self.matrix(Mat4::basis_rotation(u, v, w))
    }

    pub fn color(&mut self, color: Color) -> &mut Self {
        self.push(Element::Color(color))
    }

    pub fn body_color(&mut self, color: Color) -> &mut Self {
        self.push(Element::BodyColor(color))
    }

    pub fn surface_color(&mut self, color: Color) -> &mut Self {
        self.push(Element::SurfaceColor(color))
    }

    pub fn surface_coeff(&mut self, shininess: f32) -> &mut Self {
        self.push(Element::SurfaceCoeff(shininess))
    }

    /// Place a shared sub-module here.
    pub fn module(&mut self, module: Rc<Module>) -> &mut Self {
        self.push(Element::Module(module))
    }
}
