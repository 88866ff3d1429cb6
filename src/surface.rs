//! What a scene hands to its drawing surface each frame.
//!
//! Scene models describe geometry in their own local space; the surface (WebGL2 in the
//! browser, a recorder in tests) owns the native resources and does the drawing.

use glam::{Mat4, Vec2, Vec3};

/// Pixel size of a drawing surface. Never zero in either dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Degenerate stand-in used while the container has no layout yet.
    pub const DEGENERATE: SurfaceSize = SurfaceSize {
        width: 1,
        height: 1,
    };

    pub fn new(width: f64, height: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() && v >= 1.0 { v as u32 } else { 1 };
        Self {
            width: clamp(width),
            height: clamp(height),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 1 || self.height <= 1
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// The container's client rectangle, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width as f64, self.height as f64)
    }

    /// Map a client-space point into normalized device coordinates of this rect.
    /// Points outside the rect, or any point of an empty rect, yield `None`.
    pub fn to_ndc(&self, client: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let x = (client.x - self.left) / self.width;
        let y = (client.y - self.top) / self.height;
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }
        Some(Vec2::new(x * 2.0 - 1.0, -(y * 2.0 - 1.0)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Lines,
    Triangles,
}

/// A run of vertices drawn with one transform and one flat color.
#[derive(Clone, Debug)]
pub struct Batch<'a> {
    pub primitive: Primitive,
    pub vertices: &'a [Vec3],
    pub transform: Mat4,
    pub color: [f32; 4],
    pub point_size: f32,
}

impl<'a> Batch<'a> {
    pub fn new(primitive: Primitive, vertices: &'a [Vec3], transform: Mat4, color: [f32; 4]) -> Self {
        Self {
            primitive,
            vertices,
            transform,
            color,
            point_size: 1.0,
        }
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Frame<'a> {
    pub clear: [f32; 4],
    pub view_proj: Mat4,
    pub batches: Vec<Batch<'a>>,
}

/// Native drawing target bound to one container.
pub trait Surface {
    /// Current client rectangle of the container.
    fn bounds(&self) -> SurfaceRect;
    fn resize(&mut self, size: SurfaceSize);
    fn draw(&mut self, frame: &Frame<'_>);
    /// Free native resources and empty the container. Must tolerate repeat calls.
    fn release(&mut self);
}
