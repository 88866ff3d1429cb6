use glam::{EulerRot, Mat4, Vec2, Vec3};

use super::mesh::{self, Mesh};
use super::{ease_toward, with_alpha, CHERENKOV, VOID};
use crate::camera::Camera;
use crate::lifecycle::{FrameInput, SceneModel};
use crate::surface::{Batch, Frame, Primitive, Surface, SurfaceSize};

/// Fraction of the remaining distance the inner light covers per frame.
pub const LIGHT_SMOOTHING: f32 = 0.05;

const SPIN_Y: f32 = 0.005;
const SPIN_X: f32 = 0.002;
/// How far the light can travel from the center, per axis.
const LIGHT_REACH: Vec2 = Vec2::new(1.4, 1.0);
const LIGHT_DEPTH: f32 = 0.8;

/// The hero diamond: a slowly tumbling brilliant with a light that follows the cursor.
pub struct OrbitalScene {
    camera: Camera,
    diamond: Mesh,
    halo: Vec<Vec3>,
    rotation: Vec2,
    light: [Vec3; 1],
}

impl OrbitalScene {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0),
            diamond: mesh::brilliant(8),
            halo: mesh::circle(64, 1.7),
            rotation: Vec2::ZERO,
            light: [Vec3::new(0.0, 0.0, LIGHT_DEPTH)],
        }
    }

    pub fn light(&self) -> Vec3 {
        self.light[0]
    }

    /// (x, y) rotation in radians.
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn light_target(normalized_pointer: Vec2) -> Vec3 {
        (normalized_pointer * LIGHT_REACH).extend(LIGHT_DEPTH)
    }
}

impl Default for OrbitalScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneModel for OrbitalScene {
    fn name(&self) -> &'static str {
        "orbital"
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.camera.set_size(size);
    }

    fn advance(&mut self, input: &FrameInput) {
        let t = input.tick as f32;
        self.rotation = Vec2::new(t * SPIN_X, t * SPIN_Y);
        let target = Self::light_target(input.pointer.normalized);
        self.light[0] = ease_toward(self.light[0], target, LIGHT_SMOOTHING);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let spin = Mat4::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, 0.0);
        // The facets glow brighter the closer the light sits to the stone's front.
        let glow = 0.25 + 0.2 * (1.0 - self.light[0].truncate().length().min(1.0));
        let frame = Frame {
            clear: VOID,
            view_proj: self.camera.view_proj(),
            batches: vec![
                Batch::new(
                    Primitive::Lines,
                    &self.halo,
                    Mat4::from_rotation_x(0.35) * Mat4::from_rotation_y(self.rotation.y * 0.5),
                    with_alpha(CHERENKOV, 0.2),
                ),
                Batch::new(
                    Primitive::Triangles,
                    &self.diamond.triangles,
                    spin,
                    with_alpha(CHERENKOV, glow),
                ),
                Batch::new(
                    Primitive::Lines,
                    &self.diamond.edges,
                    spin,
                    with_alpha(CHERENKOV, 0.9),
                ),
                Batch::new(
                    Primitive::Points,
                    &self.light,
                    Mat4::IDENTITY,
                    [1.0, 1.0, 1.0, 1.0],
                )
                .with_point_size(10.0),
            ],
        };
        surface.draw(&frame);
    }
}
