use std::rc::Rc;

use glam::{EulerRot, Mat4, Vec3};

use super::mesh::{self, Mesh};
use super::{ease_toward, with_alpha, CHERENKOV, VOID};
use crate::affordance::{HighlightGroup, Highlighter};
use crate::camera::Camera;
use crate::input::SliderInput;
use crate::lifecycle::{FrameInput, SceneModel};
use crate::surface::{Batch, Frame, Primitive, Surface, SurfaceSize};

/// Distance scale applied to every component's explosion direction.
pub const EXPLOSION_AMPLITUDE: f32 = 1.5;
/// Slider value at which the assembly counts as settled and stops spinning.
pub const SETTLE_POINT: f64 = 90.0;
/// Keys of the three caption elements, in slider order.
pub const STAGE_LABELS: [&str; 3] = ["isotope", "diamond", "conditioning"];

const SPIN: f32 = 0.004;
const PARALLAX: f32 = 0.25;
/// Per-frame easing of the pointer parallax tilt.
pub const TILT_SMOOTHING: f32 = 0.05;

/// How far apart the assembly is: 1 with the slider at 0, 0 at 100.
pub fn explosion_factor(slider: f64) -> f32 {
    (1.0 - slider.clamp(0.0, 100.0) / 100.0) as f32
}

/// Caption to highlight for a slider value.
pub fn label_index(slider: f64) -> usize {
    let t = slider / 100.0;
    if t < 0.33 {
        0
    } else if t < 0.66 {
        1
    } else {
        2
    }
}

/// One layer of the battery stack.
pub struct Component {
    pub name: &'static str,
    pub base: Vec3,
    pub direction: Vec3,
    pub color: [f32; 4],
    mesh: Mesh,
}

impl Component {
    fn new(name: &'static str, base: Vec3, direction: Vec3, half: Vec3, color: [f32; 4]) -> Self {
        Self {
            name,
            base,
            direction,
            color,
            mesh: mesh::cuboid(half),
        }
    }

    pub fn offset(&self, slider: f64) -> Vec3 {
        self.direction * explosion_factor(slider) * EXPLOSION_AMPLITUDE
    }
}

fn stack() -> Vec<Component> {
    let diamond = with_alpha(CHERENKOV, 0.35);
    let housing = [0.55, 0.6, 0.65, 0.5];
    let isotope = [0.95, 0.85, 0.2, 0.6];
    vec![
        Component::new("housing-top", Vec3::new(0.0, 0.45, 0.0), Vec3::new(0.0, 1.6, 0.0), Vec3::new(1.1, 0.08, 0.8), housing),
        Component::new("diamond-top", Vec3::new(0.0, 0.18, 0.0), Vec3::new(0.0, 0.8, 0.0), Vec3::new(0.9, 0.06, 0.65), diamond),
        Component::new("isotope", Vec3::ZERO, Vec3::new(0.0, 0.0, 0.6), Vec3::new(0.8, 0.05, 0.6), isotope),
        Component::new("diamond-bottom", Vec3::new(0.0, -0.18, 0.0), Vec3::new(0.0, -0.8, 0.0), Vec3::new(0.9, 0.06, 0.65), diamond),
        Component::new("housing-bottom", Vec3::new(0.0, -0.45, 0.0), Vec3::new(0.0, -1.6, 0.0), Vec3::new(1.1, 0.08, 0.8), housing),
        Component::new("terminal", Vec3::new(1.2, 0.0, 0.0), Vec3::new(1.2, 0.0, 0.0), Vec3::new(0.12, 0.12, 0.12), housing),
    ]
}

/// The technology section's device, pulled apart or pressed together by a slider.
pub struct ExplodedScene {
    camera: Camera,
    components: Vec<Component>,
    slider: SliderInput,
    value: f64,
    rotation: f32,
    tilt: Vec3,
    labels: Highlighter,
}

impl ExplodedScene {
    /// `slider` is detached when the page has no slider; `labels` may be absent too.
    pub fn new(slider: SliderInput, labels: Option<Rc<dyn HighlightGroup>>) -> Self {
        let value = slider.get();
        Self {
            camera: Camera::new(Vec3::new(0.0, 1.5, 6.5), Vec3::ZERO, 45.0),
            components: stack(),
            slider,
            value,
            rotation: 0.0,
            tilt: Vec3::ZERO,
            labels: Highlighter::new(labels),
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Offsets as of the last advanced frame.
    pub fn offsets(&self) -> Vec<Vec3> {
        self.components.iter().map(|c| c.offset(self.value)).collect()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Parallax tilt as (pitch, yaw, 0).
    pub fn tilt(&self) -> Vec3 {
        self.tilt
    }

    pub fn is_settled(&self) -> bool {
        self.value >= SETTLE_POINT
    }

    pub fn active_label(&self) -> Option<&str> {
        self.labels.active()
    }
}

impl SceneModel for ExplodedScene {
    fn name(&self) -> &'static str {
        "exploded"
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.camera.set_size(size);
    }

    fn advance(&mut self, input: &FrameInput) {
        self.value = self.slider.get();
        if !self.is_settled() {
            self.rotation += SPIN;
        }
        let target = Vec3::new(input.pointer.normalized.y, input.pointer.normalized.x, 0.0) * PARALLAX;
        self.tilt = ease_toward(self.tilt, target, TILT_SMOOTHING);
        self.labels.set(Some(STAGE_LABELS[label_index(self.value)]));
    }

    fn render(&self, surface: &mut dyn Surface) {
        let group = Mat4::from_euler(EulerRot::YXZ, self.rotation + self.tilt.y, self.tilt.x, 0.0);
        let mut batches = Vec::with_capacity(self.components.len() * 2);
        for component in &self.components {
            let transform = group * Mat4::from_translation(component.base + component.offset(self.value));
            batches.push(Batch::new(
                Primitive::Triangles,
                &component.mesh.triangles,
                transform,
                component.color,
            ));
            batches.push(Batch::new(
                Primitive::Lines,
                &component.mesh.edges,
                transform,
                with_alpha(component.color, 0.9),
            ));
        }
        surface.draw(&Frame {
            clear: VOID,
            view_proj: self.camera.view_proj(),
            batches,
        });
    }
}
