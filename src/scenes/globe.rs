use std::f32::consts::TAU;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use super::mesh;
use super::{with_alpha, ALERT, CHERENKOV, VOID};
use crate::affordance::{CursorSink, HighlightGroup, Highlighter, PointerAffordance};
use crate::camera::{Camera, Ray};
use crate::lifecycle::{FrameInput, SceneModel};
use crate::surface::{Batch, Frame, Primitive, Surface, SurfaceSize};

pub const GLOBE_RADIUS: f32 = 1.6;
/// Pick radius around each hotspot marker.
pub const HOTSPOT_RADIUS: f32 = 0.14;

const PARTICLES: usize = 1200;
const SPIN: f32 = 0.0015;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HotspotMotion {
    Fixed(Vec3),
    /// Circles the globe on wall-clock time, regardless of frame rate.
    Orbit {
        radius: f32,
        height: f32,
        period_ms: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hotspot {
    pub id: &'static str,
    pub motion: HotspotMotion,
    pub position: Vec3,
}

impl Hotspot {
    pub fn fixed(id: &'static str, position: Vec3) -> Self {
        Self {
            id,
            motion: HotspotMotion::Fixed(position),
            position,
        }
    }

    /// Marker on the globe surface at latitude/longitude in degrees.
    pub fn on_surface(id: &'static str, lat: f32, lon: f32) -> Self {
        let (lat, lon) = (lat.to_radians(), lon.to_radians());
        let r = GLOBE_RADIUS * 1.03;
        Self::fixed(
            id,
            Vec3::new(lat.cos() * lon.sin() * r, lat.sin() * r, lat.cos() * lon.cos() * r),
        )
    }

    pub fn orbiting(id: &'static str, radius: f32, height: f32, period_ms: f64) -> Self {
        let mut hotspot = Self {
            id,
            motion: HotspotMotion::Orbit {
                radius,
                height,
                period_ms,
            },
            position: Vec3::ZERO,
        };
        hotspot.update(0.0);
        hotspot
    }

    pub fn update(&mut self, timestamp_ms: f64) {
        if let HotspotMotion::Orbit {
            radius,
            height,
            period_ms,
        } = self.motion
        {
            let angle = ((timestamp_ms / period_ms).fract() as f32) * TAU;
            self.position = Vec3::new(angle.cos() * radius, height, angle.sin() * radius);
        }
    }
}

fn application_hotspots() -> Vec<Hotspot> {
    vec![
        Hotspot::orbiting("space", GLOBE_RADIUS * 1.45, 0.35, 12_000.0),
        Hotspot::on_surface("defense", 28.0, -20.0),
        Hotspot::on_surface("medical", -12.0, 24.0),
        Hotspot::on_surface("industrial", 55.0, 10.0),
    ]
}

/// Index of the nearest hotspot the ray passes through.
pub fn pick(ray: &Ray, hotspots: &[Hotspot]) -> Option<usize> {
    hotspots
        .iter()
        .enumerate()
        .filter_map(|(i, h)| ray.hit_sphere(h.position, HOTSPOT_RADIUS).map(|d| (i, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Applications globe: a particle sphere with hoverable sector hotspots.
pub struct GlobeScene {
    camera: Camera,
    particles: Vec<Vec3>,
    equator: Vec<Vec3>,
    rotation: f32,
    hotspots: Vec<Hotspot>,
    markers: Vec<Vec3>,
    active: Option<usize>,
    highlights: Highlighter,
    cursor: PointerAffordance,
}

impl GlobeScene {
    pub fn new(highlights: Option<Rc<dyn HighlightGroup>>, cursor: Rc<dyn CursorSink>) -> Self {
        Self::with_hotspots(application_hotspots(), highlights, cursor)
    }

    pub fn with_hotspots(
        hotspots: Vec<Hotspot>,
        highlights: Option<Rc<dyn HighlightGroup>>,
        cursor: Rc<dyn CursorSink>,
    ) -> Self {
        let markers = hotspots.iter().map(|h| h.position).collect();
        Self {
            camera: Camera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, 45.0),
            particles: mesh::fibonacci_sphere(PARTICLES, GLOBE_RADIUS),
            equator: mesh::circle(96, GLOBE_RADIUS * 1.45),
            rotation: 0.0,
            hotspots,
            markers,
            active: None,
            highlights: Highlighter::new(highlights),
            cursor: PointerAffordance::new(cursor),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn active(&self) -> Option<&'static str> {
        self.active.map(|i| self.hotspots[i].id)
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    fn set_active(&mut self, active: Option<usize>) {
        self.active = active;
        let id = active.map(|i| self.hotspots[i].id);
        self.highlights.set(id);
        self.cursor.set(id.is_some());
    }
}

impl SceneModel for GlobeScene {
    fn name(&self) -> &'static str {
        "globe"
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.camera.set_size(size);
    }

    fn advance(&mut self, input: &FrameInput) {
        self.rotation = input.tick as f32 * SPIN;
        for (hotspot, marker) in self.hotspots.iter_mut().zip(self.markers.iter_mut()) {
            hotspot.update(input.timestamp);
            *marker = hotspot.position;
        }
        let hit = input
            .bounds
            .to_ndc(input.pointer.client)
            .and_then(|ndc| pick(&self.camera.ray(ndc), &self.hotspots));
        self.set_active(hit);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let mut batches = vec![
            Batch::new(
                Primitive::Points,
                &self.particles,
                Mat4::from_rotation_y(self.rotation),
                with_alpha(CHERENKOV, 0.55),
            )
            .with_point_size(2.0),
            Batch::new(
                Primitive::Lines,
                &self.equator,
                Mat4::from_rotation_x(0.12),
                with_alpha(CHERENKOV, 0.15),
            ),
        ];
        for (i, marker) in self.markers.iter().enumerate() {
            let color = if self.active == Some(i) { ALERT } else { CHERENKOV };
            batches.push(
                Batch::new(
                    Primitive::Points,
                    std::slice::from_ref(marker),
                    Mat4::IDENTITY,
                    color,
                )
                .with_point_size(14.0),
            );
        }
        surface.draw(&Frame {
            clear: VOID,
            view_proj: self.camera.view_proj(),
            batches,
        });
    }

    fn deactivate(&mut self) {
        self.set_active(None);
    }
}
