//! The three decorative scenes on the page.

mod exploded;
mod globe;
mod mesh;
mod orbital;

pub use exploded::{
    explosion_factor, label_index, Component, ExplodedScene, EXPLOSION_AMPLITUDE, SETTLE_POINT,
    STAGE_LABELS, TILT_SMOOTHING,
};
pub use globe::{pick, GlobeScene, Hotspot, HotspotMotion, GLOBE_RADIUS, HOTSPOT_RADIUS};
pub use orbital::{OrbitalScene, LIGHT_SMOOTHING};

use glam::Vec3;

/// Near-black page background.
pub(crate) const VOID: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Cherenkov blue, the brand accent.
pub(crate) const CHERENKOV: [f32; 4] = [0.0, 0.94, 1.0, 1.0];
pub(crate) const ALERT: [f32; 4] = [1.0, 0.165, 0.165, 1.0];

pub(crate) fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// One step of exponential smoothing: move `factor` of the remaining distance.
pub fn ease_toward(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    current + (target - current) * factor
}
