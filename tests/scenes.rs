#![cfg(not(target_arch = "wasm32"))]

mod support;

use std::rc::Rc;

use altenergy_viz::affordance::{CursorSink, CursorStyle, HighlightGroup};
use altenergy_viz::camera::Camera;
use altenergy_viz::input::{InputHub, Pointer, SliderInput};
use altenergy_viz::lifecycle::{FrameScheduler, Scene, SceneHandle};
use altenergy_viz::scenes::{
    ease_toward, explosion_factor, label_index, pick, ExplodedScene, GlobeScene, Hotspot,
    HotspotMotion, OrbitalScene, EXPLOSION_AMPLITUDE, LIGHT_SMOOTHING, STAGE_LABELS,
    TILT_SMOOTHING,
};
use altenergy_viz::surface::{Primitive, SurfaceRect};
use glam::{Vec2, Vec3};
use proptest::prelude::*;
use support::{rect, ManualFrames, RecordingCursor, RecordingHighlights, RecordingSurface};

proptest! {
    #[test]
    fn light_approaches_target_without_overshoot(
        tx in -2.0f32..2.0, ty in -2.0f32..2.0, sx in -2.0f32..2.0, sy in -2.0f32..2.0,
    ) {
        let target = Vec3::new(tx, ty, 0.8);
        let mut light = Vec3::new(sx, sy, 0.8);
        let mut distance = light.distance(target);
        for _ in 0..200 {
            let next = ease_toward(light, target, LIGHT_SMOOTHING);
            let next_distance = next.distance(target);
            prop_assert!(next_distance <= distance + 1e-6);
            // Same side of the target on every axis.
            prop_assert!((next.x - target.x) * (light.x - target.x) >= 0.0);
            prop_assert!((next.y - target.y) * (light.y - target.y) >= 0.0);
            light = next;
            distance = next_distance;
        }
        prop_assert!(distance <= 6.0 * 0.95f32.powi(200) + 1e-4);
    }
}

#[test]
fn orbital_light_eases_toward_pointer() {
    let frames = ManualFrames::new();
    let hub = InputHub::new();
    let (surface, log) = RecordingSurface::new(rect(500.0, 500.0));
    let scheduler: Rc<dyn FrameScheduler> = frames.clone();
    let scene = SceneHandle::create(OrbitalScene::new(), surface, scheduler, &hub, Vec::new());

    hub.publish_pointer(Pointer::from_client(1000.0, 500.0, 1000.0, 1000.0));
    let target = OrbitalScene::light_target(Vec2::new(1.0, 0.0));
    scene.start();

    frames.run_frame(0.0);
    let first = scene.with_model(|m| m.light());
    assert!((first.x - target.x * LIGHT_SMOOTHING).abs() < 1e-6);

    frames.run_frames(400);
    let settled = scene.with_model(|m| m.light());
    assert!(settled.distance(target) < 1e-3);
    assert!(settled.x <= target.x);

    let rotation = scene.with_model(|m| m.rotation());
    assert!(rotation.y > 0.0 && rotation.x > 0.0);
    assert!(log.borrow().last_frame.iter().any(|b| b.primitive == Primitive::Triangles));
}

#[test]
fn label_thresholds() {
    assert_eq!(label_index(0.0), 0);
    assert_eq!(label_index(32.9), 0);
    assert_eq!(label_index(33.0), 1);
    assert_eq!(label_index(50.0), 1);
    assert_eq!(label_index(65.9), 1);
    assert_eq!(label_index(66.0), 2);
    assert_eq!(label_index(100.0), 2);
}

#[test]
fn explosion_scales_with_slider() {
    assert_eq!(explosion_factor(0.0), 1.0);
    assert_eq!(explosion_factor(50.0), 0.5);
    assert_eq!(explosion_factor(100.0), 0.0);
}

struct Exploded {
    frames: Rc<ManualFrames>,
    hub: InputHub,
    slider: SliderInput,
    labels: Rc<RecordingHighlights>,
    scene: SceneHandle<ExplodedScene>,
}

fn exploded(initial: f64) -> Exploded {
    let frames = ManualFrames::new();
    let hub = InputHub::new();
    let slider = SliderInput::new(initial);
    let labels = RecordingHighlights::new(&STAGE_LABELS);
    let group: Rc<dyn HighlightGroup> = labels.clone();
    let (surface, _log) = RecordingSurface::new(rect(400.0, 300.0));
    let scheduler: Rc<dyn FrameScheduler> = frames.clone();
    let scene = SceneHandle::create(
        ExplodedScene::new(slider.clone(), Some(group)),
        surface,
        scheduler,
        &hub,
        Vec::new(),
    );
    scene.start();
    Exploded {
        frames,
        hub,
        slider,
        labels,
        scene,
    }
}

#[test]
fn fully_exploded_at_zero() {
    let rig = exploded(0.0);
    rig.frames.run_frames(3);
    let (offsets, directions, rotation, label) = rig.scene.with_model(|m| {
        (
            m.offsets(),
            m.components().iter().map(|c| c.direction).collect::<Vec<_>>(),
            m.rotation(),
            m.active_label().map(str::to_string),
        )
    });
    for (offset, direction) in offsets.iter().zip(&directions) {
        assert!(offset.distance(*direction * EXPLOSION_AMPLITUDE) < 1e-6);
    }
    assert!(rotation > 0.0);
    assert_eq!(label.as_deref(), Some(STAGE_LABELS[0]));
    assert_eq!(rig.labels.active(), vec![STAGE_LABELS[0].to_string()]);
}

#[test]
fn half_way_and_assembled() {
    let rig = exploded(50.0);
    rig.frames.run_frame(0.0);
    let half = rig.scene.with_model(|m| m.offsets());
    let directions = rig.scene.with_model(|m| {
        m.components().iter().map(|c| c.direction).collect::<Vec<_>>()
    });
    for (offset, direction) in half.iter().zip(&directions) {
        assert!(offset.distance(*direction * EXPLOSION_AMPLITUDE * 0.5) < 1e-6);
    }
    assert_eq!(rig.labels.active(), vec![STAGE_LABELS[1].to_string()]);

    rig.slider.set(100.0);
    rig.frames.run_frame(16.0);
    let before = rig.scene.with_model(|m| m.rotation());
    rig.frames.run_frames(10);
    rig.scene.with_model(|m| {
        assert!(m.offsets().iter().all(|o| o.length() < 1e-6));
        assert!(m.is_settled());
        assert_eq!(m.rotation(), before);
        assert_eq!(m.active_label(), Some(STAGE_LABELS[2]));
    });
    assert_eq!(rig.labels.active(), vec![STAGE_LABELS[2].to_string()]);
}

#[test]
fn tilt_eases_toward_pointer() {
    let rig = exploded(100.0);
    rig.hub.publish_pointer(Pointer::from_client(1000.0, 0.0, 1000.0, 1000.0));
    rig.frames.run_frame(0.0);
    let first = rig.scene.with_model(|m| m.tilt());
    assert!((first.x - 0.25 * TILT_SMOOTHING).abs() < 1e-6);
    assert!((first.y - 0.25 * TILT_SMOOTHING).abs() < 1e-6);

    rig.frames.run_frames(400);
    let settled = rig.scene.with_model(|m| m.tilt());
    assert!(settled.distance(Vec3::new(0.25, 0.25, 0.0)) < 1e-3);
}

#[test]
fn rotation_stops_at_settle_point() {
    let rig = exploded(89.0);
    rig.frames.run_frame(0.0);
    let spinning = rig.scene.with_model(|m| m.rotation());
    assert!(spinning > 0.0);

    rig.slider.set(90.0);
    rig.frames.run_frames(5);
    assert_eq!(rig.scene.with_model(|m| m.rotation()), spinning);
}

#[test]
fn boundary_values_pick_upper_label() {
    let rig = exploded(33.0);
    rig.frames.run_frame(0.0);
    assert_eq!(rig.labels.active(), vec![STAGE_LABELS[1].to_string()]);
    rig.slider.set(66.0);
    rig.frames.run_frame(16.0);
    assert_eq!(rig.labels.active(), vec![STAGE_LABELS[2].to_string()]);
}

#[test]
fn labels_only_pushed_on_change() {
    let rig = exploded(10.0);
    rig.frames.run_frames(20);
    assert_eq!(rig.labels.calls(), 1);
}

#[test]
fn missing_slider_and_labels_still_render() {
    let frames = ManualFrames::new();
    let hub = InputHub::new();
    let (surface, log) = RecordingSurface::new(rect(400.0, 300.0));
    let scheduler: Rc<dyn FrameScheduler> = frames.clone();
    let scene = SceneHandle::create(
        ExplodedScene::new(SliderInput::detached(), None),
        surface,
        scheduler,
        &hub,
        Vec::new(),
    );
    scene.start();
    frames.run_frames(3);
    assert_eq!(log.borrow().draws, 3);
    assert_eq!(scene.with_model(|m| m.active_label().map(str::to_string)), Some("isotope".into()));
}

#[test]
fn slider_input_clamps() {
    let slider = SliderInput::new(140.0);
    assert_eq!(slider.get(), 100.0);
    slider.set(-3.0);
    assert_eq!(slider.get(), 0.0);
    slider.set(f64::NAN);
    assert_eq!(slider.get(), 0.0);
}

fn project(camera: &Camera, point: Vec3) -> Vec2 {
    let clip = camera.view_proj() * point.extend(1.0);
    Vec2::new(clip.x / clip.w, clip.y / clip.w)
}

/// Client position inside `bounds` that lands on `ndc`.
fn client_for(bounds: SurfaceRect, ndc: Vec2) -> (f64, f64) {
    let x = bounds.left + (ndc.x + 1.0) / 2.0 * bounds.width;
    let y = bounds.top + (1.0 - ndc.y) / 2.0 * bounds.height;
    (x as f64, y as f64)
}

struct Globe {
    frames: Rc<ManualFrames>,
    hub: InputHub,
    cursor: Rc<RecordingCursor>,
    highlights: Rc<RecordingHighlights>,
    scene: SceneHandle<GlobeScene>,
    bounds: SurfaceRect,
}

fn globe(hotspots: Vec<Hotspot>) -> Globe {
    let frames = ManualFrames::new();
    let hub = InputHub::new();
    let cursor = RecordingCursor::new();
    let keys: Vec<&str> = hotspots.iter().map(|h| h.id).collect();
    let highlights = RecordingHighlights::new(&keys);
    let bounds = SurfaceRect::new(100.0, 50.0, 600.0, 400.0);
    let (surface, _log) = RecordingSurface::new(bounds);
    let scheduler: Rc<dyn FrameScheduler> = frames.clone();
    let group: Rc<dyn HighlightGroup> = highlights.clone();
    let sink: Rc<dyn CursorSink> = cursor.clone();
    let scene = SceneHandle::create(
        GlobeScene::with_hotspots(hotspots, Some(group), sink),
        surface,
        scheduler,
        &hub,
        Vec::new(),
    );
    Globe {
        frames,
        hub,
        cursor,
        highlights,
        scene,
        bounds,
    }
}

fn aim_at(rig: &Globe, point: Vec3) {
    let ndc = rig.scene.with_model(|m| project(m.camera(), point));
    let (x, y) = client_for(rig.bounds, ndc);
    rig.hub.publish_pointer(Pointer::from_client(x, y, 1280.0, 800.0));
}

fn fixed_hotspots() -> Vec<Hotspot> {
    vec![
        Hotspot::fixed("defense", Vec3::new(-1.0, 0.5, 1.7)),
        Hotspot::fixed("medical", Vec3::new(1.0, -0.5, 1.7)),
        Hotspot::fixed("industrial", Vec3::new(0.0, 1.2, 1.2)),
    ]
}

#[test]
fn hovering_one_hotspot_highlights_only_it() {
    let rig = globe(fixed_hotspots());
    rig.scene.start();
    aim_at(&rig, Vec3::new(1.0, -0.5, 1.7));
    rig.frames.run_frame(0.0);

    assert_eq!(rig.scene.with_model(|m| m.active()), Some("medical"));
    assert_eq!(rig.highlights.active(), vec!["medical".to_string()]);
    assert_eq!(rig.cursor.current(), CursorStyle::Pointer);

    aim_at(&rig, Vec3::new(-1.0, 0.5, 1.7));
    rig.frames.run_frame(16.0);
    assert_eq!(rig.highlights.active(), vec!["defense".to_string()]);
    assert_eq!(rig.cursor.current(), CursorStyle::Pointer);
}

#[test]
fn empty_space_clears_highlight_and_cursor() {
    let rig = globe(fixed_hotspots());
    rig.scene.start();
    aim_at(&rig, Vec3::new(0.0, 1.2, 1.2));
    rig.frames.run_frame(0.0);
    assert_eq!(rig.highlights.active(), vec!["industrial".to_string()]);

    aim_at(&rig, Vec3::new(-1.5, -1.5, 0.0));
    rig.frames.run_frame(16.0);
    assert!(rig.highlights.active().is_empty());
    assert_eq!(rig.cursor.current(), CursorStyle::Default);
    assert_eq!(rig.scene.with_model(|m| m.active()), None);
}

#[test]
fn pointer_outside_surface_hits_nothing() {
    let rig = globe(fixed_hotspots());
    rig.scene.start();
    rig.hub.publish_pointer(Pointer::from_client(5.0, 5.0, 1280.0, 800.0));
    rig.frames.run_frame(0.0);
    assert!(rig.highlights.active().is_empty());
    assert_eq!(rig.highlights.calls(), 1);
    assert_eq!(rig.cursor.changes(), 0);
}

#[test]
fn stop_and_cleanup_restore_default_cursor() {
    let rig = globe(fixed_hotspots());
    rig.scene.start();
    aim_at(&rig, Vec3::new(1.0, -0.5, 1.7));
    rig.frames.run_frame(0.0);
    assert_eq!(rig.cursor.current(), CursorStyle::Pointer);

    rig.scene.stop();
    assert_eq!(rig.cursor.current(), CursorStyle::Default);
    assert!(rig.highlights.active().is_empty());

    rig.scene.start();
    rig.frames.run_frame(16.0);
    assert_eq!(rig.cursor.current(), CursorStyle::Pointer);
    rig.scene.cleanup();
    assert_eq!(rig.cursor.current(), CursorStyle::Default);
}

#[test]
fn nearest_hotspot_wins() {
    let near = Hotspot::fixed("near", Vec3::new(0.0, 0.0, 2.0));
    let far = Hotspot::fixed("far", Vec3::new(0.0, 0.0, -2.0));
    let camera = Camera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, 45.0);
    let ray = camera.ray(Vec2::ZERO);
    assert_eq!(pick(&ray, &[far.clone(), near.clone()]), Some(1));
    assert_eq!(pick(&ray, &[near, far]), Some(0));
    assert_eq!(pick(&camera.ray(Vec2::new(0.9, 0.9)), &fixed_hotspots()), None);
}

#[test]
fn orbiting_hotspot_follows_wall_clock() {
    let mut satellite = Hotspot::orbiting("space", 2.0, 0.3, 1000.0);
    assert!(matches!(satellite.motion, HotspotMotion::Orbit { .. }));
    let start = satellite.position;
    satellite.update(250.0);
    let quarter = satellite.position;
    assert!(start.distance(quarter) > 1.0);
    assert!((quarter.length_squared() - (4.0 + 0.09)).abs() < 1e-4);
    satellite.update(1000.0);
    assert!(satellite.position.distance(start) < 1e-4);

    let mut fixed = Hotspot::fixed("defense", Vec3::X);
    fixed.update(5000.0);
    assert_eq!(fixed.position, Vec3::X);
}

#[test]
fn application_globe_rotates_and_draws_markers() {
    let frames = ManualFrames::new();
    let hub = InputHub::new();
    let cursor: Rc<dyn CursorSink> = RecordingCursor::new();
    let (surface, log) = RecordingSurface::new(rect(600.0, 600.0));
    let scheduler: Rc<dyn FrameScheduler> = frames.clone();
    let scene = SceneHandle::create(GlobeScene::new(None, cursor), surface, scheduler, &hub, Vec::new());
    scene.start();
    frames.run_frames(10);

    assert!(scene.with_model(|m| m.rotation()) > 0.0);
    let ids: Vec<_> = scene.with_model(|m| m.hotspots().iter().map(|h| h.id).collect());
    assert_eq!(ids, vec!["space", "defense", "medical", "industrial"]);
    let markers = log
        .borrow()
        .last_frame
        .iter()
        .filter(|b| b.primitive == Primitive::Points && b.vertices == 1)
        .count();
    assert_eq!(markers, 4);
}
