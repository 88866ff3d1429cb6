//! Finds the mount points in the static page and wires every section up.
//!
//! Markup contract:
//! - `[data-scene="orbital|exploded|globe"]`: scene container; the enclosing
//!   `<section>` is observed. `[data-slider]` and `[data-highlight]` inside that
//!   section are the auxiliary controls.
//! - `[data-countdown]`: countdown section.
//! - `[data-reveal]`: fade-in block, optional `data-reveal-delay` in seconds.
//!
//! Any section may carry `data-threshold` / `data-root-margin` overrides.

use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, MouseEvent, Window};

use super::dom::{
    query, query_all, ClassHighlights, DocumentCursor, DomCountdownView, IntervalTimers,
    NoCursor, RafScheduler, VISIBLE_CLASS,
};
use super::observer::VisibilityObserver;
use super::render::GlSurface;
use crate::affordance::{CursorSink, HighlightGroup};
use crate::binder::{ActivationBinder, CountdownTrigger, RevealTrigger};
use crate::config::{CountdownConfig, ObserverConfig};
use crate::countdown::TimedSequence;
use crate::error::{Result, SiteError};
use crate::input::{InputHub, Pointer, SliderInput, Subscription};
use crate::lifecycle::{FrameScheduler, Scene, SceneHandle};
use crate::scenes::{ExplodedScene, GlobeScene, OrbitalScene};

struct MountedScene {
    observer: Option<VisibilityObserver>,
    binder: Rc<ActivationBinder>,
}

struct MountedCountdown {
    observer: Option<VisibilityObserver>,
    trigger: Rc<CountdownTrigger>,
}

struct MountedReveal {
    _observer: VisibilityObserver,
}

pub struct Page {
    _window_listeners: Vec<EventListener>,
    scenes: Vec<MountedScene>,
    countdowns: Vec<MountedCountdown>,
    reveals: Vec<MountedReveal>,
}

impl Page {
    pub fn mount(window: &Window, document: &Document) -> Result<Self> {
        let root = document
            .document_element()
            .ok_or_else(|| SiteError::MissingElement("<html>".into()))?;
        let input = InputHub::new();
        let frames: Rc<dyn FrameScheduler> = Rc::new(RafScheduler);
        let cursor: Rc<dyn CursorSink> = match DocumentCursor::new(document) {
            Some(cursor) => Rc::new(cursor),
            None => Rc::new(NoCursor),
        };

        let mut scenes = Vec::new();
        for container in query_all(&root, "[data-scene]") {
            match mount_scene(document, &container, &input, &frames, &cursor) {
                Ok(scene) => scenes.push(scene),
                Err(err) => log::warn!("scene #{} not mounted: {err}", container.id()),
            }
        }

        let mut countdowns = Vec::new();
        for section in query_all(&root, "[data-countdown]") {
            match mount_countdown(&section) {
                Ok(countdown) => countdowns.push(countdown),
                Err(err) => log::warn!("countdown #{} not mounted: {err}", section.id()),
            }
        }

        let mut reveals = Vec::new();
        for block in query_all(&root, "[data-reveal]") {
            match mount_reveal(&block) {
                Ok(reveal) => reveals.push(reveal),
                Err(err) => log::warn!("reveal block not mounted: {err}"),
            }
        }

        log::info!(
            "mounted {} scenes, {} countdowns, {} reveal blocks",
            scenes.len(),
            countdowns.len(),
            reveals.len()
        );

        Ok(Self {
            _window_listeners: window_listeners(window, &input),
            scenes,
            countdowns,
            reveals,
        })
    }

    /// Tear everything down: observers first so no sample arrives mid-cleanup.
    pub fn unmount(mut self) {
        for scene in &mut self.scenes {
            scene.observer.take();
            scene.binder.release();
        }
        for countdown in &mut self.countdowns {
            countdown.observer.take();
            countdown.trigger.cancel();
        }
        self.reveals.clear();
        log::info!("site unmounted");
    }
}

/// The only window-level pointer and resize listeners on the page.
fn window_listeners(window: &Window, input: &InputHub) -> Vec<EventListener> {
    let hub = input.clone();
    let win = window.clone();
    let pointer = EventListener::new(window, "pointermove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let (w, h) = window_size(&win);
        hub.publish_pointer(Pointer::from_client(
            event.client_x() as f64,
            event.client_y() as f64,
            w,
            h,
        ));
    });
    let hub = input.clone();
    let resize = EventListener::new(window, "resize", move |_| hub.publish_resize());
    vec![pointer, resize]
}

fn window_size(window: &Window) -> (f64, f64) {
    let read = |v: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0)
    };
    (read(window.inner_width()), read(window.inner_height()))
}

/// The element whose visibility drives `element`: its enclosing section, or itself.
fn section_of(element: &Element) -> Element {
    element
        .closest("section")
        .ok()
        .flatten()
        .unwrap_or_else(|| element.clone())
}

fn observer_config(section: &Element, preset: ObserverConfig) -> ObserverConfig {
    preset.with_overrides(
        section.get_attribute("data-threshold").as_deref(),
        section.get_attribute("data-root-margin").as_deref(),
    )
}

fn mount_scene(
    document: &Document,
    container: &Element,
    input: &InputHub,
    frames: &Rc<dyn FrameScheduler>,
    cursor: &Rc<dyn CursorSink>,
) -> Result<MountedScene> {
    let kind = container.get_attribute("data-scene").unwrap_or_default();
    let section = section_of(container);
    let element: HtmlElement = container
        .clone()
        .dyn_into()
        .map_err(|_| SiteError::MissingElement("scene container".into()))?;
    let highlights = ClassHighlights::within(&section).map(|h| Rc::new(h) as Rc<dyn HighlightGroup>);

    let scene: Rc<dyn Scene> = match kind.as_str() {
        "orbital" => {
            let surface = Box::new(GlSurface::new(document, element)?);
            Rc::new(SceneHandle::create(
                OrbitalScene::new(),
                surface,
                Rc::clone(frames),
                input,
                Vec::new(),
            ))
        }
        "exploded" => {
            let (slider, listener) = slider_input(&section);
            let surface = Box::new(GlSurface::new(document, element)?);
            Rc::new(SceneHandle::create(
                ExplodedScene::new(slider, highlights),
                surface,
                Rc::clone(frames),
                input,
                listener.into_iter().collect(),
            ))
        }
        "globe" => {
            let surface = Box::new(GlSurface::new(document, element)?);
            Rc::new(SceneHandle::create(
                GlobeScene::new(highlights, Rc::clone(cursor)),
                surface,
                Rc::clone(frames),
                input,
                Vec::new(),
            ))
        }
        other => return Err(SiteError::UnknownScene(other.to_string())),
    };

    let binder = Rc::new(ActivationBinder::new(scene));
    let config = observer_config(&section, ObserverConfig::ambient());
    let observer = {
        let binder = Rc::clone(&binder);
        VisibilityObserver::observe(&section, &config, move |visible| binder.observe(visible))?
    };
    Ok(MountedScene {
        observer: Some(observer),
        binder,
    })
}

/// Slider value plus the listener feeding it. A page without a slider gets a
/// detached value and no listener.
fn slider_input(section: &Element) -> (SliderInput, Option<Subscription>) {
    let Some(slider) = query(section, "[data-slider]")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        log::debug!("exploded scene has no slider, staying exploded");
        return (SliderInput::detached(), None);
    };
    let value = SliderInput::new(slider.value_as_number());
    let shared = value.clone();
    let source = slider.clone();
    let listener = EventListener::new(&slider, "input", move |_| {
        shared.set(source.value_as_number());
    });
    (value, Some(Subscription::holding(listener)))
}

fn mount_countdown(section: &Element) -> Result<MountedCountdown> {
    let view = Rc::new(DomCountdownView::within(section));
    let trigger = Rc::new(CountdownTrigger::new(
        TimedSequence::new(CountdownConfig::default()),
        view,
        Rc::new(IntervalTimers),
    ));
    let config = observer_config(section, ObserverConfig::countdown());
    let observer = {
        let trigger = Rc::clone(&trigger);
        VisibilityObserver::observe(section, &config, move |visible| trigger.observe(visible))?
    };
    Ok(MountedCountdown {
        observer: Some(observer),
        trigger,
    })
}

fn mount_reveal(block: &Element) -> Result<MountedReveal> {
    if let Some(delay) = block
        .get_attribute("data-reveal-delay")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
    {
        if let Some(html) = block.dyn_ref::<HtmlElement>() {
            let _ = html
                .style()
                .set_property("transition-delay", &format!("{delay}s"));
        }
    }
    let target = block.clone();
    let trigger = RevealTrigger::new(move || {
        let _ = target.class_list().add_1(VISIBLE_CLASS);
    });
    let config = observer_config(block, ObserverConfig::reveal());
    let observer = VisibilityObserver::observe_until(block, &config, move |visible| {
        trigger.observe(visible);
        !trigger.is_revealed()
    })?;
    Ok(MountedReveal {
        _observer: observer,
    })
}
