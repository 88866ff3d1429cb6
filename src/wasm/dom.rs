//! DOM-backed implementations of the core's host traits.

use gloo::render::request_animation_frame;
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::affordance::{CursorSink, CursorStyle, HighlightGroup};
use crate::binder::{IntervalScheduler, TimerHandle};
use crate::countdown::{CountdownView, LegacyUpdate, TickEvent};
use crate::lifecycle::{FrameHandle, FrameScheduler};

pub const ACTIVE_CLASS: &str = "is-active";
pub const VISIBLE_CLASS: &str = "is-visible";
pub const FAILED_CLASS: &str = "is-failed";
pub const HIDDEN_CLASS: &str = "is-hidden";

pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    fn request(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle {
        FrameHandle::new(request_animation_frame(callback))
    }
}

pub struct IntervalTimers;

impl IntervalScheduler for IntervalTimers {
    fn every(&self, period_ms: u32, mut callback: Box<dyn FnMut()>) -> TimerHandle {
        TimerHandle::new(Interval::new(period_ms, move || callback()))
    }
}

/// Writes the cursor style on `<body>`.
pub struct DocumentCursor {
    body: HtmlElement,
}

impl DocumentCursor {
    pub fn new(document: &Document) -> Option<Self> {
        document.body().map(|body| Self { body })
    }
}

impl CursorSink for DocumentCursor {
    fn set_cursor(&self, style: CursorStyle) {
        let css = self.body.style();
        let result = match style {
            CursorStyle::Default => css.remove_property("cursor").map(|_| ()),
            other => css.set_property("cursor", other.as_css()),
        };
        if let Err(err) = result {
            log::warn!("cursor update failed: {err:?}");
        }
    }
}

/// Cursor sink used when the document has no body.
pub struct NoCursor;

impl CursorSink for NoCursor {
    fn set_cursor(&self, _style: CursorStyle) {}
}

pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Elements tagged `data-highlight="<key>"`; the active one carries `is-active`.
pub struct ClassHighlights {
    members: Vec<(String, Element)>,
}

impl ClassHighlights {
    /// `None` when `root` has no tagged elements.
    pub fn within(root: &Element) -> Option<Self> {
        let members: Vec<_> = query_all(root, "[data-highlight]")
            .into_iter()
            .filter_map(|el| el.get_attribute("data-highlight").map(|key| (key, el)))
            .collect();
        (!members.is_empty()).then_some(Self { members })
    }
}

impl HighlightGroup for ClassHighlights {
    fn highlight(&self, key: Option<&str>) {
        for (member, element) in &self.members {
            let on = key == Some(member.as_str());
            let _ = element.class_list().toggle_with_force(ACTIVE_CLASS, on);
        }
    }
}

/// Counter, legacy battery bar and closing line of the countdown section.
pub struct DomCountdownView {
    counter: Option<Element>,
    legacy_bar: Option<HtmlElement>,
    legacy_label: Option<Element>,
    closing: Option<Element>,
}

impl DomCountdownView {
    pub fn within(root: &Element) -> Self {
        Self {
            counter: query(root, "[data-countdown-value]"),
            legacy_bar: query(root, "[data-legacy-bar]").and_then(|el| el.dyn_into().ok()),
            legacy_label: query(root, "[data-legacy-label]"),
            closing: query(root, "[data-closing]"),
        }
    }
}

impl CountdownView for DomCountdownView {
    fn apply(&self, event: &TickEvent) {
        if let Some(counter) = &self.counter {
            counter.set_text_content(Some(&event.label));
        }
        match event.legacy {
            Some(LegacyUpdate::Charge(percent)) => {
                if let Some(bar) = &self.legacy_bar {
                    let _ = bar.style().set_property("width", &format!("{percent}%"));
                }
                if let Some(label) = &self.legacy_label {
                    label.set_text_content(Some(&format!("{percent:.0}%")));
                }
            }
            Some(LegacyUpdate::Failed) => {
                if let Some(bar) = &self.legacy_bar {
                    let _ = bar.style().set_property("width", "0%");
                    let _ = bar.class_list().add_1(FAILED_CLASS);
                }
                if let Some(label) = &self.legacy_label {
                    label.set_text_content(Some("FAILED"));
                    let _ = label.class_list().add_1(FAILED_CLASS);
                }
            }
            None => {}
        }
        if event.finished {
            if let Some(closing) = &self.closing {
                let class_list = closing.class_list();
                let _ = class_list.remove_1(HIDDEN_CLASS);
                let _ = class_list.add_1(VISIBLE_CLASS);
            }
        }
    }
}
