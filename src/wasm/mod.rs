use std::cell::RefCell;

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, PageTransitionEvent, Window};

mod dom;
mod observer;
mod page;
mod render;

pub use dom::{ClassHighlights, DocumentCursor, DomCountdownView};
pub use observer::VisibilityObserver;
pub use render::GlSurface;

thread_local! {
    static PAGE: RefCell<Option<page::Page>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    console_log::init_with_level(level).ok();

    let window = web_sys::window().ok_or("no window")?;
    for listener in watch_page_transitions(&window) {
        listener.forget();
    }
    mount_site()
}

fn persisted(event: &Event) -> bool {
    event
        .dyn_ref::<PageTransitionEvent>()
        .is_some_and(PageTransitionEvent::persisted)
}

/// Tear the site down when the page is really unloaded. A page entering the
/// back/forward cache keeps its mount and resumes as it was; if it was unmounted
/// anyway, a restore mounts it again.
pub fn watch_page_transitions(window: &Window) -> Vec<EventListener> {
    let hide = EventListener::new(window, "pagehide", |event| {
        if !persisted(event) {
            unmount_site();
        }
    });
    let show = EventListener::new(window, "pageshow", |event| {
        if persisted(event) && !is_mounted() {
            if let Err(err) = mount_site() {
                log::warn!("remount after restore failed: {err:?}");
            }
        }
    });
    vec![hide, show]
}

/// Mount every scene, countdown and reveal block found in the document.
/// Mounting again first tears down the previous mount.
#[wasm_bindgen]
pub fn mount_site() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    unmount_site();
    let page = page::Page::mount(&window, &document)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
    Ok(())
}

pub fn is_mounted() -> bool {
    PAGE.with(|slot| slot.borrow().is_some())
}

#[wasm_bindgen]
pub fn unmount_site() {
    let page = PAGE.with(|slot| slot.borrow_mut().take());
    if let Some(page) = page {
        page.unmount();
    }
}
