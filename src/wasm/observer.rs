use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::ObserverConfig;
use crate::error::Result;
use crate::visibility::is_visible;

type Callback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// One IntersectionObserver watching one element. Disconnects on drop.
pub struct VisibilityObserver {
    observer: IntersectionObserver,
    connected: Rc<Cell<bool>>,
    _callback: Callback,
}

impl VisibilityObserver {
    pub fn observe(
        target: &Element,
        config: &ObserverConfig,
        mut on_change: impl FnMut(bool) + 'static,
    ) -> Result<Self> {
        Self::observe_until(target, config, move |visible| {
            on_change(visible);
            true
        })
    }

    /// Like [`observe`](Self::observe), but disconnects as soon as `on_change`
    /// returns false.
    pub fn observe_until(
        target: &Element,
        config: &ObserverConfig,
        mut on_change: impl FnMut(bool) -> bool + 'static,
    ) -> Result<Self> {
        let threshold = config.threshold;
        let connected = Rc::new(Cell::new(true));
        let flag = Rc::clone(&connected);
        let callback: Callback = Closure::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                if !flag.get() {
                    return;
                }
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let keep = on_change(is_visible(
                    entry.is_intersecting(),
                    entry.intersection_ratio(),
                    threshold,
                ));
                if !keep {
                    observer.disconnect();
                    flag.set(false);
                }
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        if !config.root_margin.is_empty() {
            init.set_root_margin(&config.root_margin);
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        observer.observe(target);
        Ok(Self {
            observer,
            connected,
            _callback: callback,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        if self.connected.replace(false) {
            self.observer.disconnect();
        }
    }
}
