//! Page-wide pointer and resize signals.
//!
//! The wasm glue installs one window listener per signal and publishes into an
//! [`InputHub`]; every scene subscribes to the hub instead of the window. Dropping a
//! [`Subscription`] unsubscribes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

/// Last known pointer position, in client pixels and normalized to the window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub client: Vec2,
    /// Window-relative, x and y in [-1, 1], y pointing up.
    pub normalized: Vec2,
}

impl Pointer {
    pub fn from_client(x: f64, y: f64, window_width: f64, window_height: f64) -> Self {
        let w = window_width.max(1.0);
        let h = window_height.max(1.0);
        Self {
            client: Vec2::new(x as f32, y as f32),
            normalized: Vec2::new((x / w * 2.0 - 1.0) as f32, -(y / h * 2.0 - 1.0) as f32),
        }
    }
}

/// Guard for a registered callback. Dropping it runs the release action once.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Keep an arbitrary guard (e.g. a DOM event listener) alive until dropped.
    pub fn holding<T: 'static>(guard: T) -> Self {
        Self::new(move || drop(guard))
    }

    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

type PointerCallback = Rc<dyn Fn(Pointer)>;
type ResizeCallback = Rc<dyn Fn()>;

#[derive(Default)]
struct HubState {
    next_id: u64,
    pointer: Pointer,
    pointer_subs: Vec<(u64, PointerCallback)>,
    resize_subs: Vec<(u64, ResizeCallback)>,
}

/// Cloneable handle to the shared input state.
#[derive(Clone, Default)]
pub struct InputHub {
    state: Rc<RefCell<HubState>>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> Pointer {
        self.state.borrow().pointer
    }

    pub fn publish_pointer(&self, pointer: Pointer) {
        // Callbacks are cloned out so they may (un)subscribe while running.
        let callbacks: Vec<PointerCallback> = {
            let mut state = self.state.borrow_mut();
            state.pointer = pointer;
            state.pointer_subs.iter().map(|(_, cb)| Rc::clone(cb)).collect()
        };
        for callback in callbacks {
            callback(pointer);
        }
    }

    pub fn publish_resize(&self) {
        let callbacks: Vec<ResizeCallback> = self
            .state
            .borrow()
            .resize_subs
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn on_pointer(&self, callback: impl Fn(Pointer) + 'static) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.take_id();
            state.pointer_subs.push((id, Rc::new(callback)));
            id
        };
        let weak = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().pointer_subs.retain(|(sub, _)| *sub != id);
            }
        })
    }

    pub fn on_resize(&self, callback: impl Fn() + 'static) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.take_id();
            state.resize_subs.push((id, Rc::new(callback)));
            id
        };
        let weak = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().resize_subs.retain(|(sub, _)| *sub != id);
            }
        })
    }

    /// Number of live pointer plus resize subscriptions.
    pub fn listener_count(&self) -> usize {
        let state = self.state.borrow();
        state.pointer_subs.len() + state.resize_subs.len()
    }
}

impl HubState {
    fn take_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Slider position in [0, 100], shared between the DOM listener and a scene.
///
/// A scene mounted without a slider gets a detached value that simply never moves.
#[derive(Clone, Debug)]
pub struct SliderInput {
    value: Rc<Cell<f64>>,
}

impl SliderInput {
    pub fn new(initial: f64) -> Self {
        Self {
            value: Rc::new(Cell::new(clamp_slider(initial))),
        }
    }

    pub fn detached() -> Self {
        Self::new(0.0)
    }

    pub fn set(&self, value: f64) {
        self.value.set(clamp_slider(value));
    }

    pub fn get(&self) -> f64 {
        self.value.get()
    }
}

impl Default for SliderInput {
    fn default() -> Self {
        Self::detached()
    }
}

fn clamp_slider(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
