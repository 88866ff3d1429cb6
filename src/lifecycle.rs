//! The start/stop/cleanup contract shared by every animated scene.
//!
//! A [`SceneHandle`] couples one [`SceneModel`] (what to animate) with one
//! [`Surface`] (where to draw) and drives it from a self-rescheduling frame loop.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::input::{InputHub, Pointer, Subscription};
use crate::surface::{Surface, SurfaceRect, SurfaceSize};

/// A pending animation-frame request. Dropping it cancels the request.
pub struct FrameHandle {
    _guard: Box<dyn Any>,
}

impl FrameHandle {
    pub fn new<T: 'static>(guard: T) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

/// Source of display-refresh callbacks (`requestAnimationFrame` in the browser).
pub trait FrameScheduler {
    /// Run `callback` once on the next frame with a millisecond timestamp.
    fn request(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle;
}

/// Everything a model may read while advancing one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    /// Frames rendered so far by this handle, starting at 1.
    pub tick: u64,
    /// Wall-clock timestamp of the frame in milliseconds.
    pub timestamp: f64,
    pub pointer: Pointer,
    pub bounds: SurfaceRect,
}

/// Per-variant animation state.
pub trait SceneModel: 'static {
    fn name(&self) -> &'static str;
    fn resize(&mut self, size: SurfaceSize);
    fn advance(&mut self, input: &FrameInput);
    fn render(&self, surface: &mut dyn Surface);
    /// Undo anything that only makes sense while the scene is animating.
    fn deactivate(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Disposed,
}

/// Capability set the activation binder drives.
pub trait Scene {
    fn start(&self);
    fn stop(&self);
    /// Terminal. Later calls to any method are no-ops.
    fn cleanup(&self);
    fn is_running(&self) -> bool;
}

struct Controller<M: SceneModel> {
    model: RefCell<M>,
    surface: RefCell<Box<dyn Surface>>,
    frames: Rc<dyn FrameScheduler>,
    phase: Cell<Phase>,
    pending: RefCell<Option<FrameHandle>>,
    pointer: Cell<Pointer>,
    size: Cell<SurfaceSize>,
    tick: Cell<u64>,
    subscriptions: RefCell<Vec<Subscription>>,
}

pub struct SceneHandle<M: SceneModel> {
    inner: Rc<Controller<M>>,
}

impl<M: SceneModel> SceneHandle<M> {
    /// Size the surface to its container and subscribe to pointer and resize input.
    /// `aux` keeps auxiliary-control listeners alive until cleanup. Nothing renders
    /// until [`Scene::start`].
    pub fn create(
        mut model: M,
        mut surface: Box<dyn Surface>,
        frames: Rc<dyn FrameScheduler>,
        input: &InputHub,
        aux: Vec<Subscription>,
    ) -> Self {
        let size = surface.bounds().size();
        if size.is_degenerate() {
            log::debug!("{} container has no layout yet, waiting for resize", model.name());
        }
        surface.resize(size);
        model.resize(size);

        let inner = Rc::new(Controller {
            model: RefCell::new(model),
            surface: RefCell::new(surface),
            frames,
            phase: Cell::new(Phase::Idle),
            pending: RefCell::new(None),
            pointer: Cell::new(input.pointer()),
            size: Cell::new(size),
            tick: Cell::new(0),
            subscriptions: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&inner);
        let pointer = input.on_pointer(move |p| {
            if let Some(controller) = weak.upgrade() {
                controller.pointer.set(p);
            }
        });
        let weak = Rc::downgrade(&inner);
        let resize = input.on_resize(move || {
            if let Some(controller) = weak.upgrade() {
                controller.handle_resize();
            }
        });
        {
            let mut subs = inner.subscriptions.borrow_mut();
            subs.push(pointer);
            subs.push(resize);
            subs.extend(aux);
        }

        Self { inner }
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    pub fn size(&self) -> SurfaceSize {
        self.inner.size.get()
    }

    /// Frames rendered since creation.
    pub fn ticks(&self) -> u64 {
        self.inner.tick.get()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    pub fn with_model<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.inner.model.borrow())
    }
}

impl<M: SceneModel> Scene for SceneHandle<M> {
    fn start(&self) {
        if self.inner.phase.get() != Phase::Idle {
            return;
        }
        self.inner.phase.set(Phase::Running);
        log::debug!("{} scene started", self.inner.model.borrow().name());
        Controller::schedule(&self.inner);
    }

    fn stop(&self) {
        if self.inner.phase.get() != Phase::Running {
            return;
        }
        self.inner.phase.set(Phase::Idle);
        self.inner.pending.borrow_mut().take();
        let mut model = self.inner.model.borrow_mut();
        model.deactivate();
        log::debug!("{} scene stopped", model.name());
    }

    fn cleanup(&self) {
        let inner = &self.inner;
        if inner.phase.get() == Phase::Disposed {
            return;
        }
        inner.phase.set(Phase::Disposed);
        inner.pending.borrow_mut().take();
        inner.model.borrow_mut().deactivate();
        let subscriptions = std::mem::take(&mut *inner.subscriptions.borrow_mut());
        drop(subscriptions);
        inner.surface.borrow_mut().release();
        log::debug!("{} scene disposed", inner.model.borrow().name());
    }

    fn is_running(&self) -> bool {
        self.inner.phase.get() == Phase::Running
    }
}

impl<M: SceneModel> Controller<M> {
    fn schedule(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let handle = this.frames.request(Box::new(move |timestamp| {
            if let Some(controller) = weak.upgrade() {
                Controller::on_frame(&controller, timestamp);
            }
        }));
        *this.pending.borrow_mut() = Some(handle);
    }

    fn on_frame(this: &Rc<Self>, timestamp: f64) {
        // The request that just fired is spent.
        this.pending.borrow_mut().take();
        if this.phase.get() != Phase::Running {
            return;
        }
        Self::schedule(this);

        let tick = this.tick.get() + 1;
        this.tick.set(tick);
        let input = FrameInput {
            tick,
            timestamp,
            pointer: this.pointer.get(),
            bounds: this.surface.borrow().bounds(),
        };
        let mut model = this.model.borrow_mut();
        model.advance(&input);
        let mut surface = this.surface.borrow_mut();
        model.render(surface.as_mut());
    }

    fn handle_resize(&self) {
        if self.phase.get() == Phase::Disposed {
            return;
        }
        let size = self.surface.borrow().bounds().size();
        if size == self.size.get() {
            return;
        }
        self.size.set(size);
        self.surface.borrow_mut().resize(size);
        self.model.borrow_mut().resize(size);
    }
}

impl<M: SceneModel> Drop for Controller<M> {
    fn drop(&mut self) {
        if self.phase.get() != Phase::Disposed {
            self.pending.get_mut().take();
            self.model.get_mut().deactivate();
            self.surface.get_mut().release();
        }
    }
}
