//! Glue between visibility samples and the things they switch on.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::countdown::{CountdownView, Phase, TimedSequence};
use crate::lifecycle::Scene;
use crate::visibility::{OneShot, Transition, VisibilityLatch};

/// Starts a scene while its section is visible and stops it otherwise.
pub struct ActivationBinder {
    scene: Rc<dyn Scene>,
    latch: RefCell<VisibilityLatch>,
}

impl ActivationBinder {
    pub fn new(scene: Rc<dyn Scene>) -> Self {
        Self {
            scene,
            latch: RefCell::new(VisibilityLatch::new()),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.latch.borrow().is_visible()
    }

    pub fn observe(&self, visible: bool) {
        let transition = self.latch.borrow_mut().update(visible);
        match transition {
            Some(Transition::Shown) => self.scene.start(),
            Some(Transition::Hidden) => self.scene.stop(),
            None => {}
        }
    }

    /// Section unmounted: tear the scene down for good.
    pub fn release(&self) {
        self.scene.cleanup();
    }
}

impl Drop for ActivationBinder {
    fn drop(&mut self) {
        self.release();
    }
}

/// A running interval. Dropping it clears the interval.
pub struct TimerHandle {
    _guard: Box<dyn Any>,
}

impl TimerHandle {
    pub fn new<T: 'static>(guard: T) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

/// Wall-clock repeating timer (`setInterval` in the browser).
pub trait IntervalScheduler {
    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle;
}

struct CountdownState {
    sequence: RefCell<TimedSequence>,
    trigger: RefCell<OneShot>,
    timer: RefCell<Option<TimerHandle>>,
    view: Rc<dyn CountdownView>,
    timers: Rc<dyn IntervalScheduler>,
}

/// Runs the countdown once, the first time its section becomes visible.
pub struct CountdownTrigger {
    state: Rc<CountdownState>,
}

impl CountdownTrigger {
    pub fn new(
        sequence: TimedSequence,
        view: Rc<dyn CountdownView>,
        timers: Rc<dyn IntervalScheduler>,
    ) -> Self {
        Self {
            state: Rc::new(CountdownState {
                sequence: RefCell::new(sequence),
                trigger: RefCell::new(OneShot::new()),
                timer: RefCell::new(None),
                view,
                timers,
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.sequence.borrow().phase()
    }

    pub fn is_ticking(&self) -> bool {
        self.state.timer.borrow().is_some()
    }

    pub fn observe(&self, visible: bool) {
        if !self.state.trigger.borrow_mut().update(visible) {
            return;
        }
        let period = {
            let mut sequence = self.state.sequence.borrow_mut();
            if !sequence.start() {
                return;
            }
            sequence.period_ms()
        };
        log::debug!("countdown started, {period}ms per tick");
        let weak: Weak<CountdownState> = Rc::downgrade(&self.state);
        let handle = self.state.timers.every(
            period,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.on_tick();
                }
            }),
        );
        *self.state.timer.borrow_mut() = Some(handle);
    }

    /// Section unmounted: clear the pending interval, if any.
    pub fn cancel(&self) {
        if self.state.timer.borrow_mut().take().is_some() {
            log::debug!("countdown canceled at {}", self.state.sequence.borrow().counter());
        }
    }
}

impl Drop for CountdownTrigger {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl CountdownState {
    fn on_tick(&self) {
        let event = self.sequence.borrow_mut().tick();
        match event {
            Some(event) => {
                self.view.apply(&event);
                if event.finished {
                    self.timer.borrow_mut().take();
                    log::debug!("countdown finished");
                }
            }
            None => {
                self.timer.borrow_mut().take();
            }
        }
    }
}

/// Reveal-on-scroll: runs its action the first time the block is visible.
pub struct RevealTrigger {
    shot: RefCell<OneShot>,
    reveal: Box<dyn Fn()>,
}

impl RevealTrigger {
    pub fn new(reveal: impl Fn() + 'static) -> Self {
        Self {
            shot: RefCell::new(OneShot::new()),
            reveal: Box::new(reveal),
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.shot.borrow().has_fired()
    }

    pub fn observe(&self, visible: bool) {
        let fire = self.shot.borrow_mut().update(visible);
        if fire {
            (self.reveal)();
        }
    }
}
