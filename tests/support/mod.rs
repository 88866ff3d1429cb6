#![allow(dead_code)]

//! Hand-driven stand-ins for the browser: frames and timers fire only when a test
//! says so, surfaces and sinks record what they were asked to do.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use altenergy_viz::affordance::{CursorSink, CursorStyle, HighlightGroup};
use altenergy_viz::binder::{IntervalScheduler, TimerHandle};
use altenergy_viz::countdown::{CountdownView, TickEvent};
use altenergy_viz::lifecycle::{FrameHandle, FrameScheduler, Scene};
use altenergy_viz::surface::{Frame, Primitive, Surface, SurfaceRect, SurfaceSize};

type FrameQueue = Rc<RefCell<Vec<(u64, Box<dyn FnOnce(f64)>)>>>;

struct CancelFrame {
    id: u64,
    queue: Weak<RefCell<Vec<(u64, Box<dyn FnOnce(f64)>)>>>,
}

impl Drop for CancelFrame {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[derive(Default)]
pub struct ManualFrames {
    queue: FrameQueue,
    next_id: Cell<u64>,
    requests: Cell<usize>,
}

impl ManualFrames {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    /// Fire every callback queued before this call; returns how many ran.
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(timestamp);
        }
        count
    }

    pub fn run_frames(&self, frames: usize) {
        for i in 0..frames {
            self.run_frame(i as f64 * 16.0);
        }
    }
}

impl FrameScheduler for ManualFrames {
    fn request(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.requests.set(self.requests.get() + 1);
        self.queue.borrow_mut().push((id, callback));
        FrameHandle::new(CancelFrame {
            id,
            queue: Rc::downgrade(&self.queue),
        })
    }
}

type TimerList = Rc<RefCell<Vec<(u64, Rc<RefCell<Box<dyn FnMut()>>>)>>>;

struct CancelTimer {
    id: u64,
    timers: Weak<RefCell<Vec<(u64, Rc<RefCell<Box<dyn FnMut()>>>)>>>,
}

impl Drop for CancelTimer {
    fn drop(&mut self) {
        if let Some(timers) = self.timers.upgrade() {
            timers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[derive(Default)]
pub struct ManualTimers {
    timers: TimerList,
    next_id: Cell<u64>,
    periods: RefCell<Vec<u32>>,
}

impl ManualTimers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn active(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn periods(&self) -> Vec<u32> {
        self.periods.borrow().clone()
    }

    /// One period elapses for every live interval.
    pub fn fire(&self) {
        let due: Vec<_> = self.timers.borrow().iter().map(|(_, cb)| Rc::clone(cb)).collect();
        for callback in due {
            (callback.borrow_mut().as_mut())();
        }
    }

    pub fn fire_n(&self, n: usize) {
        for _ in 0..n {
            self.fire();
        }
    }
}

impl IntervalScheduler for ManualTimers {
    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.periods.borrow_mut().push(period_ms);
        self.timers.borrow_mut().push((id, Rc::new(RefCell::new(callback))));
        TimerHandle::new(CancelTimer {
            id,
            timers: Rc::downgrade(&self.timers),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawnBatch {
    pub primitive: Primitive,
    pub vertices: usize,
    pub color: [f32; 4],
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub bounds: SurfaceRect,
    pub resizes: Vec<SurfaceSize>,
    pub draws: usize,
    pub last_frame: Vec<DrawnBatch>,
    pub releases: usize,
    pub container_empty: bool,
}

pub struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new(bounds: SurfaceRect) -> (Box<dyn Surface>, Rc<RefCell<SurfaceLog>>) {
        let log = Rc::new(RefCell::new(SurfaceLog {
            bounds,
            ..SurfaceLog::default()
        }));
        (Box::new(Self { log: Rc::clone(&log) }), log)
    }
}

impl Surface for RecordingSurface {
    fn bounds(&self) -> SurfaceRect {
        self.log.borrow().bounds
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.log.borrow_mut().resizes.push(size);
    }

    fn draw(&mut self, frame: &Frame<'_>) {
        let mut log = self.log.borrow_mut();
        log.draws += 1;
        log.last_frame = frame
            .batches
            .iter()
            .map(|b| DrawnBatch {
                primitive: b.primitive,
                vertices: b.vertices.len(),
                color: b.color,
            })
            .collect();
    }

    fn release(&mut self) {
        let mut log = self.log.borrow_mut();
        log.releases += 1;
        log.container_empty = true;
    }
}

#[derive(Default)]
pub struct RecordingCursor {
    history: RefCell<Vec<CursorStyle>>,
}

impl RecordingCursor {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn current(&self) -> CursorStyle {
        self.history
            .borrow()
            .last()
            .copied()
            .unwrap_or(CursorStyle::Default)
    }

    pub fn changes(&self) -> usize {
        self.history.borrow().len()
    }
}

impl CursorSink for RecordingCursor {
    fn set_cursor(&self, style: CursorStyle) {
        self.history.borrow_mut().push(style);
    }
}

pub struct RecordingHighlights {
    states: RefCell<BTreeMap<String, bool>>,
    calls: Cell<usize>,
}

impl RecordingHighlights {
    pub fn new(keys: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            states: RefCell::new(keys.iter().map(|k| (k.to_string(), false)).collect()),
            calls: Cell::new(0),
        })
    }

    pub fn active(&self) -> Vec<String> {
        self.states
            .borrow()
            .iter()
            .filter(|(_, on)| **on)
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl HighlightGroup for RecordingHighlights {
    fn highlight(&self, key: Option<&str>) {
        self.calls.set(self.calls.get() + 1);
        for (member, on) in self.states.borrow_mut().iter_mut() {
            *on = key == Some(member.as_str());
        }
    }
}

#[derive(Default)]
pub struct CountingScene {
    pub starts: Cell<usize>,
    pub stops: Cell<usize>,
    pub cleanups: Cell<usize>,
    running: Cell<bool>,
}

impl Scene for CountingScene {
    fn start(&self) {
        self.starts.set(self.starts.get() + 1);
        self.running.set(true);
    }

    fn stop(&self) {
        self.stops.set(self.stops.get() + 1);
        self.running.set(false);
    }

    fn cleanup(&self) {
        self.cleanups.set(self.cleanups.get() + 1);
        self.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }
}

#[derive(Default)]
pub struct RecordingCountdown {
    pub events: RefCell<Vec<TickEvent>>,
}

impl CountdownView for RecordingCountdown {
    fn apply(&self, event: &TickEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

pub fn rect(width: f32, height: f32) -> SurfaceRect {
    SurfaceRect::new(0.0, 0.0, width, height)
}
