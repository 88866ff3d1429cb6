//! The "years of output" counter in the advantage section.
//!
//! A pure state machine: the binder feeds it timer ticks and hands each
//! [`TickEvent`] to a [`CountdownView`] that owns the DOM.

use crate::config::CountdownConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running { counter: u32 },
    Done,
}

/// What happens to the chemical-battery comparison bar on a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LegacyUpdate {
    /// Remaining charge in percent.
    Charge(f64),
    /// Drained for good. Sent once; the bar is never touched again.
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickEvent {
    pub counter: u32,
    /// Counter text, zero-padded to two digits.
    pub label: String,
    pub legacy: Option<LegacyUpdate>,
    /// Last tick: stop the timer and show the closing message.
    pub finished: bool,
}

pub fn format_counter(counter: u32) -> String {
    format!("{counter:02}")
}

#[derive(Debug)]
pub struct TimedSequence {
    config: CountdownConfig,
    phase: Phase,
}

impl TimedSequence {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn counter(&self) -> u32 {
        match self.phase {
            Phase::Idle => 0,
            Phase::Running { counter } => counter,
            Phase::Done => self.config.final_tick,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.config.period_ms
    }

    /// Leave `Idle`. Returns false if the sequence already started, ever.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Running { counter: 0 };
        true
    }

    /// Advance one tick. Outside `Running` this yields nothing.
    pub fn tick(&mut self) -> Option<TickEvent> {
        let Phase::Running { counter } = self.phase else {
            return None;
        };
        let counter = counter + 1;
        let finished = counter >= self.config.final_tick;
        self.phase = if finished {
            Phase::Done
        } else {
            Phase::Running { counter }
        };
        Some(TickEvent {
            counter,
            label: format_counter(counter),
            legacy: self.legacy_at(counter),
            finished,
        })
    }

    fn legacy_at(&self, counter: u32) -> Option<LegacyUpdate> {
        let CountdownConfig {
            legacy_ticks,
            legacy_start,
            legacy_step,
            ..
        } = self.config;
        if counter <= legacy_ticks {
            let remaining = legacy_start.saturating_sub(legacy_step.saturating_mul(counter));
            Some(LegacyUpdate::Charge(f64::from(remaining)))
        } else if counter == legacy_ticks + 1 {
            Some(LegacyUpdate::Failed)
        } else {
            None
        }
    }
}

impl Default for TimedSequence {
    fn default() -> Self {
        Self::new(CountdownConfig::default())
    }
}

/// Presentation side of the countdown.
pub trait CountdownView {
    fn apply(&self, event: &TickEvent);
}
