//! Visibility bookkeeping shared by every observed section.
//!
//! The browser reports raw intersection samples; these types turn them into the
//! edge-triggered signals the binders act on.

/// Whether a raw intersection sample counts as visible for `threshold`.
pub fn is_visible(intersecting: bool, ratio: f64, threshold: f64) -> bool {
    if !intersecting {
        return false;
    }
    // A zero threshold fires on any overlap, including edge contact.
    threshold <= 0.0 || ratio >= threshold
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Shown,
    Hidden,
}

/// Current visibility of one section. Repeated identical samples are swallowed so
/// observers only see real changes.
#[derive(Debug, Default)]
pub struct VisibilityLatch {
    visible: bool,
}

impl VisibilityLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update(&mut self, visible: bool) -> Option<Transition> {
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        Some(if visible {
            Transition::Shown
        } else {
            Transition::Hidden
        })
    }
}

/// Fires on the first visible sample and never again.
#[derive(Debug, Default)]
pub struct OneShot {
    fired: bool,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn update(&mut self, visible: bool) -> bool {
        if self.fired || !visible {
            return false;
        }
        self.fired = true;
        true
    }
}
