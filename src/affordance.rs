//! Side effects a scene pushes out to the page: cursor style and highlight groups.

use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Pointer,
}

impl CursorStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorStyle::Default => "",
            CursorStyle::Pointer => "pointer",
        }
    }
}

/// The document-wide cursor, the one piece of state scenes share.
pub trait CursorSink {
    fn set_cursor(&self, style: CursorStyle);
}

/// Scoped hold on the pointer cursor. Released explicitly or on drop; releasing
/// always restores the default style.
pub struct PointerAffordance {
    sink: Rc<dyn CursorSink>,
    held: bool,
}

impl PointerAffordance {
    pub fn new(sink: Rc<dyn CursorSink>) -> Self {
        Self { sink, held: false }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn acquire(&mut self) {
        if !self.held {
            self.held = true;
            self.sink.set_cursor(CursorStyle::Pointer);
        }
    }

    pub fn release(&mut self) {
        if self.held {
            self.held = false;
            self.sink.set_cursor(CursorStyle::Default);
        }
    }

    pub fn set(&mut self, hovering: bool) {
        if hovering {
            self.acquire();
        } else {
            self.release();
        }
    }
}

impl Drop for PointerAffordance {
    fn drop(&mut self) {
        self.release();
    }
}

/// A set of named page elements of which at most one is highlighted.
pub trait HighlightGroup {
    /// Mark `key` active and every other member inactive; `None` clears all.
    fn highlight(&self, key: Option<&str>);
}

/// Pushes highlight changes to a group only when the active key changes.
pub struct Highlighter {
    group: Option<Rc<dyn HighlightGroup>>,
    current: Option<Option<String>>,
}

impl Highlighter {
    pub fn new(group: Option<Rc<dyn HighlightGroup>>) -> Self {
        Self {
            group,
            current: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.current.as_ref().and_then(|key| key.as_deref())
    }

    pub fn set(&mut self, key: Option<&str>) {
        if let Some(current) = &self.current {
            if current.as_deref() == key {
                return;
            }
        }
        self.current = Some(key.map(str::to_string));
        if let Some(group) = &self.group {
            group.highlight(key);
        }
    }
}
