//! Announcement port.
//!
//! The engine talks to text-to-speech through this narrow interface.
//! Calls are fire-and-forget: an announcer must not block the tick
//! loop or surface failures into engine state.

/// A sink for spoken alerts.
pub trait Announcer {
    fn announce(&self, text: &str);
}

/// Announcer that discards everything. Useful for headless runs.
#[derive(Debug, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&self, _text: &str) {}
}

/// Announcer that records every announcement, for tests.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    texts: std::cell::RefCell<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.borrow().clone()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, text: &str) {
        self.texts.borrow_mut().push(text.to_string());
    }
}
