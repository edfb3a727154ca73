//! Recording pointer capture for tests.
//!
//! Counts every acquire and release so tests can assert that each gesture
//! releases its capture exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::PointerCapture;

#[derive(Debug, Default)]
pub struct RecordingPointerCapture {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl RecordingPointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Acquisitions not yet released.
    pub fn outstanding(&self) -> usize {
        self.acquired().saturating_sub(self.released())
    }
}

impl PointerCapture for RecordingPointerCapture {
    fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
