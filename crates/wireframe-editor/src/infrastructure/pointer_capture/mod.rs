//! Pointer capture for drag and resize gestures.
//!
//! While a gesture is in progress the host UI must keep delivering pointer
//! events to the editor even when the pointer leaves the canvas (on the web
//! this is `setPointerCapture` or window-level listeners).  The session asks
//! for capture when a gesture starts and gives it back when the gesture ends.
//!
//! # Scoped release
//!
//! [`CaptureGuard`] owns one acquisition.  The session stores the guard inside
//! the active gesture, so the capture is released exactly once however the
//! gesture ends: pointer-up, cancel, or the session being dropped.
//!
//! # Testability
//!
//! The [`PointerCapture`] trait lets tests count acquisitions and releases
//! with [`mock::RecordingPointerCapture`].

use std::sync::Arc;

use tracing::trace;

pub mod mock;

/// Host hook for routing all pointer events to the editor during a gesture.
pub trait PointerCapture: Send + Sync {
    /// Starts routing pointer events to the editor.
    fn acquire(&self);
    /// Stops routing pointer events to the editor.
    fn release(&self);
}

/// Capture for headless sessions (CLI replay) where there is no pointer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPointerCapture;

impl PointerCapture for NoopPointerCapture {
    fn acquire(&self) {}

    fn release(&self) {}
}

/// RAII handle for one pointer capture; releases it on drop.
pub struct CaptureGuard {
    capture: Arc<dyn PointerCapture>,
}

impl CaptureGuard {
    pub fn acquire(capture: &Arc<dyn PointerCapture>) -> Self {
        trace!("pointer capture acquired");
        capture.acquire();
        Self {
            capture: Arc::clone(capture),
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        trace!("pointer capture released");
        self.capture.release();
    }
}

impl std::fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CaptureGuard")
    }
}
