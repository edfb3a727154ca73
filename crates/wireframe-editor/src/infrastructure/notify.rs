//! Notification sink that writes save results to the log.

use tracing::{error, info};

use crate::application::autosave::NotificationSink;

/// Reports autosave outcomes through `tracing`.  Used when no UI toast
/// surface is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "wireframe_editor::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "wireframe_editor::notify", "{message}");
    }
}
