//! Debounced background saving.
//!
//! The [`Autosaver`] runs one tokio task that watches for layout snapshots.
//! A burst of changes is coalesced: the task waits until no new snapshot has
//! arrived for the debounce interval, then saves only the latest one as an
//! uncommitted version.  Results are reported through a
//! [`NotificationSink`].
//!
//! Snapshots travel over a `watch` channel, so publishing never blocks the
//! editor and never queues more than one pending layout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wireframe_core::Layout;

use crate::application::session::ChangeListener;
use crate::application::versioning::VersionService;

/// Receives user-facing save notifications.
pub trait NotificationSink: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

type Slot = watch::Sender<Option<Arc<Layout>>>;

/// Handle to the background autosave task.
pub struct Autosaver {
    tx: Arc<Slot>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Autosaver {
    /// Starts the autosave task on the current tokio runtime.
    pub fn spawn(
        service: Arc<VersionService>,
        notifier: Arc<dyn NotificationSink>,
        debounce: Duration,
        edited_by: Option<String>,
    ) -> Self {
        let (tx, rx) = watch::channel(None);
        let (stop_tx, stop_rx) = oneshot::channel();
        let worker = Worker {
            service,
            notifier,
            debounce,
            edited_by,
        };
        let task = tokio::spawn(worker.run(rx, stop_rx));
        info!(debounce_ms = debounce.as_millis() as u64, "autosave started");
        Self {
            tx: Arc::new(tx),
            stop: stop_tx,
            task,
        }
    }

    /// Schedules `layout` to be saved once the editor goes quiet.
    pub fn notify(&self, layout: Arc<Layout>) {
        self.tx.send_replace(Some(layout));
    }

    /// A cloneable publisher to register with
    /// [`EditorSession::set_listener`](crate::application::session::EditorSession::set_listener).
    pub fn handle(&self) -> AutosaveHandle {
        AutosaveHandle {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Saves any pending snapshot immediately and stops the task.
    pub async fn shutdown(self) {
        let Autosaver { stop, task, .. } = self;
        let _ = stop.send(());
        if let Err(e) = task.await {
            warn!(error = %e, "autosave task ended abnormally");
        }
    }
}

impl std::fmt::Debug for Autosaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autosaver")
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

/// Publishes session changes to an [`Autosaver`].
#[derive(Clone)]
pub struct AutosaveHandle {
    tx: Arc<Slot>,
}

impl ChangeListener for AutosaveHandle {
    fn layout_changed(&self, layout: Arc<Layout>) {
        self.tx.send_replace(Some(layout));
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

struct Worker {
    service: Arc<VersionService>,
    notifier: Arc<dyn NotificationSink>,
    debounce: Duration,
    edited_by: Option<String>,
}

impl Worker {
    async fn run(self, mut rx: watch::Receiver<Option<Arc<Layout>>>, mut stop: oneshot::Receiver<()>) {
        let mut dirty = false;
        loop {
            if dirty {
                tokio::select! {
                    biased;
                    _ = &mut stop => break,
                    changed = rx.changed() => {
                        // A new snapshot restarts the quiet period.
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(self.debounce) => {
                        self.save_latest(&mut rx).await;
                        dirty = false;
                    }
                }
            } else {
                tokio::select! {
                    biased;
                    _ = &mut stop => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        dirty = true;
                    }
                }
            }
        }

        if dirty || rx.has_changed().unwrap_or(false) {
            debug!("flushing pending autosave");
            self.save_latest(&mut rx).await;
        }
        debug!("autosave stopped");
    }

    async fn save_latest(&self, rx: &mut watch::Receiver<Option<Arc<Layout>>>) {
        let Some(layout) = rx.borrow_and_update().clone() else {
            return;
        };
        match self.service.save(&layout, false, self.edited_by.as_deref()).await {
            Ok(version) => {
                debug!(version = version.version(), "autosaved");
                self.notifier
                    .success(&format!("Autosaved as version {}", version.version()));
            }
            Err(e) => {
                warn!(error = %e, "autosave failed");
                self.notifier.error(&format!("Autosave failed: {e}"));
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
