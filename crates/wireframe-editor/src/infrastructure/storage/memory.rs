//! In-memory version store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use wireframe_core::{Version, VersionId};

use crate::application::versioning::{StoreError, VersionStore};

/// Keeps versions in a `Vec` for the lifetime of the process.
///
/// `set_unavailable(true)` makes every call fail, which lets callers exercise
/// their error paths without a real backend.
#[derive(Debug, Default)]
pub struct InMemoryVersionStore {
    versions: Mutex<Vec<Version>>,
    unavailable: AtomicBool,
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of everything stored, in append order.
    pub fn versions(&self) -> Vec<Version> {
        self.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Version>>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        self.versions
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl VersionStore for InMemoryVersionStore {
    async fn append(&self, version: Version) -> Result<(), StoreError> {
        let mut versions = self.lock()?;
        if versions.iter().any(|v| v.version() == version.version()) {
            return Err(StoreError::Conflict(version.version()));
        }
        versions.push(version);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Version>, StoreError> {
        Ok(self.lock()?.clone())
    }

    async fn get(&self, id: VersionId) -> Result<Option<Version>, StoreError> {
        Ok(self.lock()?.iter().find(|v| v.id() == id).cloned())
    }
}
