//! Persistence of layout versions.
//!
//! Every save appends an immutable [`Version`] snapshot whose number is one
//! greater than the latest stored version.  Numbers are allocated under a
//! lock, so two concurrent saves never receive the same number, and a save
//! the store rejects does not consume one.
//!
//! The storage backend sits behind the [`VersionStore`] trait.  The editor
//! ships an in-memory store
//! ([`InMemoryVersionStore`](crate::infrastructure::storage::memory::InMemoryVersionStore));
//! a networked backend implements the same trait.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use wireframe_core::{Layout, LayoutError, Version, VersionId};

use crate::application::session::{EditorError, EditorSession};

// ── Store trait ───────────────────────────────────────────────────────────────

/// Errors reported by a storage backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("version {0} already exists")]
    Conflict(u64),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Append-only storage of layout versions.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Stores `version`.  Must fail with [`StoreError::Conflict`] if its
    /// number is already taken.
    async fn append(&self, version: Version) -> Result<(), StoreError>;

    /// All stored versions, oldest first.
    async fn list(&self) -> Result<Vec<Version>, StoreError>;

    async fn get(&self, id: VersionId) -> Result<Option<Version>, StoreError>;

    /// The version with the highest number.
    async fn latest(&self) -> Result<Option<Version>, StoreError> {
        Ok(self.list().await?.into_iter().max_by_key(Version::version))
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

/// Error type for save and restore.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PersistError {
    #[error("layout rejected: {0}")]
    Validation(LayoutError),

    #[error("version {0} not found")]
    NotFound(VersionId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("pending edit could not be committed: {0}")]
    Edit(#[from] EditorError),
}

/// Saves, lists and restores versions through a [`VersionStore`].
pub struct VersionService {
    store: Arc<dyn VersionStore>,
    /// Serialises number allocation with the append that uses it.
    save_lock: Mutex<()>,
}

impl VersionService {
    pub fn new(store: Arc<dyn VersionStore>) -> Self {
        Self {
            store,
            save_lock: Mutex::new(()),
        }
    }

    /// Validates `layout` and appends it as the next version.
    ///
    /// `commit` marks an explicit save; autosaves pass `false`.  The stored
    /// layout's metadata carries the new number, timestamp and editor.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Validation`] if the layout is empty or has duplicate ids.
    /// - [`PersistError::Store`] if the backend fails.  No number is consumed.
    pub async fn save(
        &self,
        layout: &Layout,
        commit: bool,
        edited_by: Option<&str>,
    ) -> Result<Version, PersistError> {
        layout.validate().map_err(PersistError::Validation)?;

        let _guard = self.save_lock.lock().await;
        let next = self
            .store
            .latest()
            .await?
            .map_or(1, |latest| latest.version() + 1);

        let mut stamped = layout.clone();
        stamped.touch(edited_by);
        stamped.meta_mut().version = next;

        let version = Version::new(next, stamped, edited_by.map(str::to_string), commit);
        if let Err(e) = self.store.append(version.clone()).await {
            warn!(version = next, error = %e, "save failed");
            return Err(e.into());
        }

        info!(
            version = next,
            id = %version.id(),
            commit,
            elements = version.layout().len(),
            "saved layout version"
        );
        Ok(version)
    }

    pub async fn list_versions(&self) -> Result<Vec<Version>, PersistError> {
        let mut versions = self.store.list().await?;
        versions.sort_by_key(Version::version);
        Ok(versions)
    }

    pub async fn latest(&self) -> Result<Option<Version>, PersistError> {
        Ok(self.store.latest().await?)
    }

    /// Loads the layout stored under `id`.  Applying it to a session is the
    /// caller's job (see [`EditorSession::restore`]).
    pub async fn restore(&self, id: VersionId) -> Result<Layout, PersistError> {
        let version = self.store.get(id).await?.ok_or(PersistError::NotFound(id))?;
        info!(version = version.version(), %id, "loaded version for restore");
        Ok(version.into_layout())
    }
}

impl std::fmt::Debug for VersionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionService").finish_non_exhaustive()
    }
}

/// Ends an edit session with an explicit save.
///
/// A text edit still in progress is saved with the layout and committed
/// into the session once the save succeeds; on failure the session is left
/// exactly as it was.  On success the session adopts the stamped metadata,
/// so its layout reports the saved version number.
pub async fn finish_session(
    session: &mut EditorSession,
    service: &VersionService,
    edited_by: Option<&str>,
) -> Result<Version, PersistError> {
    let layout = session.snapshot_with_pending_text()?;
    let version = service.save(&layout, true, edited_by).await?;
    if let Some(text) = session.text_buffer().map(str::to_string) {
        session.commit_text_edit(text)?;
    }
    session.mark_saved(&version);
    Ok(version)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;
    use wireframe_core::templates;
    use wireframe_core::{AspectRatio, LayoutType};

    // ── Test doubles ──────────────────────────────────────────────────────────

    /// Store that records appended versions and can be told to fail.
    #[derive(Default)]
    struct RecordingStore {
        versions: StdMutex<Vec<Version>>,
        fail_next: AtomicBool,
    }

    #[async_trait]
    impl VersionStore for RecordingStore {
        async fn append(&self, version: Version) -> Result<(), StoreError> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk full".to_string()));
            }
            let mut versions = self.versions.lock().unwrap();
            if versions.iter().any(|v| v.version() == version.version()) {
                return Err(StoreError::Conflict(version.version()));
            }
            versions.push(version);
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Version>, StoreError> {
            Ok(self.versions.lock().unwrap().clone())
        }

        async fn get(&self, id: VersionId) -> Result<Option<Version>, StoreError> {
            Ok(self.versions.lock().unwrap().iter().find(|v| v.id() == id).cloned())
        }
    }

    fn make_service() -> (VersionService, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::default());
        (VersionService::new(store.clone()), store)
    }

    fn make_layout() -> Layout {
        templates::generate(LayoutType::Default, AspectRatio::Square, None)
    }

    // ── save ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_save_numbers_versions_from_one() {
        let (service, _) = make_service();
        let layout = make_layout();

        let first = service.save(&layout, false, None).await.unwrap();
        let second = service.save(&layout, true, Some("ana")).await.unwrap();

        assert_eq!(first.version(), 1);
        assert_eq!(second.version(), 2);
        assert!(!first.is_committed());
        assert!(second.is_committed());
        assert_eq!(second.layout().meta().version, 2);
        assert_eq!(second.layout().meta().last_edited_by.as_deref(), Some("ana"));
        assert_eq!(second.created_by(), Some("ana"));
    }

    #[tokio::test]
    async fn test_failed_append_does_not_consume_a_number() {
        // Arrange
        let (service, store) = make_service();
        let layout = make_layout();
        service.save(&layout, false, None).await.unwrap();
        store.fail_next.store(true, Ordering::SeqCst);

        // Act
        let failed = service.save(&layout, false, None).await;
        let next = service.save(&layout, false, None).await.unwrap();

        // Assert
        assert!(matches!(failed, Err(PersistError::Store(StoreError::Unavailable(_)))));
        assert_eq!(next.version(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_saves_get_distinct_numbers() {
        let (service, store) = make_service();
        let service = Arc::new(service);
        let layout = make_layout();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            let layout = layout.clone();
            tasks.push(tokio::spawn(async move { service.save(&layout, false, None).await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut numbers: Vec<u64> = store.versions.lock().unwrap().iter().map(Version::version).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_save_does_not_modify_caller_layout() {
        let (service, _) = make_service();
        let layout = make_layout();

        service.save(&layout, true, Some("ana")).await.unwrap();

        assert_eq!(layout.meta().version, 0);
        assert_eq!(layout.meta().last_edited_by, None);
    }

    // ── restore ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_restore_returns_stored_layout() {
        let (service, _) = make_service();
        let saved = service.save(&make_layout(), true, None).await.unwrap();

        let restored = service.restore(saved.id()).await.unwrap();

        assert_eq!(&restored, saved.layout());
    }

    #[tokio::test]
    async fn test_restore_unknown_id_is_not_found() {
        let (service, _) = make_service();
        let id = VersionId::new_v4();

        let result = service.restore(id).await;

        assert_eq!(result, Err(PersistError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_list_versions_is_ordered() {
        let (service, _) = make_service();
        let layout = make_layout();
        for _ in 0..3 {
            service.save(&layout, false, None).await.unwrap();
        }

        let versions = service.list_versions().await.unwrap();

        let numbers: Vec<u64> = versions.iter().map(Version::version).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(service.latest().await.unwrap().map(|v| v.version()), Some(3));
    }
}
