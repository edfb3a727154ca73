//! Immutable, numbered snapshots of a layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::layout::Layout;

/// Unique identifier of a persisted version record.
pub type VersionId = Uuid;

/// A persisted snapshot of a layout.
///
/// Versions are append-only: once created a record is never modified, so all
/// fields are private and only exposed through getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    id: VersionId,
    version: u64,
    layout: Layout,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    /// `true` for explicit saves, `false` for autosave checkpoints.
    #[serde(default)]
    committed: bool,
}

impl Version {
    /// Creates a new version record with a fresh id, stamped with the current time.
    pub fn new(version: u64, layout: Layout, created_by: Option<String>, committed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            version,
            layout,
            created_at: Utc::now(),
            created_by,
            committed,
        }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }
}
