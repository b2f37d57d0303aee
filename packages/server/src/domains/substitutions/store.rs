//! Snapshot store - the single current `PlanSnapshot`.
//!
//! Readers get an `Arc` to a complete published value and keep it for the
//! whole request, so they never see fields from two different cycles.
//! Publishing swaps the `Arc`; the previous value stays alive for readers
//! still holding it.

use std::sync::{Arc, RwLock};

use super::models::PlanSnapshot;

pub struct SnapshotStore {
    current: RwLock<Arc<PlanSnapshot>>,
}

impl SnapshotStore {
    /// Empty store: no days, no timestamps, no error.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(PlanSnapshot::default())),
        }
    }

    /// Latest fully published snapshot.
    pub fn read(&self) -> Arc<PlanSnapshot> {
        // The lock only guards a pointer swap; a poisoned lock still holds a valid Arc.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Atomically replace the current snapshot, stamping the next version.
    pub fn publish(&self, mut snapshot: PlanSnapshot) -> Arc<PlanSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        snapshot.version = guard.version + 1;
        let published = Arc::new(snapshot);
        *guard = Arc::clone(&published);
        published
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::substitutions::models::RefreshError;
    use chrono::Utc;

    #[test]
    fn test_new_store_is_empty() {
        let store = SnapshotStore::new();
        let snapshot = store.read();

        assert!(snapshot.today.is_none());
        assert!(snapshot.tomorrow.is_none());
        assert!(snapshot.last_updated.is_none());
        assert!(snapshot.last_error.is_none());
        assert_eq!(snapshot.version, 0);
    }

    #[test]
    fn test_publish_swaps_and_versions() {
        let store = SnapshotStore::new();
        let before = store.read();

        let error = RefreshError {
            message: "HTTP 401".to_string(),
            timestamp: Utc::now(),
        };
        store.publish(before.failed(error.clone()));
        let after = store.read();

        // Earlier readers keep their value
        assert!(before.last_error.is_none());
        assert_eq!(after.last_error, Some(error));
        assert_eq!(after.version, 1);

        store.publish(PlanSnapshot::default());
        assert_eq!(store.read().version, 2);
    }
}
