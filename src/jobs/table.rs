//! Concurrent job-status table
//!
//! A process-wide map from feature id to the latest known job status.
//! Entries accumulate for the process lifetime: no eviction, no persistence
//! across restarts. The stored artifact is the durable system of record;
//! this table is a best-effort accelerator on top of it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::Mutex;

use crate::types::{JobStatus, OsmId};

/// Outcome of an atomic get-or-register call
#[derive(Clone, Debug)]
pub enum Registration {
    /// No job was known for the id; a fresh `Processing` entry was created
    /// and the caller owns launching the executor
    New(JobStatus),
    /// A job was already registered; the snapshot is returned verbatim,
    /// whatever its state — including a prior failure
    Existing(JobStatus),
}

/// Concurrent map from feature id to job status
///
/// All synchronization is internal; callers never lock around it. The
/// critical correctness property lives in [`register`](Self::register):
/// under concurrent calls for the same id, exactly one caller observes
/// [`Registration::New`].
#[derive(Debug, Default)]
pub struct StatusTable {
    entries: Mutex<HashMap<OsmId, JobStatus>>,
}

impl StatusTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the status for `id`, if any job was ever registered
    pub async fn get(&self, id: OsmId) -> Option<JobStatus> {
        self.entries.lock().await.get(&id).cloned()
    }

    /// Atomically fetch-or-create the entry for `id`
    ///
    /// The check and the insert happen under one lock acquisition, which is
    /// what makes "at most one executor per id" hold under racing callers.
    pub async fn register(&self, id: OsmId) -> Registration {
        let mut entries = self.entries.lock().await;
        match entries.entry(id) {
            Entry::Occupied(entry) => Registration::Existing(entry.get().clone()),
            Entry::Vacant(entry) => {
                Registration::New(entry.insert(JobStatus::processing(id)).clone())
            }
        }
    }

    /// Publish a terminal status for a finished job
    ///
    /// Terminal entries are immutable: publishing over an entry that is
    /// already Success or Failure is ignored (and logged), so a status can
    /// never regress once settled.
    pub async fn complete(&self, status: JobStatus) {
        if !status.status.is_terminal() {
            tracing::warn!(id = %status.id, "refusing to publish non-terminal status");
            return;
        }

        let mut entries = self.entries.lock().await;
        match entries.entry(status.id) {
            Entry::Occupied(mut entry) if !entry.get().status.is_terminal() => {
                entry.insert(status);
            }
            Entry::Occupied(entry) => {
                tracing::warn!(
                    id = %status.id,
                    current = ?entry.get().status,
                    "job already settled, keeping existing terminal status"
                );
            }
            Entry::Vacant(entry) => {
                // No prior registration; keep the terminal status so late
                // pollers still see the outcome.
                entry.insert(status);
            }
        }
    }

    /// Number of registered entries
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no job has ever been registered
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobState;
    use std::sync::Arc;

    #[tokio::test]
    async fn register_creates_processing_entry_once() {
        let table = StatusTable::new();
        let id = OsmId::new(42);

        match table.register(id).await {
            Registration::New(status) => assert_eq!(status.status, JobState::Processing),
            Registration::Existing(_) => panic!("first registration must be new"),
        }

        match table.register(id).await {
            Registration::Existing(status) => assert_eq!(status.status, JobState::Processing),
            Registration::New(_) => panic!("second registration must observe the first"),
        }
    }

    #[tokio::test]
    async fn concurrent_registration_yields_exactly_one_new() {
        let table = Arc::new(StatusTable::new());
        let id = OsmId::new(7);

        let mut handles = Vec::new();
        for _ in 0..32 {
            let table = Arc::clone(&table);
            handles.push(tokio::spawn(
                async move { table.register(id).await },
            ));
        }

        let mut new_count = 0;
        for handle in handles {
            if let Registration::New(_) = handle.await.unwrap() {
                new_count += 1;
            }
        }

        assert_eq!(new_count, 1, "exactly one caller may launch the executor");
        assert_eq!(table.len().await, 1);
    }

    #[tokio::test]
    async fn terminal_status_is_immutable() {
        let table = StatusTable::new();
        let id = OsmId::new(1);

        table.register(id).await;
        table
            .complete(JobStatus::failure(id, "upstream returned 503".to_string()))
            .await;
        table
            .complete(JobStatus::success(id, "https://cdn.example.com/1.ndjson".to_string()))
            .await;

        let status = table.get(id).await.unwrap();
        assert_eq!(status.status, JobState::Failure);
        assert_eq!(status.error.as_deref(), Some("upstream returned 503"));
    }

    #[tokio::test]
    async fn repeated_get_after_terminal_is_identical() {
        let table = StatusTable::new();
        let id = OsmId::new(2);

        table.register(id).await;
        table
            .complete(JobStatus::success(id, "https://cdn.example.com/2.ndjson".to_string()))
            .await;

        let first = table.get(id).await.unwrap();
        let second = table.get(id).await.unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.url, second.url);
        assert_eq!(first.timestamp, second.timestamp);
    }

    #[tokio::test]
    async fn non_terminal_publish_is_rejected() {
        let table = StatusTable::new();
        let id = OsmId::new(3);

        table.register(id).await;
        table.complete(JobStatus::processing(id)).await;

        // register() wrote Processing; complete() must not have re-stamped it
        let status = table.get(id).await.unwrap();
        assert_eq!(status.status, JobState::Processing);
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_ids() {
        let table = StatusTable::new();
        assert!(table.get(OsmId::new(999)).await.is_none());
        assert!(table.is_empty().await);
    }
}
