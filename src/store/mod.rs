//! Artifact storage: the object-store seam and the artifact gateway
//!
//! The system of record for "has this feature ever been extracted" is the
//! stored artifact, not the in-process status table. Two operations cover
//! everything the pipeline needs: a metadata-only existence probe and an
//! overwriting write. Both are keyed by the bare feature id.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::types::{OsmId, RoadExtract};

pub mod http;
pub mod memory;

pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;

/// Content type of stored artifacts
pub const ARTIFACT_CONTENT_TYPE: &str = "application/x-ndjson";

/// Result of a metadata-only existence probe
///
/// Probe failures are not folded into "absent": callers can distinguish
/// "safe to skip the fetch" (`Present`), "must extract" (`Absent`), and
/// "could not tell — do not skip, do not start" (`Unknown`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Presence {
    /// The artifact exists
    Present,
    /// The artifact does not exist
    Absent,
    /// The probe failed; existence could not be determined
    Unknown {
        /// Probe failure detail
        reason: String,
    },
}

/// Minimal object-store surface the pipeline depends on
///
/// Implemented by [`HttpObjectStore`] for S3-compatible endpoints and by
/// [`MemoryObjectStore`] for tests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata-only probe: does an object exist under `key`?
    async fn head(&self, key: &str) -> std::result::Result<bool, StoreError>;

    /// Write an object under `key`, overwriting any previous content
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), StoreError>;
}

/// Gateway from feature ids to stored artifacts and their public URLs
///
/// Key and URL derivation are deterministic: artifact key `"{id}.ndjson"`,
/// public URL `https://{distribution_domain}/{id}.ndjson`. The same URL form
/// is used by the existence path and the job-completion path.
#[derive(Clone)]
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
    distribution_domain: String,
}

impl ArtifactStore {
    /// Create a gateway over an object store and a public distribution domain
    pub fn new(store: Arc<dyn ObjectStore>, distribution_domain: impl Into<String>) -> Self {
        Self {
            store,
            distribution_domain: distribution_domain.into(),
        }
    }

    /// Storage key of the artifact for `id`
    pub fn artifact_key(id: OsmId) -> String {
        format!("{id}.ndjson")
    }

    /// Public retrieval URL of the artifact for `id`
    pub fn public_url(&self, id: OsmId) -> String {
        format!("https://{}/{}.ndjson", self.distribution_domain, id)
    }

    /// Probe whether the artifact for `id` exists
    ///
    /// Probe failures come back as [`Presence::Unknown`], never as a silent
    /// "absent".
    pub async fn exists(&self, id: OsmId) -> Presence {
        match self.store.head(&Self::artifact_key(id)).await {
            Ok(true) => Presence::Present,
            Ok(false) => Presence::Absent,
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "existence probe failed");
                Presence::Unknown {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Serialize and write the artifact for `id`, returning its public URL
    ///
    /// Always overwrites; writing the same extract twice yields the same
    /// observable artifact. Failures are reported to the caller, never
    /// swallowed.
    pub async fn put_extract(&self, id: OsmId, extract: &RoadExtract) -> Result<String> {
        let body = extract.to_ndjson().map_err(StoreError::Serialize)?;
        let bytes = body.into_bytes();
        let size = bytes.len();

        self.store
            .put(&Self::artifact_key(id), bytes, ARTIFACT_CONTENT_TYPE)
            .await?;

        tracing::info!(
            id = %id,
            bytes = size,
            nodes = extract.nodes.len(),
            ways = extract.ways.len(),
            "artifact stored"
        );
        Ok(self.public_url(id))
    }
}
