//! The extraction service: deduplicating front door over the job pipeline
//!
//! Every entry point — the REST handler and the batch driver — goes through
//! one service object owning the query client, the artifact gateway, and the
//! job-status table. The front door decides whether a feature needs fetching
//! at all: the stored artifact is definitive, the status table covers
//! in-flight and settled jobs, and only a feature absent from both starts a
//! new background job.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result, StoreError};
use crate::jobs::{Registration, StatusTable};
use crate::overpass::OverpassClient;
use crate::store::{ArtifactStore, HttpObjectStore, Presence};
use crate::types::{ElementType, JobStatus, OsmId};

/// Front-door answer for one extraction request
#[derive(Clone, Debug)]
pub enum ExtractionTicket {
    /// The artifact already exists; the status carries its public URL
    /// (HTTP 200 on the API surface)
    Stored(JobStatus),
    /// A job is registered for the feature — freshly launched or already
    /// known, in whatever state it last reported (HTTP 202)
    Accepted(JobStatus),
}

impl ExtractionTicket {
    /// The status snapshot inside the ticket
    pub fn status(&self) -> &JobStatus {
        match self {
            ExtractionTicket::Stored(status) | ExtractionTicket::Accepted(status) => status,
        }
    }
}

/// Owner of the extraction pipeline's collaborators and shared state
pub struct ExtractionService {
    pub(crate) overpass: OverpassClient,
    pub(crate) store: ArtifactStore,
    pub(crate) jobs: StatusTable,
    pub(crate) store_timeout: Duration,
}

impl ExtractionService {
    /// Build a service from configuration, with an HTTP object store
    ///
    /// Fails with a configuration error when the storage section is missing
    /// the bucket or the distribution domain.
    pub fn new(config: &Config) -> Result<Self> {
        if config.storage.bucket.is_empty() {
            return Err(Error::Config {
                message: "storage bucket must be set".to_string(),
                key: Some("storage.bucket".to_string()),
            });
        }
        if config.storage.distribution_domain.is_empty() {
            return Err(Error::Config {
                message: "distribution domain must be set".to_string(),
                key: Some("storage.distribution_domain".to_string()),
            });
        }

        let overpass = OverpassClient::new(config.overpass.clone())?;
        let store = ArtifactStore::new(
            Arc::new(HttpObjectStore::from_config(&config.storage)),
            config.storage.distribution_domain.clone(),
        );
        Ok(Self::with_parts(
            overpass,
            store,
            config.storage.store_timeout_secs,
        ))
    }

    /// Assemble a service from pre-built collaborators
    ///
    /// This is the seam tests use to swap in a memory-backed artifact store.
    pub fn with_parts(
        overpass: OverpassClient,
        store: ArtifactStore,
        store_timeout_secs: u64,
    ) -> Self {
        Self {
            overpass,
            store,
            jobs: StatusTable::new(),
            store_timeout: Duration::from_secs(store_timeout_secs),
        }
    }

    /// The job-status table, for status polling and introspection
    pub fn status_table(&self) -> &StatusTable {
        &self.jobs
    }

    /// The artifact gateway this service writes through
    pub fn artifact_store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Request extraction of one feature, deduplicating against the store
    /// and the job table
    ///
    /// 1. Artifact already stored → [`ExtractionTicket::Stored`] with the
    ///    public URL; the job table is not touched.
    /// 2. A job is registered → its snapshot verbatim, whatever the state.
    ///    A settled failure stays a failure; repeated requests never retry.
    /// 3. Otherwise the feature is registered atomically and a background
    ///    job is launched; under racing requests for the same id, at most
    ///    one job ever starts.
    ///
    /// An existence probe that cannot determine presence is an error — the
    /// caller cannot tell whether extraction is needed, so nothing is
    /// started.
    pub async fn request_extraction(
        self: &Arc<Self>,
        id: OsmId,
        element_type: ElementType,
    ) -> Result<ExtractionTicket> {
        match self.store.exists(id).await {
            Presence::Present => Ok(ExtractionTicket::Stored(JobStatus::success(
                id,
                self.store.public_url(id),
            ))),
            Presence::Unknown { reason } => Err(StoreError::ProbeFailed { reason }.into()),
            Presence::Absent => match self.jobs.register(id).await {
                Registration::Existing(status) => Ok(ExtractionTicket::Accepted(status)),
                Registration::New(status) => {
                    tracing::info!(id = %id, element_type = %element_type, "launching extraction job");
                    self.spawn_extraction(id, element_type);
                    Ok(ExtractionTicket::Accepted(status))
                }
            },
        }
    }
}
