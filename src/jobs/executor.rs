//! Background job execution
//!
//! One job runs the full fetch → normalize → store sequence for one feature.
//! Jobs are detached from the request that triggered them, and every way a
//! job can die — transport failure, malformed response, store failure, the
//! store deadline, or a panic — ends as a terminal Failure status in the
//! table. A single job's fault never reaches sibling jobs or the process.

use std::sync::Arc;

use crate::error::{Error, Result, StoreError};
use crate::overpass::parse;
use crate::service::ExtractionService;
use crate::types::{ElementType, JobStatus, OsmId};

impl ExtractionService {
    /// Launch a detached background job for one feature
    ///
    /// The returned handle is for observation only; dropping it does not
    /// cancel the job.
    pub(crate) fn spawn_extraction(
        self: &Arc<Self>,
        id: OsmId,
        element_type: ElementType,
    ) -> tokio::task::JoinHandle<JobStatus> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.run_extraction(id, element_type).await })
    }

    /// Run one extraction job to completion and publish its terminal status
    ///
    /// The pipeline body runs in its own task so that a panic anywhere
    /// inside it is contained at the job boundary and converted into a
    /// Failure status instead of unwinding further.
    pub async fn run_extraction(
        self: &Arc<Self>,
        id: OsmId,
        element_type: ElementType,
    ) -> JobStatus {
        let service = Arc::clone(self);
        let outcome =
            tokio::spawn(async move { service.extract_and_store(id, element_type).await }).await;

        let status = match outcome {
            Ok(Ok(url)) => {
                tracing::info!(id = %id, url = %url, "extraction succeeded");
                JobStatus::success(id, url)
            }
            Ok(Err(err)) => {
                tracing::error!(id = %id, error = %err, "extraction failed");
                JobStatus::failure(id, err.to_string())
            }
            Err(join_err) => {
                let detail = if join_err.is_panic() {
                    let payload = join_err.into_panic();
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "opaque panic payload".to_string());
                    format!("job panicked: {message}")
                } else {
                    "job cancelled before completion".to_string()
                };
                let fault = Error::Runtime(detail);
                tracing::error!(id = %id, error = %fault, "extraction job fault");
                JobStatus::failure(id, fault.to_string())
            }
        };

        self.jobs.complete(status.clone()).await;
        status
    }

    /// The job body: fetch, normalize, store, return the artifact URL
    ///
    /// Only the store step carries a deadline; the fetch is bounded by the
    /// HTTP client's own timeout.
    async fn extract_and_store(&self, id: OsmId, element_type: ElementType) -> Result<String> {
        let elements = self.overpass.fetch_road_elements(id, element_type).await?;
        let extract = parse::roads(elements);

        tracing::debug!(
            id = %id,
            nodes = extract.nodes.len(),
            ways = extract.ways.len(),
            "normalized road extract"
        );

        match tokio::time::timeout(self.store_timeout, self.store.put_extract(id, &extract)).await
        {
            Ok(result) => result,
            Err(_) => Err(StoreError::DeadlineExceeded {
                seconds: self.store_timeout.as_secs(),
            }
            .into()),
        }
    }
}
