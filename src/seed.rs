//! City discovery and batch extraction
//!
//! Discovers every city above a population threshold, then runs the same
//! per-feature extraction used by the front door across all of them. Fan-out
//! is gated by a semaphore sized to respect the query service, and per-city
//! failures are aggregated into the final report instead of being printed
//! and forgotten.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::Result;
use crate::jobs::Registration;
use crate::service::ExtractionService;
use crate::store::Presence;
use crate::types::{CityRecord, JobState};

/// One city that could not be extracted during a seed run
#[derive(Clone, Debug)]
pub struct SeedFailure {
    /// The city whose extraction failed
    pub city: CityRecord,
    /// Failure detail, as recorded by the job or the probe
    pub error: String,
}

/// Aggregated outcome of a seed run
#[derive(Clone, Debug, Default)]
pub struct SeedReport {
    /// Cities discovered above the population threshold (after the name
    /// filter)
    pub discovered: usize,
    /// Cities newly extracted and stored by this run
    pub stored: usize,
    /// Cities skipped: artifact already present, or a job already in flight
    pub skipped: usize,
    /// Per-city failures, in completion order
    pub failures: Vec<SeedFailure>,
}

enum UnitOutcome {
    Stored,
    Skipped,
    Failed(SeedFailure),
}

/// Discover cities above `min_population` and extract each one
///
/// Discovery failures (transport or decode) fail the whole run immediately
/// with no partial result. Per-city work is independent: each unit probes the
/// store, registers with the status table, and runs an extraction job to
/// completion, with at most `max_concurrent` units in flight at once. The
/// call returns only after every unit has finished.
pub async fn seed_cities(
    service: Arc<ExtractionService>,
    min_population: u64,
    max_concurrent: usize,
) -> Result<SeedReport> {
    let cities = service.overpass.fetch_cities(min_population).await?;

    tracing::info!(
        count = cities.len(),
        min_population,
        "discovered cities above threshold"
    );

    let mut report = SeedReport {
        discovered: cities.len(),
        ..Default::default()
    };

    let gate = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut units = JoinSet::new();

    for city in cities {
        let service = Arc::clone(&service);
        let gate = Arc::clone(&gate);
        units.spawn(async move {
            let _permit = match gate.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return UnitOutcome::Failed(SeedFailure {
                        error: "seed pool closed".to_string(),
                        city,
                    });
                }
            };
            extract_city(&service, city).await
        });
    }

    while let Some(joined) = units.join_next().await {
        match joined {
            Ok(UnitOutcome::Stored) => report.stored += 1,
            Ok(UnitOutcome::Skipped) => report.skipped += 1,
            Ok(UnitOutcome::Failed(failure)) => {
                tracing::warn!(
                    city = %failure.city.name,
                    id = %failure.city.id,
                    error = %failure.error,
                    "city extraction failed"
                );
                report.failures.push(failure);
            }
            Err(join_err) => {
                tracing::error!(error = %join_err, "seed unit fault");
            }
        }
    }

    tracing::info!(
        discovered = report.discovered,
        stored = report.stored,
        skipped = report.skipped,
        failed = report.failures.len(),
        "seed run completed"
    );
    Ok(report)
}

async fn extract_city(service: &Arc<ExtractionService>, city: CityRecord) -> UnitOutcome {
    match service.store.exists(city.id).await {
        Presence::Present => {
            tracing::debug!(city = %city.name, id = %city.id, "artifact already stored");
            UnitOutcome::Skipped
        }
        Presence::Unknown { reason } => UnitOutcome::Failed(SeedFailure {
            error: reason,
            city,
        }),
        Presence::Absent => match service.jobs.register(city.id).await {
            // Another entry point is already working on this id; leave it be.
            Registration::Existing(_) => UnitOutcome::Skipped,
            Registration::New(_) => {
                let status = service.run_extraction(city.id, city.element_type).await;
                match status.status {
                    JobState::Success => UnitOutcome::Stored,
                    _ => UnitOutcome::Failed(SeedFailure {
                        error: status.error.unwrap_or_else(|| "unknown failure".to_string()),
                        city,
                    }),
                }
            }
        },
    }
}
