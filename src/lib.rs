//! # road-extract
//!
//! Road-network extraction pipeline for OpenStreetMap features.
//!
//! Given a feature id and element type, road-extract asynchronously pulls
//! the feature's road network from the Overpass query service, normalizes it
//! into a stable record shape, stores it as newline-delimited JSON in
//! S3-compatible object storage, and serves a content-delivery URL for the
//! artifact. A batch driver discovers large population centers and fans the
//! same extraction out across all of them.
//!
//! ## Design Philosophy
//!
//! - **Deduplicating by construction** - the stored artifact is the system
//!   of record; a feature is fetched at most once per process, no matter how
//!   many callers race for it
//! - **Fault-isolated jobs** - any failure inside a background job becomes a
//!   terminal status entry, never a crashed process
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use road_extract::{Config, ExtractionService, api};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config: Config = serde_json::from_str(
//!         r#"{
//!             "storage": {
//!                 "bucket": "road-extracts",
//!                 "distribution_domain": "cdn.example.com"
//!             }
//!         }"#,
//!     )?;
//!     let config = Arc::new(config);
//!
//!     let service = Arc::new(ExtractionService::new(&config)?);
//!
//!     // Serve the extraction API (blocks until shutdown)
//!     api::start_api_server(service, config).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Job status tracking and execution
pub mod jobs;
/// Overpass query construction, transport, and normalization
pub mod overpass;
/// City discovery and batch extraction
pub mod seed;
/// The extraction service (deduplicating front door)
pub mod service;
/// Artifact storage
pub mod store;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, Config, OverpassConfig, SeedConfig, StorageConfig};
pub use error::{ApiError, Error, ErrorDetail, Result, StoreError, ToHttpStatus, TransportError};
pub use jobs::{Registration, StatusTable};
pub use overpass::OverpassClient;
pub use seed::{SeedFailure, SeedReport, seed_cities};
pub use service::{ExtractionService, ExtractionTicket};
pub use store::{
    ArtifactStore, HttpObjectStore, MemoryObjectStore, ObjectStore, Presence,
};
pub use types::{
    CityRecord, ElementType, JobState, JobStatus, NodeRecord, OsmId, RoadExtract, WayRecord,
};

/// Run the API server with graceful signal handling
///
/// Spawns the server, waits for a termination signal (SIGTERM/SIGINT on
/// Unix, Ctrl+C elsewhere), and stops the server when one arrives.
///
/// # Example
///
/// ```no_run
/// use road_extract::{Config, ExtractionService, run_with_shutdown};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let service = Arc::new(ExtractionService::new(&config)?);
///
/// run_with_shutdown(service, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_with_shutdown(
    service: std::sync::Arc<ExtractionService>,
    config: std::sync::Arc<Config>,
) -> Result<()> {
    let server = tokio::spawn(api::start_api_server(service, config));

    wait_for_signal().await;
    tracing::info!("shutting down API server");
    server.abort();

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration can fail in restricted environments (containers,
    // tests); fall back to ctrl_c when it does.
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                _ = sigint.recv() => tracing::info!("received SIGINT"),
            }
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "could not register SIGINT handler");
            sigterm.recv().await;
            tracing::info!("received SIGTERM");
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "could not register SIGTERM handler");
            sigint.recv().await;
            tracing::info!("received SIGINT");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "could not register signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C"),
        Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl+C"),
    }
}
