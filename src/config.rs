//! Configuration types for road-extract

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use utoipa::ToSchema;

/// Query-service configuration (endpoint and query resource bounds)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OverpassConfig {
    /// Overpass API endpoint (default: the public overpass-api.de instance)
    #[serde(default = "default_overpass_endpoint")]
    pub endpoint: String,

    /// Server-side query timeout in seconds, embedded in the query text
    /// (default: 900)
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u32,

    /// Server-side memory ceiling in bytes, embedded in the query text
    /// (default: 1 GiB)
    #[serde(default = "default_max_heap_bytes")]
    pub max_heap_bytes: u64,

    /// Client-side HTTP timeout in seconds for query requests (default: 900)
    ///
    /// Kept at least as large as `query_timeout_secs` so the server gets the
    /// chance to answer before the client hangs up.
    #[serde(default = "default_query_timeout_secs_u64")]
    pub http_timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: default_overpass_endpoint(),
            query_timeout_secs: default_query_timeout_secs(),
            max_heap_bytes: default_max_heap_bytes(),
            http_timeout_secs: default_query_timeout_secs_u64(),
        }
    }
}

/// Object-storage configuration (S3-compatible endpoint and public domain)
///
/// Used as a nested sub-config within [`Config`]. `bucket` and
/// `distribution_domain` are required for store operation; the rest have
/// workable defaults.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageConfig {
    /// Explicit S3-compatible endpoint (e.g., a MinIO or gateway URL).
    /// When unset, the endpoint is derived from `bucket` and `region`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Storage region (default: "us-east-1")
    #[serde(default = "default_region")]
    pub region: String,

    /// Access key id for the storage gateway
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key for the storage gateway
    #[serde(default)]
    pub secret_access_key: String,

    /// Bucket holding the extracted artifacts
    #[serde(default)]
    pub bucket: String,

    /// Public hostname serving stored artifacts (the CDN in front of the
    /// bucket); used to derive artifact URLs
    #[serde(default)]
    pub distribution_domain: String,

    /// Deadline in seconds for a single artifact write (default: 300)
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket: String::new(),
            distribution_domain: String::new(),
            store_timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl StorageConfig {
    /// The endpoint object requests are sent to
    ///
    /// Explicit `endpoint` wins; otherwise the regional endpoint is derived
    /// from `region`. Objects are addressed path-style under the bucket.
    pub fn object_endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://s3.{}.amazonaws.com", self.region),
        }
    }
}

/// API server configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind the API server to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS middleware (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; "*" allows any origin (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve the interactive Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: false,
        }
    }
}

/// Batch-driver configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SeedConfig {
    /// Minimum tagged population for a city to be discovered
    /// (default: 1,000,000)
    #[serde(default = "default_min_population")]
    pub min_population: u64,

    /// Maximum concurrent per-city extractions (default: 8)
    #[serde(default = "default_seed_concurrency")]
    pub max_concurrent: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            min_population: default_min_population(),
            max_concurrent: default_seed_concurrency(),
        }
    }
}

/// Main configuration for the extraction service
///
/// Fields are organized into logical sub-configs:
/// - [`overpass`](OverpassConfig) — query endpoint and resource bounds
/// - [`storage`](StorageConfig) — object store and public distribution domain
/// - [`api`](ApiConfig) — REST server binding and CORS
/// - [`seed`](SeedConfig) — batch-driver population threshold and fan-out cap
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Query-service settings
    #[serde(default)]
    pub overpass: OverpassConfig,

    /// Object-storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Batch-driver settings
    #[serde(default)]
    pub seed: SeedConfig,
}

fn default_overpass_endpoint() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_query_timeout_secs() -> u32 {
    900
}

fn default_query_timeout_secs_u64() -> u64 {
    900
}

fn default_max_heap_bytes() -> u64 {
    1_073_741_824
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_store_timeout_secs() -> u64 {
    300
}

fn default_bind_address() -> SocketAddr {
    ([127, 0, 0, 1], 8080).into()
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_min_population() -> u64 {
    1_000_000
}

fn default_seed_concurrency() -> usize {
    8
}
