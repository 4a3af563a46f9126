//! Overpass transport
//!
//! One fixed endpoint, form-encoded POST (`data=<query text>`), JSON element
//! list back. No retry lives here — a failed query is reported to the caller
//! as a typed error and it is the caller's policy what happens next.

use std::time::Duration;

use crate::config::OverpassConfig;
use crate::error::{Error, Result, TransportError};
use crate::overpass::{Element, ElementList, parse, query};
use crate::types::{CityRecord, ElementType, OsmId};

/// HTTP client for the Overpass query service
#[derive(Clone, Debug)]
pub struct OverpassClient {
    http: reqwest::Client,
    config: OverpassConfig,
}

impl OverpassClient {
    /// Create a client from query-service configuration
    ///
    /// The endpoint is validated up front so a typo fails at construction,
    /// not on the first job. The underlying HTTP client is built with the
    /// configured request timeout so a hung service cannot pin a job forever.
    pub fn new(config: OverpassConfig) -> Result<Self> {
        url::Url::parse(&config.endpoint).map_err(|e| Error::Config {
            message: format!("invalid overpass endpoint: {e}"),
            key: Some("overpass.endpoint".to_string()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(TransportError::Request)?;
        Ok(Self { http, config })
    }

    /// The query-service configuration this client was built with
    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Execute a raw query and decode the element list
    ///
    /// Fails with a transport error on connection failure or non-2xx status
    /// (capturing status code and response body), and with a decode error on
    /// malformed JSON.
    pub async fn execute(&self, query_text: &str) -> Result<Vec<Element>> {
        tracing::debug!(bytes = query_text.len(), "sending overpass query");

        let response = self
            .http
            .post(&self.config.endpoint)
            .form(&[("data", query_text)])
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::Request)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let decoded: ElementList = serde_json::from_str(&body).map_err(Error::Decode)?;

        tracing::debug!(elements = decoded.elements.len(), "overpass query decoded");
        Ok(decoded.elements)
    }

    /// Fetch the raw road-network elements for one feature
    pub async fn fetch_road_elements(
        &self,
        id: OsmId,
        element_type: ElementType,
    ) -> Result<Vec<Element>> {
        self.execute(&query::road_query(id, element_type, &self.config))
            .await
    }

    /// Fetch all cities above a population threshold
    ///
    /// Fails fast on transport or decode errors; elements without a name tag
    /// are dropped during normalization rather than surfaced as errors.
    pub async fn fetch_cities(&self, min_population: u64) -> Result<Vec<CityRecord>> {
        let elements = self
            .execute(&query::city_query(min_population, &self.config))
            .await?;
        Ok(parse::cities(elements))
    }
}
