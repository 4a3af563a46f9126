//! Core types for road-extract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Numeric identifier of an OpenStreetMap feature
///
/// The id is the identity key for deduplication and storage. Element type is
/// deliberately not part of the key: the stored artifact is named after the
/// bare id, so a node and a relation sharing a numeric id collide. See
/// DESIGN.md for the accepted-collision decision.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct OsmId(pub i64);

impl OsmId {
    /// Create a new OsmId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OsmId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<OsmId> for i64 {
    fn from(id: OsmId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OsmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OsmId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// OSM element type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A single point with coordinates
    Node,
    /// An ordered list of nodes
    Way,
    /// A group of nodes, ways, and other relations
    Relation,
}

impl ElementType {
    /// The lowercase wire name of this element type
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Node => "node",
            ElementType::Way => "way",
            ElementType::Relation => "relation",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(ElementType::Node),
            "way" => Ok(ElementType::Way),
            "relation" => Ok(ElementType::Relation),
            other => Err(crate::error::Error::Validation(format!(
                "unknown element type: {other}"
            ))),
        }
    }
}

/// Lifecycle state of an extraction job
///
/// Transitions are `Processing` → `Success` or `Processing` → `Failure` only.
/// Once a terminal state is reached the status entry is immutable for the
/// lifetime of the process — a failed extraction is never retried by a
/// repeated request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Extraction is in flight
    Processing,
    /// Artifact stored; `url` points at it
    Success,
    /// Extraction failed; `error` carries the detail
    Failure,
}

impl JobState {
    /// Whether this state is terminal (Success or Failure)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Processing)
    }
}

/// Snapshot of an extraction job as seen by callers
///
/// Created with state `Processing` when a job is first registered, mutated
/// exactly once more by the executor on completion. `error` is populated only
/// for `Failure`, `url` only for `Success`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobStatus {
    /// The feature id this job extracts
    pub id: OsmId,

    /// Current state of the job
    pub status: JobState,

    /// Failure detail, present only when `status` is `failure`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Public artifact URL, present only when `status` is `success`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// When this snapshot was last written
    pub timestamp: DateTime<Utc>,
}

impl JobStatus {
    /// A fresh `Processing` snapshot for `id`
    pub fn processing(id: OsmId) -> Self {
        Self {
            id,
            status: JobState::Processing,
            error: None,
            url: None,
            timestamp: Utc::now(),
        }
    }

    /// A terminal `Success` snapshot carrying the artifact URL
    pub fn success(id: OsmId, url: String) -> Self {
        Self {
            id,
            status: JobState::Success,
            error: None,
            url: Some(url),
            timestamp: Utc::now(),
        }
    }

    /// A terminal `Failure` snapshot carrying the error detail
    pub fn failure(id: OsmId, error: String) -> Self {
        Self {
            id,
            status: JobState::Failure,
            error: Some(error),
            url: None,
            timestamp: Utc::now(),
        }
    }
}

/// A road-network point: one OSM node with coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// OSM node id
    pub id: i64,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

/// A road segment: the ordered node ids of one OSM way
///
/// The id sequence is carried verbatim from the source element — order
/// preserved, not deduplicated, not validated against the node set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WayRecord {
    /// Referenced node ids, in path order
    pub ids: Vec<i64>,
}

/// Normalized road-network extract for one feature
///
/// Produced fresh per job and discarded once the store write succeeds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadExtract {
    /// All point records in the extract
    pub nodes: Vec<NodeRecord>,
    /// All way records in the extract
    pub ways: Vec<WayRecord>,
}

/// One NDJSON line of a stored artifact
///
/// The artifact is line-delimited JSON: one `{"type":"node",...}` object per
/// node record followed by one `{"type":"way",...}` object per way record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordLine {
    /// A point record line
    Node {
        /// OSM node id
        id: i64,
        /// Latitude in decimal degrees
        lat: f64,
        /// Longitude in decimal degrees
        lon: f64,
    },
    /// A way record line
    Way {
        /// Referenced node ids, in path order
        ids: Vec<i64>,
    },
}

impl RoadExtract {
    /// Number of records across both record sets
    pub fn len(&self) -> usize {
        self.nodes.len() + self.ways.len()
    }

    /// Whether the extract holds no records at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty()
    }

    /// Serialize to newline-delimited JSON, nodes first, then ways
    pub fn to_ndjson(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for node in &self.nodes {
            let line = serde_json::to_string(&RecordLine::Node {
                id: node.id,
                lat: node.lat,
                lon: node.lon,
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        for way in &self.ways {
            let line = serde_json::to_string(&RecordLine::Way {
                ids: way.ids.clone(),
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse newline-delimited JSON back into an extract
    ///
    /// Blank lines are skipped; record order within each set is preserved.
    pub fn from_ndjson(input: &str) -> Result<Self, serde_json::Error> {
        let mut extract = RoadExtract::default();
        for line in input.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RecordLine>(line)? {
                RecordLine::Node { id, lat, lon } => {
                    extract.nodes.push(NodeRecord { id, lat, lon });
                }
                RecordLine::Way { ids } => {
                    extract.ways.push(WayRecord { ids });
                }
            }
        }
        Ok(extract)
    }
}

/// A population center discovered by the batch driver
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    /// OSM id of the city element
    pub id: OsmId,
    /// Element type the city was tagged on (node or relation)
    pub element_type: ElementType,
    /// City name; elements without one are dropped during normalization
    pub name: String,
    /// Tagged population, verbatim (OSM population tags are free-form text)
    pub population: Option<String>,
}
