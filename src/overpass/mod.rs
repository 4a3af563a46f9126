//! Overpass integration: query construction, transport, and response
//! normalization
//!
//! The query service speaks an ad-hoc query language over form-encoded POST
//! and answers with a heterogeneous element list. This module keeps the three
//! concerns separate:
//! - [`query`] — pure, deterministic query-string construction
//! - [`client`] — transport with typed transport/decode failures
//! - [`parse`] — element list → stable internal record shapes

use serde::Deserialize;
use std::collections::HashMap;

pub mod client;
pub mod parse;
pub mod query;

pub use client::OverpassClient;

/// One element of an Overpass response, as received on the wire
///
/// The element kind stays a free-form string here: the normalizer drops
/// anything it does not recognize rather than failing the whole response.
/// Coordinate and member fields default to zero values when absent.
#[derive(Clone, Debug, Deserialize)]
pub struct Element {
    /// Element kind ("node", "way", "relation", ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Numeric element id
    #[serde(default)]
    pub id: i64,

    /// Latitude, present on nodes
    #[serde(default)]
    pub lat: f64,

    /// Longitude, present on nodes
    #[serde(default)]
    pub lon: f64,

    /// Referenced node ids, present on ways
    #[serde(default)]
    pub nodes: Vec<i64>,

    /// Key/value tags, present when the query requests them
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Top-level Overpass response envelope
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ElementList {
    /// The returned elements, in service order
    #[serde(default)]
    pub elements: Vec<Element>,
}
