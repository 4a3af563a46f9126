//! Overpass query construction
//!
//! Pure string building, no I/O. Identical inputs always produce
//! byte-identical query text, which keeps the queries snapshot-testable.

use crate::config::OverpassConfig;
use crate::types::{ElementType, OsmId};

/// Offset added to a relation id to obtain its Overpass area id
pub const RELATION_AREA_OFFSET: i64 = 3_600_000_000;

/// Offset added to a way id to obtain its Overpass area id
pub const WAY_AREA_OFFSET: i64 = 2_400_000_000;

/// Road classifications accepted into an extract
///
/// Matches the strict highway filter of the original data set: the main road
/// hierarchy with `_link` ramps, plus minor road types, excluding mapped
/// areas.
const ROAD_FILTER: &str = "[highway~'^(((motorway|trunk|primary|secondary|tertiary)(_link)?)|unclassified|residential|living_street|pedestrian|service|track)$'][area!=yes]";

/// Compute the Overpass area id for a feature
///
/// Relations and ways get their documented fixed offsets. Any other element
/// type — including nodes — is passed through bare, which is not a valid
/// area selector; node-based requests therefore return empty extracts.
pub fn area_id(id: OsmId, element_type: ElementType) -> i64 {
    match element_type {
        ElementType::Relation => id.get() + RELATION_AREA_OFFSET,
        ElementType::Way => id.get() + WAY_AREA_OFFSET,
        ElementType::Node => id.get(),
    }
}

/// Build the road-network query for one feature
///
/// The query selects every accepted road way inside the feature's area plus
/// the nodes those ways reference, and asks for skeleton output only (ids,
/// coordinates, and way memberships — no tags).
pub fn road_query(id: OsmId, element_type: ElementType, config: &OverpassConfig) -> String {
    format!(
        "[timeout:{timeout}][maxsize:{maxsize}][out:json];area({area});(._;)->.area;(way{filter}(area.area); node(w););out skel;",
        timeout = config.query_timeout_secs,
        maxsize = config.max_heap_bytes,
        area = area_id(id, element_type),
        filter = ROAD_FILTER,
    )
}

/// Build the city-discovery query for the batch driver
///
/// Selects city-tagged nodes and relations whose tagged population exceeds
/// `min_population`, returning ids and tags only.
pub fn city_query(min_population: u64, config: &OverpassConfig) -> String {
    format!(
        "[out:json][timeout:{timeout}][maxsize:{maxsize}];(node[\"place\"=\"city\"](if:t[\"population\"] > {min});relation[\"place\"=\"city\"](if:t[\"population\"] > {min}););out ids tags;",
        timeout = config.query_timeout_secs,
        maxsize = config.max_heap_bytes,
        min = min_population,
    )
}
