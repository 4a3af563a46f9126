//! Response normalization
//!
//! Pure functions from the heterogeneous Overpass element list to the stable
//! internal record shapes. Unrecognized element kinds are dropped silently;
//! there is no partial-failure mode.

use crate::overpass::Element;
use crate::types::{CityRecord, NodeRecord, RoadExtract, WayRecord};

/// Normalize a road-query element list into an extract
///
/// Nodes become point records (id, lat, lon), ways become ordered node-id
/// records carried verbatim. Elements of any other kind are skipped. A node
/// missing coordinates keeps its zero-valued fields — leniency matching the
/// upstream skeleton output, where such elements do not normally occur.
pub fn roads(elements: Vec<Element>) -> RoadExtract {
    let mut extract = RoadExtract::default();

    for element in elements {
        match element.kind.as_str() {
            "node" => extract.nodes.push(NodeRecord {
                id: element.id,
                lat: element.lat,
                lon: element.lon,
            }),
            "way" => extract.ways.push(WayRecord {
                ids: element.nodes,
            }),
            _ => {}
        }
    }

    extract
}

/// Normalize a city-query element list into city records
///
/// The name tag is required: elements without one are discarded, not
/// reported. The population tag is carried verbatim when present.
pub fn cities(elements: Vec<Element>) -> Vec<CityRecord> {
    elements
        .into_iter()
        .filter_map(|element| {
            let element_type = element.kind.parse().ok()?;
            let name = element.tags.get("name").cloned().filter(|n| !n.is_empty())?;
            Some(CityRecord {
                id: element.id.into(),
                element_type,
                name,
                population: element.tags.get("population").cloned(),
            })
        })
        .collect()
}
