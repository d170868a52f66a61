//! Reading and writing the line-feature JSON exchanged by the CLI
//!
//! The document is a GeoJSON-shaped FeatureCollection of LineString features
//! whose properties carry the attributes the engine needs: category,
//! subclass, medium and original_line_id. Features the engine cannot use -
//! non-line geometries, degenerate vertex lists - are skipped with a count,
//! never fatal.

use std::path::Path;

use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::core::{Medium, Segment};
use crate::error::DegloopError;
use crate::geometry;

#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Properties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subclass: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Medium>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_line_id: Option<u64>,
}

/// A parsed input document: usable segments plus the count of features that
/// had to be skipped
#[derive(Debug)]
pub struct LoadedNetwork {
    pub segments: Vec<Segment>,
    pub skipped: usize,
}

/// Read a line-feature document from disk
pub fn read_collection(path: &Path) -> Result<LoadedNetwork, DegloopError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DegloopError::FileReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let collection: FeatureCollection =
        serde_json::from_str(&raw).map_err(|source| DegloopError::FeatureParseError {
            file: path.display().to_string(),
            source,
        })?;
    Ok(segments_from(collection))
}

/// Convert a parsed collection into segments, skipping what the engine
/// cannot use
pub fn segments_from(collection: FeatureCollection) -> LoadedNetwork {
    let mut segments = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;

    for (index, feature) in collection.features.into_iter().enumerate() {
        if feature.geometry.kind != "LineString" {
            skipped += 1;
            continue;
        }
        let line = LineString::from(
            feature
                .geometry
                .coordinates
                .iter()
                .map(|&[x, y]| Coord { x, y })
                .collect::<Vec<_>>(),
        );
        if geometry::is_degenerate(&line) {
            skipped += 1;
            continue;
        }

        let id = feature.properties.id.unwrap_or(index as u64 + 1);
        segments.push(Segment::new(
            id,
            line,
            feature
                .properties
                .category
                .unwrap_or_else(|| "unclassified".to_string()),
            feature.properties.subclass,
            feature.properties.medium.unwrap_or_default(),
            feature.properties.original_line_id.unwrap_or(id),
        ));
    }

    LoadedNetwork { segments, skipped }
}

/// Render segments back into a feature collection with the same schema
pub fn collection_from(segments: &[Segment]) -> FeatureCollection {
    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features: segments
            .iter()
            .map(|segment| Feature {
                kind: "Feature".to_string(),
                geometry: Geometry {
                    kind: "LineString".to_string(),
                    coordinates: segment.line.0.iter().map(|c| [c.x, c.y]).collect(),
                },
                properties: Properties {
                    id: Some(segment.id),
                    category: Some(segment.category.clone()),
                    subclass: segment.subclass,
                    // Medium stays explicit on the way out
                    medium: Some(segment.medium),
                    original_line_id: Some(segment.original_line_id),
                },
            })
            .collect(),
    }
}

/// Serialize segments and write them to `output`, or stdout when absent
pub fn write_collection(segments: &[Segment], output: Option<&Path>) -> Result<(), DegloopError> {
    let collection = collection_from(segments);
    let json = serde_json::to_string_pretty(&collection)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
