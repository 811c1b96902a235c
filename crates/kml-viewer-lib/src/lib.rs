//! KML Viewer Library - Geometry Summaries and Path Lengths
//!
//! This library holds the analysis core of the KML viewer. An external converter turns a KML
//! upload into a GeoJSON feature collection; this crate models that collection as closed Rust
//! types and answers the two questions the viewer asks about it: how many geometries of each
//! type it contains, and how long each line-like feature is.
//!
//! # Architecture
//!
//! - **[`FeatureCollection`]**: Ordered features, each wrapping at most one [`Geometry`]
//! - **[`Coordinate`]** / **[`Position`]**: Raw converter tuples and their validated form
//! - **[`GeometryAnalyzer`]**: Stateless [`summarize`] and [`measure_lengths`] operations
//! - **[`Metric`]**: Haversine (default) or planar distance between positions
//! - **[`Extent`]**: Bounding box of all valid positions, for fitting a map view
//!
//! With the `serde` feature (default), [`geojson`] decodes converter output and the result
//! types can be serialized.
//!
//! # Performance Characteristics
//!
//! - **Summarize**: O(F) where F = number of features
//! - **Measure**: O(C) where C = total number of coordinates
//! - **Memory**: results hold no reference to their input

mod analyzer;
mod extent;
mod geometry;
mod metric;
mod position;

#[cfg(feature = "serde")]
pub mod geojson;

// Public API exports
pub use analyzer::{
    Config, GeometryAnalyzer, InvalidPolicy, LengthRecord, LengthReport, ParsePolicyError,
    SkippedFeature, SummaryResult, measure_feature, measure_lengths, summarize, total_length,
};
pub use extent::{Extent, extent};
pub use geometry::{Feature, FeatureCollection, Geometry, GeometryType, NULL_TYPE_TAG};
pub use metric::{
    EARTH_MEAN_RADIUS_M, Metric, ParseMetricError, haversine_distance, planar_distance,
};
pub use position::{Coordinate, Position};

/// Reasons a single geometry cannot be measured
///
/// Every variant is a kind of invalid geometry. Only measurement raises these; summarizing a
/// collection never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryError {
    #[error("Invalid geometry: missing type tag")]
    MissingTypeTag,

    #[error("Invalid geometry: coordinate has {len} values, expected 2 or 3")]
    CoordinateArity { len: usize },

    #[error("Invalid geometry: non-finite coordinate value {value}")]
    NonFinite { value: f64 },

    #[error("Invalid geometry: path length overflows")]
    Overflow,

    #[error("Invalid geometry: {0}")]
    Malformed(String),
}

/// Error types for decoding and aborting analysis
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[cfg(feature = "serde")]
    #[error("GeoJSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a GeoJSON document: {0}")]
    NotGeoJson(String),

    #[error("Feature {index}: {source}")]
    InvalidFeature {
        index: usize,
        #[source]
        source: GeometryError,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
