//! GeometryAnalyzer - Summaries and length statistics over feature collections
//!
//! Both operations are pure functions of their input: they read an immutable
//! [`FeatureCollection`], hold no state between calls and return freshly built values.

use crate::{DataError, Feature, FeatureCollection, GeometryError, Metric, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What [`measure_lengths`] does with a line feature it cannot measure
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InvalidPolicy {
    /// Leave the feature out of the records, note it in the report and keep going
    #[default]
    Skip,
    /// Stop at the first invalid feature and return its error
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy {0:?}, expected \"skip\" or \"abort\"")]
pub struct ParsePolicyError(String);

impl InvalidPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidPolicy::Skip => "skip",
            InvalidPolicy::Abort => "abort",
        }
    }
}

impl fmt::Display for InvalidPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvalidPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(InvalidPolicy::Skip),
            "abort" => Ok(InvalidPolicy::Abort),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Configuration for length measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Distance metric between consecutive positions (default: geodesic)
    pub metric: Metric,
    /// Handling of features that cannot be measured (default: skip)
    pub on_invalid: InvalidPolicy,
}

/// Count of features per geometry type tag
///
/// Only tags present in the input appear; there is no zero-filling. Keys iterate in sorted
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SummaryResult {
    counts: BTreeMap<String, usize>,
}

impl SummaryResult {
    /// Count for a tag, `None` if the tag never occurred
    #[inline]
    pub fn get(&self, type_tag: &str) -> Option<usize> {
        self.counts.get(type_tag).copied()
    }

    /// Sum of all counts; equals the number of summarized features
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct tags
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    pub fn into_inner(self) -> BTreeMap<String, usize> {
        self.counts
    }
}

/// Length of one line-like feature
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LengthRecord {
    /// `LineString` or `MultiLineString`
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_tag: String,
    /// Total length, in meters for the geodesic metric
    pub length: f64,
    /// Position of the feature in its collection
    pub index: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

/// A line feature left out of the records under [`InvalidPolicy::Skip`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkippedFeature {
    pub index: usize,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_tag: String,
    pub error: GeometryError,
}

/// Result of [`measure_lengths`]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LengthReport {
    /// One record per measurable line feature, in collection order
    pub records: Vec<LengthRecord>,
    /// Line features that could not be measured, in collection order
    pub skipped: Vec<SkippedFeature>,
}

impl LengthReport {
    #[inline]
    pub fn total_length(&self) -> f64 {
        total_length(&self.records)
    }
}

/// Stateless analyzer bound to a measurement configuration
#[derive(Debug, Clone, Default)]
pub struct GeometryAnalyzer {
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl GeometryAnalyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// See [`summarize`]
    #[inline]
    pub fn summarize(&self, collection: &FeatureCollection) -> SummaryResult {
        summarize(collection)
    }

    /// See [`measure_lengths`]
    #[inline]
    pub fn measure_lengths(&self, collection: &FeatureCollection) -> Result<LengthReport> {
        measure_lengths(collection, &self.config)
    }
}

/// Tally features by geometry type tag
///
/// Never fails: unknown tags are counted under their literal string and features without
/// geometry under [`crate::NULL_TYPE_TAG`].
pub fn summarize(collection: &FeatureCollection) -> SummaryResult {
    #[cfg(feature = "profiling")]
    profiling::scope!("analyzer::summarize");

    let mut counts = BTreeMap::new();
    for feature in collection {
        *counts.entry(feature.type_tag().to_string()).or_insert(0) += 1;
    }
    SummaryResult { counts }
}

/// Length of a single feature
///
/// Returns `Ok(None)` for features that are not `LineString` or `MultiLineString`. A
/// `MultiLineString` is the sum of its independent paths; with no paths its length is 0.
pub fn measure_feature(
    feature: &Feature,
    metric: Metric,
) -> std::result::Result<Option<f64>, GeometryError> {
    let geometry = feature.geometry.as_ref().ok_or(GeometryError::MissingTypeTag)?;
    let Some(paths) = geometry.paths() else {
        return Ok(None);
    };

    let mut total = 0.0;
    for path in paths? {
        total += metric.path_length(path)?;
    }
    Ok(Some(total))
}

/// Compute the length of every line-like feature, in collection order
///
/// With [`InvalidPolicy::Skip`] this never returns an error: unmeasurable features are listed
/// in [`LengthReport::skipped`]. With [`InvalidPolicy::Abort`] the first one is returned as
/// [`DataError::InvalidFeature`].
pub fn measure_lengths(collection: &FeatureCollection, config: &Config) -> Result<LengthReport> {
    #[cfg(feature = "profiling")]
    profiling::scope!("analyzer::measure_lengths");

    let mut report = LengthReport::default();

    for (index, feature) in collection.iter().enumerate() {
        match measure_feature(feature, config.metric) {
            Ok(Some(length)) => report.records.push(LengthRecord {
                type_tag: feature.type_tag().to_string(),
                length,
                index,
                name: feature.name.clone(),
            }),
            Ok(None) => {}
            Err(error) => match config.on_invalid {
                InvalidPolicy::Abort => {
                    return Err(DataError::InvalidFeature {
                        index,
                        source: error,
                    });
                }
                InvalidPolicy::Skip => {
                    tracing::warn!("Skipping feature {}: {}", index, error);
                    report.skipped.push(SkippedFeature {
                        index,
                        type_tag: feature.type_tag().to_string(),
                        error,
                    });
                }
            },
        }
    }

    tracing::debug!(
        "Measured {} line features ({} skipped) with {} metric",
        report.records.len(),
        report.skipped.len(),
        config.metric
    );

    Ok(report)
}

/// Sum of the lengths of a record sequence
pub fn total_length(records: &[LengthRecord]) -> f64 {
    records.iter().map(|r| r.length).sum()
}
