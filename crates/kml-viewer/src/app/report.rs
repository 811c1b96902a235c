//! Text and JSON rendering of file analyses
//!
//! The text layout follows the viewer's two panels: a "Summary" list of `Type: count` lines and
//! a "Detailed Information" table of type and length with two decimals.

use crate::app::settings::Settings;
use crate::app::state::{FileAnalysis, format_length, format_number_with_commas};
use kml_viewer_lib::{LengthRecord, Metric, SkippedFeature};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Serializable view of one file's analysis
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub file: String,
    pub features: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BTreeMap<&'a str, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<DetailedReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<ExtentReport>,
}

#[derive(Debug, Serialize)]
pub struct DetailedReport<'a> {
    pub metric: Metric,
    pub records: &'a [LengthRecord],
    pub skipped: &'a [SkippedFeature],
    pub total_length: f64,
}

#[derive(Debug, Serialize)]
pub struct ExtentReport {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
    pub center: (f64, f64),
}

impl<'a> FileReport<'a> {
    pub fn new(analysis: &'a FileAnalysis, settings: &Settings) -> Self {
        Self {
            file: analysis.path.display().to_string(),
            features: analysis.feature_count,
            summary: settings
                .show_summary()
                .then(|| analysis.summary.iter().collect()),
            detailed: settings.show_detailed().then(|| DetailedReport {
                metric: analysis.metric,
                records: &analysis.lengths.records,
                skipped: &analysis.lengths.skipped,
                total_length: analysis.lengths.total_length(),
            }),
            extent: analysis.extent.map(|extent| {
                let (min_lat, min_lon, max_lat, max_lon) = extent.bounds();
                ExtentReport {
                    min_lat,
                    min_lon,
                    max_lat,
                    max_lon,
                    center: extent.center(),
                }
            }),
        }
    }
}

/// Render all analyses as one pretty-printed JSON array
pub fn render_json(analyses: &[FileAnalysis], settings: &Settings) -> serde_json::Result<String> {
    let reports: Vec<_> = analyses
        .iter()
        .map(|analysis| FileReport::new(analysis, settings))
        .collect();
    serde_json::to_string_pretty(&reports)
}

/// Text view of one file's analysis
pub struct TextReport<'a> {
    analysis: &'a FileAnalysis,
    settings: &'a Settings,
}

impl<'a> TextReport<'a> {
    pub fn new(analysis: &'a FileAnalysis, settings: &'a Settings) -> Self {
        Self { analysis, settings }
    }
}

/// Render one analysis as text
pub fn render_text(analysis: &FileAnalysis, settings: &Settings) -> String {
    TextReport::new(analysis, settings).to_string()
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TextReport { analysis, settings } = *self;
        write_text(out, analysis, settings)
    }
}

fn write_text(
    out: &mut fmt::Formatter<'_>,
    analysis: &FileAnalysis,
    settings: &Settings,
) -> fmt::Result {
    writeln!(
        out,
        "{} ({} features)",
        analysis.path.display(),
        format_number_with_commas(analysis.feature_count)
    )?;

    if settings.show_summary() {
        writeln!(out, "\nSummary")?;
        if analysis.summary.is_empty() {
            writeln!(out, "  (no features)")?;
        }
        for (type_tag, count) in analysis.summary.iter() {
            writeln!(out, "  {}: {}", type_tag, count)?;
        }
    }

    if settings.show_detailed() {
        let lengths = &analysis.lengths;
        writeln!(out, "\nDetailed Information")?;
        if lengths.records.is_empty() {
            writeln!(out, "  (no line features)")?;
        } else {
            let header = format!("Length ({})", analysis.metric.unit());
            writeln!(out, "  {:>5}  {:<16} {:>16}  Name", "#", "Type", header)?;
            for record in &lengths.records {
                writeln!(
                    out,
                    "  {:>5}  {:<16} {:>16.2}  {}",
                    record.index,
                    record.type_tag,
                    record.length,
                    record.name.as_deref().unwrap_or("")
                )?;
            }
            writeln!(
                out,
                "  Total: {}",
                format_length(lengths.total_length(), analysis.metric)
            )?;
        }
        for skipped in &lengths.skipped {
            writeln!(
                out,
                "  Skipped feature {} ({}): {}",
                skipped.index, skipped.type_tag, skipped.error
            )?;
        }
    }

    if let Some(extent) = analysis.extent {
        let (min_lat, min_lon, max_lat, max_lon) = extent.bounds();
        let (lat, lon) = extent.center();
        writeln!(
            out,
            "\nExtent: lat {:.6}..{:.6}, lon {:.6}..{:.6}, center ({:.6}, {:.6})",
            min_lat, max_lat, min_lon, max_lon, lat, lon
        )?;
    }

    Ok(())
}
