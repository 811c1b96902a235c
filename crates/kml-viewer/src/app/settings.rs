use clap::{Parser, ValueEnum};
use kml_viewer_lib::{Config, InvalidPolicy, Metric};
use std::path::PathBuf;

/// How analysis results are written to stdout
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary list and length table
    Text,
    /// One JSON array with a report per file
    Json,
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// KML Viewer - Summarize geometry types and measure line lengths of GeoJSON converted from KML
pub struct Settings {
    /// GeoJSON files produced by a KML converter
    #[clap(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Distance metric for line lengths (geodesic = meters on a sphere, planar = input units)
    #[clap(short, long, default_value = "geodesic")]
    pub metric: Metric,

    /// What to do with line features that cannot be measured (skip or abort)
    #[clap(long, default_value = "skip")]
    pub on_invalid: InvalidPolicy,

    /// Show the geometry type summary (both views are shown when neither is selected)
    #[clap(short, long, default_value = "false")]
    pub summary: bool,

    /// Show the per-feature length table (both views are shown when neither is selected)
    #[clap(short, long, default_value = "false")]
    pub detailed: bool,

    /// Output format
    #[clap(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl Settings {
    /// Parse settings from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Measurement configuration for the analyzer
    pub fn config(&self) -> Config {
        Config {
            metric: self.metric,
            on_invalid: self.on_invalid,
        }
    }

    #[inline]
    pub fn show_summary(&self) -> bool {
        self.summary || !self.detailed
    }

    #[inline]
    pub fn show_detailed(&self) -> bool {
        self.detailed || !self.summary
    }
}
