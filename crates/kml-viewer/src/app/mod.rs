//! Application module
//!
//! This module plays the role of the viewer page for converted KML data:
//! - Load one or more GeoJSON documents (in parallel)
//! - Show the geometry type summary and the per-feature length table
//! - Report the data extent a map view would be fitted to
//! - Report unreadable or undecodable files without hiding the others

pub(crate) mod logging;
mod report;
pub(crate) mod settings;
mod state;

use crate::app::settings::{OutputFormat, Settings};
use kml_viewer_lib::{DataError, GeometryAnalyzer};
use std::path::PathBuf;
use std::process::ExitCode;

/// Errors for a single input file
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}: Failed to read the file: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: The file is not valid GeoJSON: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DataError,
    },

    #[error("{}: {source}", .path.display())]
    Analysis {
        path: PathBuf,
        #[source]
        source: DataError,
    },
}

/// Load, analyze and print every file named in the settings
///
/// Files that fail are reported and skipped; the exit code is non-zero if any failed.
pub fn run(settings: &Settings) -> ExitCode {
    profiling::scope!("run");

    let analyzer = GeometryAnalyzer::new(settings.config());
    tracing::debug!(
        "Analyzing {} files (metric: {}, on invalid: {})",
        settings.files.len(),
        settings.metric,
        settings.on_invalid
    );

    let mut analyses = Vec::with_capacity(settings.files.len());
    let mut failed = false;
    for result in state::load_files(&settings.files) {
        match result.and_then(|file| state::analyze(&analyzer, file)) {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => {
                tracing::error!("{}", e);
                failed = true;
            }
        }
    }

    match settings.format {
        OutputFormat::Text => {
            let rendered: Vec<_> = analyses
                .iter()
                .map(|analysis| report::render_text(analysis, settings))
                .collect();
            print!("{}", rendered.join("\n"));
        }
        OutputFormat::Json => match report::render_json(&analyses, settings) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("Failed to serialize report: {}", e);
                failed = true;
            }
        },
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
