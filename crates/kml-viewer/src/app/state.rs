//! File loading and per-file analysis

use crate::app::AppError;
use kml_viewer_lib::{
    Extent, FeatureCollection, GeometryAnalyzer, LengthReport, Metric, SummaryResult, extent,
    geojson,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// A decoded input file
#[derive(Debug)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub collection: FeatureCollection,
}

/// Everything the report shows for one file
#[derive(Debug)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub feature_count: usize,
    pub summary: SummaryResult,
    pub lengths: LengthReport,
    pub extent: Option<Extent>,
    pub metric: Metric,
}

/// Read and decode all files in parallel, keeping the command line order
pub fn load_files(paths: &[PathBuf]) -> Vec<Result<LoadedFile, AppError>> {
    profiling::scope!("load_files");

    paths.par_iter().map(|path| load_file(path)).collect()
}

/// Read and decode one GeoJSON file
pub fn load_file(path: &Path) -> Result<LoadedFile, AppError> {
    profiling::scope!("load_file");

    let file = std::fs::File::open(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let collection =
        geojson::from_geojson_reader(std::io::BufReader::new(file)).map_err(|source| {
            AppError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;

    if collection.is_empty() {
        tracing::warn!("{}: The file is empty or invalid (no features)", path.display());
    } else {
        tracing::info!("{}: Loaded {} features", path.display(), collection.len());
    }

    Ok(LoadedFile {
        path: path.to_path_buf(),
        collection,
    })
}

/// Run both analysis operations on a loaded file
pub fn analyze(analyzer: &GeometryAnalyzer, file: LoadedFile) -> Result<FileAnalysis, AppError> {
    profiling::scope!("analyze");

    let LoadedFile { path, collection } = file;
    let lengths = match analyzer.measure_lengths(&collection) {
        Ok(lengths) => lengths,
        Err(source) => return Err(AppError::Analysis { path, source }),
    };

    Ok(FileAnalysis {
        feature_count: collection.len(),
        summary: analyzer.summarize(&collection),
        lengths,
        extent: extent(&collection),
        metric: analyzer.config().metric,
        path,
    })
}

/// Format a length for display, switching to kilometers for geodesic lengths
pub fn format_length(length: f64, metric: Metric) -> String {
    match metric {
        Metric::Geodesic => {
            let km = length / 1000.0;
            if km < 1.0 {
                format!("{:.0} m", length)
            } else if km < 100.0 {
                format!("{:.2} km", km)
            } else {
                format!("{:.0} km", km)
            }
        }
        Metric::Planar => format!("{:.2} {}", length, metric.unit()),
    }
}

/// Helper to format numbers with comma separators
pub fn format_number_with_commas(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
