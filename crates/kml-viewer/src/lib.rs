//! KML Viewer - Application Library
//!
//! This is the command line front end that loads GeoJSON converted from KML files and prints
//! the geometry summaries and line lengths computed by `kml-viewer-lib`.

mod app;

pub use app::logging::setup_logging;
pub use app::settings::{OutputFormat, Settings};
pub use app::{AppError, run};
