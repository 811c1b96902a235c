// The binary uses the library, not duplicate modules
use kml_viewer::{Settings, run, setup_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    setup_logging();
    let settings = Settings::from_cli();
    run(&settings)
}
