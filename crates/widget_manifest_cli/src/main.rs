//! CLI smoke entry point.
//!
//! # Responsibility
//! - Parse one manifest path with the same pipeline the C ABI uses.
//! - Print the record as JSON, or the caller-visible error message.
//!
//! Usage: `widget-manifest <config.xml|manifest.json>`; set
//! `WIDGET_MANIFEST_LOG_DIR` to an absolute directory to enable file logging.

use std::process::ExitCode;
use widget_manifest_core::{
    core_version, default_log_level, init_logging, parse_manifest, FileManifestLoader,
    ParserConfig,
};

const LOG_DIR_ENV: &str = "WIDGET_MANIFEST_LOG_DIR";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let path = std::env::args().nth(1);
    if path.as_deref() == Some("--version") {
        println!("widget-manifest {}", core_version());
        return ExitCode::SUCCESS;
    }

    let config = ParserConfig::from_env();
    let loader = FileManifestLoader::new(config.max_document_bytes);
    match parse_manifest(path.as_deref(), &loader) {
        Ok(record) => match serde_json::to_string_pretty(&record) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("failed to render record: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("{}", err.message(config.error_style));
            ExitCode::FAILURE
        }
    }
}
